use crate::{
    Data, Error,
    functions::{
        embeds,
        format::discord::{code_block, inline_code},
    },
};
use poise::FrameworkError;
use poise::serenity_prelude as serenity;
use tracing::{debug, error, warn};

/// Longest error text forwarded to the log channel.
const MAX_REPORT_LENGTH: usize = 1000;

/// Default error handler for application commands
pub async fn command_error_handler(error: FrameworkError<'_, Data, Error>) {
    match error {
        FrameworkError::Command { ctx, error, .. } => {
            let command = ctx.command().qualified_name.clone();
            error!(command = %command, user = %ctx.author().id, "command failed: {error:?}");

            let reply = poise::CreateReply::default()
                .embed(embeds::error_embed(
                    "Something went wrong",
                    "Something went wrong while running this command. Please try again shortly.",
                ))
                .ephemeral(true);
            if let Err(err) = ctx.send(reply).await {
                warn!("failed to report command error to the user: {err}");
            }

            if let Some(channel) = ctx.data().settings.log_channel {
                let report = error_report(&command, ctx.author().id, &error.to_string());
                let message = serenity::CreateMessage::new().embed(report);
                if let Err(err) = serenity::ChannelId::new(channel)
                    .send_message(ctx.http(), message)
                    .await
                {
                    warn!("failed to forward command error to channel {channel}: {err}");
                }
            }
        }
        FrameworkError::Setup { error, .. } => {
            // Session::connect turns this into a startup error after the shards stop.
            debug!("framework setup error handed to the session: {error}");
        }
        other => {
            if let Err(err) = poise::builtins::on_error(other).await {
                error!("error while handling command error: {err:?}");
            }
        }
    }
}

fn error_report(command: &str, user: serenity::UserId, error: &str) -> serenity::CreateEmbed {
    let error: String = error.chars().take(MAX_REPORT_LENGTH).collect();
    embeds::error_embed("Command error", code_block(error, None))
        .field("Command", inline_code(format!("/{command}")), true)
        .field("User", format!("<@{user}>"), true)
}
