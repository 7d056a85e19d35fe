use crate::{Context, Error, functions::embeds};
use poise::serenity_prelude as serenity;
use poise::{CooldownConfig, CooldownContext, CooldownTracker, CooldownType};
use std::sync::PoisonError;
use std::time::{Duration, Instant};

/// Commands to demonstrate cooldown functionality.
#[poise::command(
    slash_command,
    prefix_command,
    interaction_context = "Guild",
    category = "Examples",
    subcommands(
        "user_cooldown",
        "guild_cooldown",
        "channel_cooldown",
        "reset_cooldown"
    )
)]
pub async fn cooldown(_: Context<'_>) -> Result<(), Error> {
    Ok(())
}

async fn reply(ctx: Context<'_>, title: &str, description: &str) -> Result<(), Error> {
    send(ctx, embeds::success_embed(title, description)).await
}

async fn send(ctx: Context<'_>, embed: serenity::CreateEmbed) -> Result<(), Error> {
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// A command with a user-specific cooldown of 10 seconds.
#[poise::command(
    slash_command,
    prefix_command,
    interaction_context = "Guild",
    rename = "user",
    user_cooldown = 10
)]
pub async fn user_cooldown(ctx: Context<'_>) -> Result<(), Error> {
    reply(
        ctx,
        "User Cooldown",
        "This command is on a 10-second cooldown per user.",
    )
    .await
}

/// A command with a guild-specific cooldown of 20 seconds.
#[poise::command(
    slash_command,
    prefix_command,
    interaction_context = "Guild",
    rename = "guild",
    guild_cooldown = 20
)]
pub async fn guild_cooldown(ctx: Context<'_>) -> Result<(), Error> {
    reply(
        ctx,
        "Guild Cooldown",
        "This command is on a 20-second cooldown per guild.",
    )
    .await
}

/// A command with a channel-specific cooldown of 15 seconds.
#[poise::command(
    slash_command,
    prefix_command,
    interaction_context = "Guild",
    rename = "channel",
    channel_cooldown = 15
)]
pub async fn channel_cooldown(ctx: Context<'_>) -> Result<(), Error> {
    reply(
        ctx,
        "Channel Cooldown",
        "This command is on a 15-second cooldown per channel.",
    )
    .await
}

/// Resets your cooldown on the `user` command.
#[poise::command(
    slash_command,
    prefix_command,
    interaction_context = "Guild",
    rename = "reset"
)]
pub async fn reset_cooldown(ctx: Context<'_>) -> Result<(), Error> {
    let user_command = ctx
        .parent_commands()
        .last()
        .and_then(|parent| parent.subcommands.iter().find(|sub| sub.name == "user"));

    let reset = match user_command {
        Some(command) => {
            let window = command
                .cooldown_config
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .user;
            let mut tracker = command
                .cooldowns
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            window.is_some_and(|window| reset_user_bucket(&mut tracker, ctx.author().id, window))
        }
        None => false,
    };

    if reset {
        reply(ctx, "Cooldown Reset", "The cooldown for `user` has been reset.").await
    } else {
        let embed =
            embeds::error_embed("Cooldown Reset Failed", "No active cooldown found to reset.");
        send(ctx, embed).await
    }
}

/// Moves `user`'s last invocation past the window. Returns `false` when the
/// bucket was not running.
fn reset_user_bucket(
    tracker: &mut CooldownTracker,
    user: serenity::UserId,
    window: Duration,
) -> bool {
    let user_only = CooldownConfig {
        user: Some(window),
        ..Default::default()
    };
    let bucket = CooldownContext {
        user_id: user,
        ..Default::default()
    };
    if tracker.remaining_cooldown(bucket, &user_only).is_none() {
        return false;
    }

    match Instant::now().checked_sub(window + Duration::from_secs(1)) {
        Some(expired) => {
            tracker.set_last_invocation(CooldownType::User(user), expired);
            true
        }
        None => false,
    }
}
