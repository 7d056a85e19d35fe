use crate::{
    Context, Error,
    config::{BOT_NAME, VERSION},
    constants::{colors, icon},
    functions::format::{discord::inline_code, format_duration, pretty_message},
};
use poise::serenity_prelude as serenity;

/// Show version and runtime information about the bot.
#[poise::command(slash_command, prefix_command, category = "Utility")]
pub async fn about(ctx: Context<'_>) -> Result<(), Error> {
    let cache = ctx.serenity_context().cache.clone();
    let guild_count = cache.guild_count();
    let shard_total = cache.shard_count();

    let data = ctx.data();
    let connected_shards = data.shard_manager.runners.lock().await.len();
    let uptime = format_duration(data.started_at.elapsed());
    let rust_version = option_env!("KITBOT_RUSTC_VERSION").unwrap_or("unknown");

    let mut description = vec![
        pretty_message(icon::GEAR, format!("Version {}", inline_code(VERSION))),
        pretty_message(icon::GEAR, format!("Rust {}", inline_code(rust_version))),
        pretty_message(icon::TIMER, format!("Uptime {uptime}")),
    ];
    if let Some(invite) = data.settings.support_server.as_deref() {
        description.push(pretty_message(icon::LINK, format!("[Support server]({invite})")));
    }

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("{BOT_NAME} • About"))
        .description(description.join("\n"))
        .colour(colors::MAIN)
        .field("Servers", guild_count.to_string(), true)
        .field("Shards", format!("{connected_shards}/{shard_total}"), true);
    if let Some(avatar_url) = data.avatar_url.as_deref() {
        embed = embed.thumbnail(avatar_url);
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
