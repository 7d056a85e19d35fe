use crate::constants::icon;
use crate::functions::embeds::main_embed;
use crate::functions::format::pretty_message;
use crate::{Context, Error};
use std::time::{Duration, Instant};

/// Shows the gateway and API latency.
#[poise::command(slash_command, prefix_command, category = "Utility")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let sent_at = Instant::now();
    let reply = ctx
        .send(poise::CreateReply::default().content(pretty_message(icon::TIMER, "Pinging...")))
        .await?;
    let api_latency = sent_at.elapsed();

    let gateway_latency = shard_latency(ctx).await;
    let gateway = gateway_latency
        .map(|latency| format!("{} ms", latency.as_millis()))
        .unwrap_or_else(|| "not measured yet".to_string());

    let embed = main_embed("Pong!", pretty_message(icon::BELL, "Current latency"))
        .field("Gateway", gateway, true)
        .field("API", format!("{} ms", api_latency.as_millis()), true);

    reply
        .edit(ctx, poise::CreateReply::default().content("").embed(embed))
        .await?;

    Ok(())
}

/// Heartbeat latency of the shard serving this context, if one was recorded.
async fn shard_latency(ctx: Context<'_>) -> Option<Duration> {
    let shard_id = ctx.serenity_context().shard_id;
    let runners = ctx.data().shard_manager.runners.lock().await;
    runners.get(&shard_id).and_then(|runner| runner.latency)
}
