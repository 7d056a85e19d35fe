use crate::{
    Context, Error,
    functions::{embeds, format::timestamp},
};
use poise::serenity_prelude as serenity;
use tracing::debug;

/// Commands to fetch guilds, users, and channels.
#[poise::command(
    slash_command,
    prefix_command,
    category = "Examples",
    subcommands("guild", "user", "channel")
)]
pub async fn fetch(_: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Parses a Discord snowflake, which is always a non-zero integer.
fn parse_snowflake(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|id| *id != 0)
}

async fn not_found(ctx: Context<'_>, message: String) -> Result<(), Error> {
    ctx.send(poise::CreateReply::default().embed(embeds::error_embed("Not found", message)))
        .await?;
    Ok(())
}

fn created_field(created_at: serenity::Timestamp) -> String {
    timestamp(created_at.unix_timestamp(), 'F')
}

/// Fetch a guild by its ID.
#[poise::command(slash_command, prefix_command)]
pub async fn guild(
    ctx: Context<'_>,
    #[description = "The ID of the guild to fetch."] guild_id: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    let fetched = match parse_snowflake(&guild_id) {
        Some(id) => serenity::GuildId::new(id)
            .to_partial_guild_with_counts(ctx.http())
            .await
            .inspect_err(|err| debug!("guild {id} lookup failed: {err}"))
            .ok(),
        None => None,
    };
    let Some(guild) = fetched else {
        return not_found(ctx, format!("Guild with ID {guild_id} not found.")).await;
    };

    let member_count = guild
        .approximate_member_count
        .map(|count| count.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let embed = embeds::main_embed(
        "Guild Information",
        format!("Fetched guild `{}`.", guild.name),
    )
        .field("Name", guild.name.clone(), false)
        .field("ID", guild.id.to_string(), false)
        .field("Owner ID", guild.owner_id.to_string(), false)
        .field("Member Count", member_count, false)
        .field("Created At", created_field(guild.id.created_at()), false);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Fetch a user by their ID.
#[poise::command(slash_command, prefix_command)]
pub async fn user(
    ctx: Context<'_>,
    #[description = "The ID of the user to fetch."] user_id: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    let fetched = match parse_snowflake(&user_id) {
        Some(id) => serenity::UserId::new(id)
            .to_user(ctx)
            .await
            .inspect_err(|err| debug!("user {id} lookup failed: {err}"))
            .ok(),
        None => None,
    };
    let Some(user) = fetched else {
        return not_found(ctx, format!("User with ID {user_id} not found.")).await;
    };

    let embed = embeds::main_embed(
        "User Information",
        format!("Fetched user `{}`.", user.name),
    )
        .field("Username", user.tag(), false)
        .field("ID", user.id.to_string(), false)
        .field("Bot", user.bot.to_string(), false)
        .field("Created At", created_field(user.id.created_at()), false);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Fetch a text or voice channel by its ID.
#[poise::command(slash_command, prefix_command)]
pub async fn channel(
    ctx: Context<'_>,
    #[description = "The ID of the channel to fetch."] channel_id: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    let fetched = match parse_snowflake(&channel_id) {
        Some(id) => serenity::ChannelId::new(id)
            .to_channel(ctx)
            .await
            .inspect_err(|err| debug!("channel {id} lookup failed: {err}"))
            .ok()
            .and_then(|channel| channel.guild()),
        None => None,
    };
    let Some(channel) = fetched.filter(|channel| {
        matches!(
            channel.kind,
            serenity::ChannelType::Text | serenity::ChannelType::Voice
        )
    }) else {
        return not_found(
            ctx,
            format!("Channel with ID {channel_id} is not a valid text or voice channel."),
        )
        .await;
    };

    let embed = embeds::main_embed(
        "Channel Information",
        format!("Fetched channel `{}`.", channel.name),
    )
        .field("Name", channel.name.clone(), false)
        .field("ID", channel.id.to_string(), false)
        .field("Type", channel.kind.name(), false)
        .field("Guild ID", channel.guild_id.to_string(), false)
        .field("Created At", created_field(channel.id.created_at()), false);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
