use crate::{Context, Error, functions::embeds};
use poise::serenity_prelude as serenity;

/// Commands related to embeds.
#[poise::command(
    slash_command,
    prefix_command,
    interaction_context = "Guild",
    category = "Examples",
    subcommands("main_embed", "success_embed", "error_embed")
)]
pub async fn embed(_: Context<'_>) -> Result<(), Error> {
    Ok(())
}

fn with_example_fields(embed: serenity::CreateEmbed) -> serenity::CreateEmbed {
    embed
        .field("Field 1", "This is the first field.", true)
        .field("Field 2", "This is the second field.", true)
}

/// An example of a main embed.
#[poise::command(
    slash_command,
    prefix_command,
    interaction_context = "Guild",
    rename = "main-embed"
)]
pub async fn main_embed(ctx: Context<'_>) -> Result<(), Error> {
    let embed = embeds::main_embed(
        "Main Embed Example",
        "This is an example of a main embed.",
    );
    ctx.send(poise::CreateReply::default().embed(with_example_fields(embed)))
        .await?;
    Ok(())
}

/// An example of a success embed.
#[poise::command(
    slash_command,
    prefix_command,
    interaction_context = "Guild",
    rename = "success-embed"
)]
pub async fn success_embed(ctx: Context<'_>) -> Result<(), Error> {
    let embed = embeds::success_embed(
        "Success Embed Example",
        "This is an example of a success embed.",
    );
    ctx.send(poise::CreateReply::default().embed(with_example_fields(embed)))
        .await?;
    Ok(())
}

/// An example of an error embed.
#[poise::command(
    slash_command,
    prefix_command,
    interaction_context = "Guild",
    rename = "error-embed"
)]
pub async fn error_embed(ctx: Context<'_>) -> Result<(), Error> {
    let embed = embeds::error_embed(
        "Error Embed Example",
        "This is an example of an error embed.",
    );
    ctx.send(poise::CreateReply::default().embed(with_example_fields(embed)))
        .await?;
    Ok(())
}
