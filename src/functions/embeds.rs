use crate::config::{BOT_NAME, VERSION};
use crate::constants::{colors, icon};
use poise::serenity_prelude as serenity;

fn footer() -> serenity::CreateEmbedFooter {
    serenity::CreateEmbedFooter::new(format!("{BOT_NAME} v{VERSION}"))
}

pub fn main_embed(
    title: impl Into<String>,
    description: impl Into<String>,
) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .colour(colors::MAIN)
        .footer(footer())
}

pub fn success_embed(
    title: impl Into<String>,
    description: impl Into<String>,
) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("{} {}", icon::CHECK, title.into()))
        .description(description)
        .colour(colors::SUCCESS)
        .footer(footer())
}

pub fn error_embed(
    title: impl Into<String>,
    description: impl Into<String>,
) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("{} {}", icon::ERROR, title.into()))
        .description(description)
        .colour(colors::ERROR)
        .footer(footer())
}
