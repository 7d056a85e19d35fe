use crate::{Context, Error, functions::embeds};
use poise::serenity_prelude as serenity;

const CHOICES: [&str; 3] = ["Option 1", "Option 2", "Option 3"];

/// An example of the autocomplete utility.
#[poise::command(slash_command, prefix_command, category = "Examples")]
pub async fn autocomplete(
    ctx: Context<'_>,
    #[description = "The option selected from the autocomplete list."]
    #[autocomplete = "choice_autocomplete"]
    choice: String,
) -> Result<(), Error> {
    ctx.say(format!("You selected: {choice}")).await?;
    Ok(())
}

async fn choice_autocomplete(_: Context<'_>, partial: &str) -> Vec<&'static str> {
    matching_choices(partial)
}

fn matching_choices(partial: &str) -> Vec<&'static str> {
    let needle = partial.trim().to_lowercase();
    CHOICES
        .into_iter()
        .filter(|choice| choice.to_lowercase().contains(&needle))
        .collect()
}

/// An example of refusing bot users.
#[poise::command(
    slash_command,
    prefix_command,
    rename = "disallow-bots",
    category = "Examples"
)]
pub async fn disallow_bots(
    ctx: Context<'_>,
    #[description = "The Discord user to check."] user: serenity::User,
) -> Result<(), Error> {
    if ctx.author().bot || user.bot {
        let embed =
            embeds::error_embed("Bots not allowed", "Bots cannot be used with this command.");
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        return Ok(());
    }

    ctx.say(format!("User: {}", user.name)).await?;
    Ok(())
}

/// An example of an owner-only command.
#[poise::command(
    slash_command,
    prefix_command,
    rename = "is-owner",
    owners_only,
    category = "Examples"
)]
pub async fn is_owner(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("You are the owner!").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_choices() {
        assert_eq!(matching_choices(""), CHOICES.to_vec());
        assert_eq!(matching_choices("2"), vec!["Option 2"]);
        assert_eq!(matching_choices("OPTION 3"), vec!["Option 3"]);
        assert!(matching_choices("four").is_empty());
    }
}
