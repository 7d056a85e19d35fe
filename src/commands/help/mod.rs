use crate::{
    Context, Data, Error,
    constants::{colors, icon},
    functions::{embeds, format::pretty_message},
};
use poise::serenity_prelude as serenity;

pub mod command_finder;
use command_finder::CommandFinder;

const MAX_AUTOCOMPLETE_CHOICES: usize = 25;

/// Show the available commands.
#[poise::command(slash_command, prefix_command, track_edits, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "A specific command to describe"]
    #[autocomplete = "help_autocomplete"]
    command: Option<String>,
) -> Result<(), Error> {
    match command {
        Some(name) => send_command_help(ctx, &name).await?,
        None => send_overview(ctx).await?,
    }

    Ok(())
}

async fn send_overview(ctx: Context<'_>) -> Result<(), Error> {
    let commands = &ctx.framework().options().commands;
    let mentions = ctx.data().mentions.walk(commands);
    let finder = CommandFinder::new(commands);

    let lines: Vec<String> = finder
        .command_names()
        .into_iter()
        .map(|name| {
            let label = mentions
                .iter()
                .find(|(qualified, _)| *qualified == name)
                .map(|(_, mention)| mention.clone())
                .unwrap_or_else(|| format!("`/{name}`"));
            let description = finder
                .find(&name)
                .and_then(|info| info.target().description.clone())
                .unwrap_or_else(|| "No description".to_string());
            format!("{label} {description}")
        })
        .collect();

    let mut description = vec![pretty_message(
        icon::BELL,
        "Use `/help <command>` to see the details of a command.",
    )];
    if lines.is_empty() {
        description.push(pretty_message(icon::ERROR, "No commands available yet."));
    } else {
        description.push(String::new());
        description.extend(lines);
    }

    let embed = embeds::main_embed("Commands", description.join("\n"));
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}

async fn send_command_help(ctx: Context<'_>, name: &str) -> Result<(), Error> {
    let commands = &ctx.framework().options().commands;
    let Some(info) = CommandFinder::new(commands).find(name) else {
        let embed = embeds::error_embed(
            "Command not found",
            format!("There is no command called `{}`.", name.trim()),
        );
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        return Ok(());
    };

    let target = info.target();
    let qualified_name = info.qualified_name();
    let description = target
        .help_text
        .clone()
        .or_else(|| target.description.clone())
        .unwrap_or_else(|| "No description".to_string());
    let title = ctx
        .data()
        .mentions
        .mention_for(&qualified_name)
        .unwrap_or_else(|| format!("/{qualified_name}"));

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("{} /{qualified_name}", icon::BELL))
        .description(format!("{title}\n{description}"))
        .colour(colors::MAIN);

    if let Some(category) = info.command.category.as_deref() {
        embed = embed.field(
            format!("{} Category", icon::GEAR),
            format!("`{category}`"),
            true,
        );
    }

    if !target.parameters.is_empty() {
        let params = target
            .parameters
            .iter()
            .map(|param| {
                let param_desc = param.description.as_deref().unwrap_or("No description");
                let required = if param.required { "" } else { " (optional)" };
                format!("`{}`{required}: {param_desc}", param.name)
            })
            .collect::<Vec<_>>()
            .join("\n");
        embed = embed.field("Parameters", params, false);
    }

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}

async fn help_autocomplete(ctx: Context<'_>, partial: &str) -> Vec<String> {
    matching_commands(&ctx.framework().options().commands, partial)
}

fn matching_commands(commands: &[poise::Command<Data, Error>], partial: &str) -> Vec<String> {
    let lowercase = partial.trim().to_ascii_lowercase();
    CommandFinder::new(commands)
        .command_names()
        .into_iter()
        .filter(|name| name.to_ascii_lowercase().starts_with(&lowercase))
        .take(MAX_AUTOCOMPLETE_CHOICES)
        .collect()
}
