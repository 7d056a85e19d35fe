use crate::{Data, Error};

type Command = poise::Command<Data, Error>;

pub struct CommandInfo<'a> {
    pub command: &'a Command,
    pub subcommand: Option<&'a Command>,
}

impl CommandInfo<'_> {
    pub fn target(&self) -> &Command {
        self.subcommand.unwrap_or(self.command)
    }

    pub fn qualified_name(&self) -> String {
        match self.subcommand {
            Some(subcommand) => format!("{} {}", self.command.name, subcommand.name),
            None => self.command.name.clone(),
        }
    }
}

/// Looks commands up by name among the registered commands.
pub struct CommandFinder<'a> {
    commands: &'a [Command],
}

impl<'a> CommandFinder<'a> {
    pub fn new(commands: &'a [Command]) -> Self {
        Self { commands }
    }

    pub fn visible(&self) -> impl Iterator<Item = &'a Command> {
        self.commands.iter().filter(|command| !command.hide_in_help)
    }

    /// Qualified names of every invocable command, subcommands expanded.
    pub fn command_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for command in self.visible() {
            if command.subcommands.is_empty() {
                names.push(command.name.clone());
                continue;
            }
            for subcommand in command.subcommands.iter().filter(|sub| !sub.hide_in_help) {
                names.push(format!("{} {}", command.name, subcommand.name));
            }
        }
        names
    }

    pub fn find(&self, search_name: &str) -> Option<CommandInfo<'a>> {
        let needle = search_name.trim().trim_start_matches('/').to_ascii_lowercase();
        if needle.is_empty() {
            return None;
        }

        for command in self.visible() {
            if matches_name(command, &needle) {
                return Some(CommandInfo {
                    command,
                    subcommand: None,
                });
            }

            for subcommand in command.subcommands.iter().filter(|sub| !sub.hide_in_help) {
                let full_name =
                    format!("{} {}", command.name, subcommand.name).to_ascii_lowercase();
                if full_name == needle || matches_name(subcommand, &needle) {
                    return Some(CommandInfo {
                        command,
                        subcommand: Some(subcommand),
                    });
                }
            }
        }

        None
    }
}

fn matches_name(command: &Command, needle: &str) -> bool {
    command.name.to_ascii_lowercase() == needle
        || command
            .aliases
            .iter()
            .any(|alias| alias.to_ascii_lowercase() == needle)
}
