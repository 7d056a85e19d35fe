use crate::{Data, Error};
use poise::serenity_prelude as serenity;
use std::collections::HashMap;

/// Index of registered application commands, keyed by root command name.
#[derive(Clone, Debug, Default)]
pub struct CommandMentions {
    ids: HashMap<String, u64>,
}

impl CommandMentions {
    pub fn from_ids<K: Into<String>>(ids: impl IntoIterator<Item = (K, u64)>) -> Self {
        Self {
            ids: ids.into_iter().map(|(name, id)| (name.into(), id)).collect(),
        }
    }

    pub fn from_registered(commands: &[serenity::Command]) -> Self {
        Self::from_ids(
            commands
                .iter()
                .map(|command| (command.name.clone(), command.id.get())),
        )
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns `</qualified name:id>` for a command or subcommand.
    pub fn mention_for(&self, qualified_name: &str) -> Option<String> {
        let qualified_name = qualified_name.trim();
        let root = qualified_name.split_whitespace().next()?;
        let id = self.ids.get(root)?;
        Some(format!("</{qualified_name}:{id}>"))
    }

    /// Pairs every invocable command with its mention.
    ///
    /// Groups are skipped in favour of their subcommands, since Discord only
    /// renders mentions for leaves.
    pub fn walk(&self, commands: &[poise::Command<Data, Error>]) -> Vec<(String, String)> {
        let mut mentions = Vec::new();
        for command in commands {
            self.walk_command(None, command, &mut mentions);
        }
        mentions
    }

    fn walk_command(
        &self,
        parent: Option<&str>,
        command: &poise::Command<Data, Error>,
        out: &mut Vec<(String, String)>,
    ) {
        if command.slash_action.is_none() && command.subcommands.is_empty() {
            return;
        }

        let qualified_name = match parent {
            Some(parent) => format!("{parent} {}", command.name),
            None => command.name.clone(),
        };

        if command.subcommands.is_empty() {
            match self.mention_for(&qualified_name) {
                Some(mention) => out.push((qualified_name, mention)),
                None => tracing::warn!(
                    command = %qualified_name,
                    "no registered id for command, are commands out of sync?"
                ),
            }
            return;
        }

        for subcommand in &command.subcommands {
            self.walk_command(Some(&qualified_name), subcommand, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> CommandMentions {
        CommandMentions::from_ids([("ping", 11_u64), ("embed", 22), ("fetch", 33)])
    }

    #[test]
    fn test_root_mention() {
        assert_eq!(index().mention_for("ping").as_deref(), Some("</ping:11>"));
    }

    #[test]
    fn test_subcommand_uses_root_id() {
        assert_eq!(
            index().mention_for("embed main-embed").as_deref(),
            Some("</embed main-embed:22>")
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(index().mention_for("cooldown user"), None);
        assert_eq!(index().mention_for("   "), None);
    }

    #[test]
    fn test_walk_yields_leaves() {
        let commands = crate::commands::load_all();
        let mentions = index().walk(&commands);
        let names: Vec<&str> = mentions.iter().map(|(name, _)| name.as_str()).collect();

        assert!(names.contains(&"ping"));
        assert!(names.contains(&"embed success-embed"));
        assert!(names.contains(&"fetch guild"));
        assert!(!names.contains(&"embed"));
        assert!(!names.iter().any(|name| name.starts_with("cooldown")));
    }
}
