use crate::{Data, Error};

pub mod about;
pub mod cooldown;
pub mod embed;
pub mod examples;
pub mod fetch;
pub mod help;
pub mod ping;
pub mod util;

pub fn load_all() -> Vec<poise::Command<Data, Error>> {
    vec![
        help::help(),
        ping::ping(),
        about::about(),
        embed::embed(),
        examples::autocomplete(),
        examples::disallow_bots(),
        examples::is_owner(),
        cooldown::cooldown(),
        fetch::fetch(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_command_names_are_unique() {
        let commands = load_all();
        let names: HashSet<&str> = commands.iter().map(|command| command.name.as_str()).collect();
        assert_eq!(names.len(), commands.len());
    }

    #[test]
    fn test_every_command_is_a_slash_command() {
        for command in load_all() {
            assert!(command.slash_action.is_some(), "{}", command.name);
            for subcommand in &command.subcommands {
                assert!(subcommand.slash_action.is_some(), "{}", subcommand.name);
            }
        }
    }

    #[test]
    fn test_slash_names_are_valid() {
        fn check(command: &poise::Command<Data, Error>) {
            let name = command.name.as_str();
            assert!(!name.is_empty() && name.len() <= 32, "{name}");
            assert!(
                name.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'),
                "{name}"
            );
            command.subcommands.iter().for_each(check);
        }
        load_all().iter().for_each(check);
    }
}
