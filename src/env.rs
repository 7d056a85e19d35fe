use crate::error::ConfigError;
use std::collections::HashMap;
use std::str::FromStr;

pub const TOKEN: &str = "TOKEN";

/// Snapshot of the process environment taken once at startup.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Captures the process environment, including anything loaded from `.env`.
    pub fn capture() -> Self {
        Self::from_vars(dotenvy::vars())
    }

    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Gets the Discord bot token.
    pub fn load_token(&self) -> Result<String, ConfigError> {
        match self.vars.get(TOKEN) {
            None => Err(ConfigError::Missing(TOKEN)),
            Some(value) if value.trim().is_empty() => Err(ConfigError::Blank(TOKEN)),
            Some(value) => Ok(value.trim().to_string()),
        }
    }

    /// Returns the trimmed value of `key`, treating blank values as unset.
    pub fn optional(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn parse<T>(&self, key: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key)
            .map(|raw| {
                raw.parse::<T>().map_err(|err| ConfigError::Invalid {
                    key,
                    value: raw.to_string(),
                    reason: err.to_string(),
                })
            })
            .transpose()
    }

    pub fn flag(&self, key: &'static str) -> Result<Option<bool>, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(None);
        };

        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::Invalid {
                key,
                value: raw.to_string(),
                reason: "expected a boolean".to_string(),
            }),
        }
    }

    /// Comma-separated list of Discord ids, empty when unset.
    pub fn id_list(&self, key: &'static str) -> Result<Vec<u64>, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(Vec::new());
        };

        let mut ids = Vec::new();
        for part in raw.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }

            let parsed: u64 = trimmed.parse().map_err(|err: std::num::ParseIntError| {
                ConfigError::Invalid {
                    key,
                    value: trimmed.to_string(),
                    reason: err.to_string(),
                }
            })?;
            ids.push(parsed);
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        Environment::from_vars(pairs.iter().copied())
    }

    #[test]
    fn test_missing_token() {
        let err = env(&[]).load_token().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(TOKEN)));
    }

    #[test]
    fn test_blank_token() {
        for blank in ["", " ", "\t\n", "   \r\n  "] {
            let err = env(&[(TOKEN, blank)]).load_token().unwrap_err();
            assert!(matches!(err, ConfigError::Blank(TOKEN)), "{blank:?}");
        }
    }

    #[test]
    fn test_token_returned_unchanged() {
        let token = "MTIzNDU2Nzg5.abc-DEF_123.xyz";
        assert_eq!(env(&[(TOKEN, token)]).load_token().unwrap(), token);
        assert_eq!(env(&[(TOKEN, "abc123")]).load_token().unwrap(), "abc123");
    }

    #[test]
    fn test_token_surrounding_whitespace_is_trimmed() {
        assert_eq!(
            env(&[(TOKEN, "  abc123\n")]).load_token().unwrap(),
            "abc123"
        );
    }

    #[test]
    fn test_parse_invalid_number() {
        let err = env(&[("MAX_LOGS", "ten")])
            .parse::<usize>("MAX_LOGS")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "MAX_LOGS", .. }));
    }

    #[test]
    fn test_parse_blank_is_unset() {
        let parsed = env(&[("MAX_LOGS", "  ")]).parse::<usize>("MAX_LOGS");
        assert_eq!(parsed.unwrap(), None);
    }

    #[test]
    fn test_flag_values() {
        assert_eq!(env(&[("X", "TRUE")]).flag("X").unwrap(), Some(true));
        assert_eq!(env(&[("X", "off")]).flag("X").unwrap(), Some(false));
        assert_eq!(env(&[]).flag("X").unwrap(), None);
        assert!(env(&[("X", "maybe")]).flag("X").is_err());
    }

    #[test]
    fn test_id_list() {
        let ids = env(&[("OWNER_IDS", "418941954252996609, 1022085572719808542,")])
            .id_list("OWNER_IDS")
            .unwrap();
        assert_eq!(ids, vec![418941954252996609, 1022085572719808542]);
        assert!(env(&[]).id_list("OWNER_IDS").unwrap().is_empty());
        assert!(env(&[("OWNER_IDS", "12,abc")]).id_list("OWNER_IDS").is_err());
    }
}
