use serenity::utils::MessageBuilder;
use std::fmt::Display;
use std::time::Duration;

/// Builds a lightweight "emoji | message" string used across embeds/responses.
pub fn pretty_message(emoji: impl Display, message: impl Display) -> String {
    format!("{} | {}", emoji, message)
}

/// Formats a duration as `1d 2h 3m 4s`, omitting leading zero units.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let units = [
        (total / 86_400, "d"),
        ((total % 86_400) / 3_600, "h"),
        ((total % 3_600) / 60, "m"),
        (total % 60, "s"),
    ];

    let parts: Vec<String> = units
        .iter()
        .skip_while(|(value, unit)| *value == 0 && *unit != "s")
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect();
    parts.join(" ")
}

/// Discord timestamp markup (`<t:unix:style>`).
pub fn timestamp(unix: i64, style: char) -> String {
    format!("<t:{unix}:{style}>")
}

/// Helper functions to format Discord messages with Markdown safely.
pub mod discord {
    use super::MessageBuilder;

    /// Wraps text with inline code markers (`` `text` ``).
    pub fn inline_code(text: impl AsRef<str>) -> String {
        build(|builder| {
            builder.push_mono_safe(text.as_ref());
        })
    }

    /// Formats text as a code block, optionally adding a language hint.
    pub fn code_block(text: impl AsRef<str>, language: Option<&str>) -> String {
        build(|builder| {
            builder.push_codeblock_safe(text.as_ref(), language);
        })
    }

    fn build(apply: impl FnOnce(&mut MessageBuilder)) -> String {
        let mut builder = MessageBuilder::new();
        apply(&mut builder);
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_message() {
        assert_eq!(pretty_message("✅", "done"), "✅ | done");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs(59)), "59s");
        assert_eq!(format_duration(Duration::from_secs(3_600)), "1h 0m 0s");
        assert_eq!(format_duration(Duration::from_secs(90_061)), "1d 1h 1m 1s");
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(timestamp(1_700_000_000, 'F'), "<t:1700000000:F>");
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(discord::inline_code("abc"), "`abc`");
    }
}
