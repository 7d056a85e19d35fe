use poise::serenity_prelude::Colour;

/// Discord blurple, used for neutral embeds.
pub const MAIN: Colour = Colour::new(0x5865F2);
pub const SUCCESS: Colour = Colour::new(0x00FF00);
pub const ERROR: Colour = Colour::new(0xFF0000);
