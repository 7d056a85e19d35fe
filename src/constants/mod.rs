pub mod color;
pub mod emoji;

pub mod links {
    pub const DEVELOPER_PORTAL: &str = "https://discord.com/developers/applications";
}

pub mod colors {
    pub use super::color::{ERROR, MAIN, SUCCESS};
}

pub use emoji as icon;
