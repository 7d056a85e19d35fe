pub const CHECK: &str = "✅";
pub const ERROR: &str = "❌";
pub const BELL: &str = "🔔";
pub const GEAR: &str = "⚙️";
pub const TIMER: &str = "⏱️";
pub const LINK: &str = "🔗";
