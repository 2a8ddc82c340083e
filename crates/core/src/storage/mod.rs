pub mod local;

/// Storage key of the persisted session record.
pub const SESSION_KEY: &str = "user_session";

/// Storage key of the persisted dark-mode flag.
pub const THEME_KEY: &str = "darkMode";
