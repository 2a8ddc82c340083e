use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::CoreError;
use crate::storage::local::KeyValueStore;
use crate::storage::THEME_KEY;

/// Display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// "light" / "dark", as chart tooltips name them.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// The persisted dark/light flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeState {
    theme: Theme,
}

impl ThemeState {
    /// Restore from storage; anything but `"true"` means light.
    pub fn restore(storage: &dyn KeyValueStore) -> Self {
        let dark = match storage.get(THEME_KEY) {
            Ok(stored) => stored.map(|raw| raw.trim() == "true").unwrap_or(false),
            Err(e) => {
                warn!(error = %e, "could not read persisted theme, using light");
                false
            }
        };
        Self {
            theme: Theme::from_dark_flag(dark),
        }
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.theme.is_dark()
    }

    pub fn set(&mut self, storage: &mut dyn KeyValueStore, theme: Theme) -> Result<(), CoreError> {
        storage.set(THEME_KEY, if theme.is_dark() { "true" } else { "false" })?;
        self.theme = theme;
        Ok(())
    }

    /// Flip the mode and return the new one.
    pub fn toggle(&mut self, storage: &mut dyn KeyValueStore) -> Result<Theme, CoreError> {
        let next = Theme::from_dark_flag(!self.is_dark());
        self.set(storage, next)?;
        Ok(next)
    }
}
