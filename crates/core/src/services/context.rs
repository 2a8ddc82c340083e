use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::settings::ClientSettings;
use crate::storage::local::{FileStore, KeyValueStore};

use super::period_service::PeriodSelector;
use super::session_service::SessionState;
use super::theme_service::ThemeState;

/// Process-wide state, created once at startup and passed explicitly to
/// whatever needs it.
///
/// - Session and theme are restored from `storage` on init.
/// - The period starts at the month containing `today`.
/// - Only logout (or a 401) tears anything down, and only the session.
pub struct AppContext {
    pub settings: ClientSettings,
    pub session: SessionState,
    pub theme: ThemeState,
    pub period: PeriodSelector,
    storage: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("authenticated", &self.session.is_authenticated())
            .field("theme", &self.theme.theme())
            .field("period", &self.period.current())
            .finish()
    }
}

impl AppContext {
    pub fn init(
        settings: ClientSettings,
        mut storage: Box<dyn KeyValueStore>,
        today: NaiveDate,
    ) -> Self {
        let session = SessionState::restore(storage.as_mut());
        let theme = ThemeState::restore(storage.as_ref());
        Self {
            settings,
            session,
            theme,
            period: PeriodSelector::starting_at(today),
            storage,
        }
    }

    /// Init backed by files in the configured (or platform) data directory.
    pub fn init_from_settings(settings: ClientSettings, today: NaiveDate) -> Result<Self, CoreError> {
        let dir = settings.resolve_storage_dir()?;
        Ok(Self::init(settings, Box::new(FileStore::new(dir)), today))
    }

    /// Session and storage borrowed together, for writes that persist.
    pub fn session_mut(&mut self) -> (&mut SessionState, &mut dyn KeyValueStore) {
        (&mut self.session, self.storage.as_mut())
    }

    pub fn theme_mut(&mut self) -> (&mut ThemeState, &mut dyn KeyValueStore) {
        (&mut self.theme, self.storage.as_mut())
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }
}
