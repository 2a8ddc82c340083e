use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::session::Session;
use crate::storage::local::KeyValueStore;
use crate::storage::SESSION_KEY;

/// The current authenticated identity, or none.
///
/// Written only by login/register (`set`) and logout/401 (`clear`); both
/// persist immediately under [`SESSION_KEY`].
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    current: Option<Session>,
}

impl SessionState {
    /// Restore the persisted session. A corrupt record is discarded.
    pub fn restore(storage: &mut dyn KeyValueStore) -> Self {
        let stored = match storage.get(SESSION_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "could not read persisted session");
                return Self::default();
            }
        };
        let current = stored.and_then(|raw| match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "discarding unreadable persisted session");
                if let Err(e) = storage.remove(SESSION_KEY) {
                    warn!(error = %e, "could not remove unreadable session record");
                }
                None
            }
        });
        Self { current }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    /// "First Last", or "User" when logged out.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.current
            .as_ref()
            .map(Session::display_name)
            .unwrap_or_else(|| "User".to_string())
    }

    /// Avatar initials, or "U" when logged out.
    #[must_use]
    pub fn initials(&self) -> String {
        self.current
            .as_ref()
            .map(Session::initials)
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| "U".to_string())
    }

    #[must_use]
    pub fn email(&self) -> &str {
        self.current.as_ref().map(|s| s.email.as_str()).unwrap_or("")
    }

    /// Persist and adopt a new session.
    pub fn set(&mut self, storage: &mut dyn KeyValueStore, session: Session) -> Result<(), CoreError> {
        let raw = serde_json::to_string(&session)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize session: {e}")))?;
        storage.set(SESSION_KEY, &raw)?;
        info!(user = %session.email, "session started");
        self.current = Some(session);
        Ok(())
    }

    /// Forget the session in memory and in storage.
    ///
    /// The in-memory session is cleared even if storage fails.
    pub fn clear(&mut self, storage: &mut dyn KeyValueStore) -> Result<(), CoreError> {
        if self.current.take().is_some() {
            info!("session cleared");
        }
        storage.remove(SESSION_KEY)
    }
}
