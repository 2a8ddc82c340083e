// ═══════════════════════════════════════════════════════════════════
// Storage Tests — key/value stores, persisted session and theme,
// context init
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use finance_tracker_core::errors::CoreError;
use finance_tracker_core::models::period::Period;
use finance_tracker_core::models::session::Session;
use finance_tracker_core::models::settings::ClientSettings;
use finance_tracker_core::services::context::AppContext;
use finance_tracker_core::services::session_service::SessionState;
use finance_tracker_core::services::theme_service::{Theme, ThemeState};
use finance_tracker_core::storage::local::{FileStore, KeyValueStore, MemoryStore};
use finance_tracker_core::storage::{SESSION_KEY, THEME_KEY};

fn make_session() -> Session {
    Session {
        id: "42".into(),
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        email: "asha@example.com".into(),
        token: "jwt-token".into(),
    }
}

// ═══════════════════════════════════════════════════════════════════
// MemoryStore
// ═══════════════════════════════════════════════════════════════════

mod memory_store {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("darkMode", "true").unwrap();
        assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("true"));
        assert_eq!(store.len(), 1);
        store.remove("darkMode").unwrap();
        assert_eq!(store.get("darkMode").unwrap(), None);
    }

    #[test]
    fn removing_missing_key_is_ok() {
        let mut store = MemoryStore::new();
        assert!(store.remove("nothing").is_ok());
    }
}

// ═══════════════════════════════════════════════════════════════════
// FileStore
// ═══════════════════════════════════════════════════════════════════

mod file_store {
    use super::*;

    #[test]
    fn persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.set(SESSION_KEY, "{\"id\":\"1\"}").unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(
            reopened.get(SESSION_KEY).unwrap().as_deref(),
            Some("{\"id\":\"1\"}")
        );
        assert!(dir.path().join("user_session.json").exists());
    }

    #[test]
    fn creates_directory_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut store = FileStore::new(&nested);
        assert_eq!(store.get(THEME_KEY).unwrap(), None);
        store.set(THEME_KEY, "false").unwrap();
        assert!(nested.join("darkMode.json").exists());
    }

    #[test]
    fn overwrite_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.set(THEME_KEY, "true").unwrap();
        store.set(THEME_KEY, "false").unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("false"));
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["darkMode.json".to_string()]);
    }

    #[test]
    fn remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        assert!(store.remove(SESSION_KEY).is_ok());
    }

    #[test]
    fn path_like_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        assert!(matches!(store.set("../escape", "x"), Err(CoreError::Storage(_))));
        assert!(matches!(store.get(""), Err(CoreError::Storage(_))));
    }
}

// ═══════════════════════════════════════════════════════════════════
// SessionState
// ═══════════════════════════════════════════════════════════════════

mod session_state {
    use super::*;

    #[test]
    fn set_persists_and_restore_reads_back() {
        let mut store = MemoryStore::new();
        let mut state = SessionState::default();
        state.set(&mut store, make_session()).unwrap();
        assert!(store.get(SESSION_KEY).unwrap().is_some());

        let restored = SessionState::restore(&mut store);
        assert_eq!(restored.current(), Some(&make_session()));
        assert_eq!(restored.token(), Some("jwt-token"));
        assert_eq!(restored.display_name(), "Asha Rao");
        assert_eq!(restored.initials(), "AR");
    }

    #[test]
    fn logged_out_fallbacks() {
        let state = SessionState::default();
        assert!(!state.is_authenticated());
        assert_eq!(state.display_name(), "User");
        assert_eq!(state.initials(), "U");
        assert_eq!(state.email(), "");
    }

    #[test]
    fn clear_removes_record() {
        let mut store = MemoryStore::new();
        let mut state = SessionState::default();
        state.set(&mut store, make_session()).unwrap();
        state.clear(&mut store).unwrap();
        assert!(!state.is_authenticated());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn corrupt_record_discarded() {
        let mut store = MemoryStore::new();
        store.set(SESSION_KEY, "{not json").unwrap();
        let state = SessionState::restore(&mut store);
        assert!(!state.is_authenticated());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn persisted_shape_is_camel_case() {
        let mut store = MemoryStore::new();
        SessionState::default().set(&mut store, make_session()).unwrap();
        let raw = store.get(SESSION_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["firstName"], "Asha");
        assert_eq!(value["token"], "jwt-token");
    }
}

// ═══════════════════════════════════════════════════════════════════
// ThemeState
// ═══════════════════════════════════════════════════════════════════

mod theme_state {
    use super::*;

    #[test]
    fn missing_flag_means_light() {
        let store = MemoryStore::new();
        assert_eq!(ThemeState::restore(&store).theme(), Theme::Light);
    }

    #[test]
    fn only_true_means_dark() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "true").unwrap();
        assert!(ThemeState::restore(&store).is_dark());
        store.set(THEME_KEY, "yes").unwrap();
        assert!(!ThemeState::restore(&store).is_dark());
    }

    #[test]
    fn toggle_persists() {
        let mut store = MemoryStore::new();
        let mut state = ThemeState::restore(&store);
        assert_eq!(state.toggle(&mut store).unwrap(), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(state.toggle(&mut store).unwrap(), Theme::Light);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("false"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// AppContext
// ═══════════════════════════════════════════════════════════════════

mod context_init {
    use super::*;

    #[test]
    fn restores_persisted_state() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "true").unwrap();
        SessionState::default().set(&mut store, make_session()).unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let ctx = AppContext::init(ClientSettings::default(), Box::new(store), today);
        assert!(ctx.session.is_authenticated());
        assert!(ctx.theme.is_dark());
        assert_eq!(ctx.period.current(), Period::new(3, 2025).unwrap());
    }

    #[test]
    fn file_backed_init_uses_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ClientSettings {
            storage_dir: Some(dir.path().to_path_buf()),
            ..ClientSettings::default()
        };
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();

        let mut ctx = AppContext::init_from_settings(settings.clone(), today).unwrap();
        let (theme, storage) = ctx.theme_mut();
        theme.toggle(storage).unwrap();
        assert!(dir.path().join("darkMode.json").exists());

        let reopened = AppContext::init_from_settings(settings, today).unwrap();
        assert!(reopened.theme.is_dark());
    }
}
