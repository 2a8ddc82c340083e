use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::CoreError;

/// Client configuration. Everything has a default; `from_env` overlays the
/// `FINANCE_TRACKER_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Backend base URL, without a trailing slash (e.g. "http://localhost:5000/api")
    pub api_base_url: String,

    /// Per-request timeout
    pub request_timeout_secs: u64,

    /// Initial transaction page size
    pub default_page_size: u64,

    /// Trailing debounce window for filter edits
    pub filter_debounce_ms: u64,

    /// Prefix for compact amounts on chart axes
    pub currency_symbol: String,

    /// Where the session record and theme flag are persisted.
    /// `None` resolves to the platform data directory.
    pub storage_dir: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            request_timeout_secs: 30,
            default_page_size: 10,
            filter_debounce_ms: 300,
            currency_symbol: "₹".to_string(),
            storage_dir: None,
        }
    }
}

impl ClientSettings {
    /// Defaults overlaid with environment overrides:
    /// `FINANCE_TRACKER_API_URL`, `FINANCE_TRACKER_DATA_DIR`,
    /// `FINANCE_TRACKER_PAGE_SIZE`, `FINANCE_TRACKER_DEBOUNCE_MS`.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the environment in production).
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CoreError> {
        if let Some(url) = lookup("FINANCE_TRACKER_API_URL") {
            self.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(dir) = lookup("FINANCE_TRACKER_DATA_DIR") {
            self.storage_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = lookup("FINANCE_TRACKER_PAGE_SIZE") {
            self.default_page_size = parse_positive("FINANCE_TRACKER_PAGE_SIZE", &raw)?;
        }
        if let Some(raw) = lookup("FINANCE_TRACKER_DEBOUNCE_MS") {
            self.filter_debounce_ms = raw.trim().parse().map_err(|_| {
                CoreError::ValidationError(format!(
                    "FINANCE_TRACKER_DEBOUNCE_MS must be a number of milliseconds, got '{raw}'"
                ))
            })?;
        }
        Ok(self)
    }

    /// The configured storage directory, or the platform data directory.
    pub fn resolve_storage_dir(&self) -> Result<PathBuf, CoreError> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        directories::ProjectDirs::from("com", "FinanceTracker", "finance-tracker")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                CoreError::Storage("Could not determine a data directory for this platform".into())
            })
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<u64, CoreError> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CoreError::ValidationError(format!(
            "{key} must be a positive integer, got '{raw}'"
        ))),
    }
}
