//! User settings for the tuition ledger
//!
//! Display preferences, the refresh interval used by watch mode, and the
//! duplicate-payment policy of the bundled JSON store.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::TuitionError;

/// Settings persisted in `config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol shown before amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Seconds between snapshot refreshes in watch mode
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Refuse a second payment for the same (student, month, course)
    #[serde(default = "default_reject_duplicates")]
    pub reject_duplicate_payments: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

fn default_reject_duplicates() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            poll_interval_secs: default_poll_interval(),
            reject_duplicate_payments: default_reject_duplicates(),
        }
    }
}

impl Settings {
    /// Poll interval, never below one second
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, TuitionError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not saved here; `init` decides when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| TuitionError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| TuitionError::Config(format!("Failed to parse settings file: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would fail later at render time
    pub fn validate(&self) -> Result<(), TuitionError> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(TuitionError::Config(format!(
                "Invalid date_format '{}' in settings file",
                self.date_format
            )));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), TuitionError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TuitionError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TuitionError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
