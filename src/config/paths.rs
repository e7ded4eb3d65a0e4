//! Path management for the tuition ledger
//!
//! Provides XDG-compliant path resolution for configuration, collection data,
//! and the audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `TUITION_LEDGER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/tuition-ledger` or `~/.config/tuition-ledger`
//! 3. Windows: `%APPDATA%\tuition-ledger`

use std::path::PathBuf;

use crate::error::TuitionError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "TUITION_LEDGER_DATA_DIR";

/// Manages all paths used by the tuition ledger
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    base_dir: PathBuf,
}

impl LedgerPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, TuitionError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the collection files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn students_file(&self) -> PathBuf {
        self.data_dir().join("students.json")
    }

    pub fn courses_file(&self) -> PathBuf {
        self.data_dir().join("courses.json")
    }

    pub fn teachers_file(&self) -> PathBuf {
        self.data_dir().join("teachers.json")
    }

    pub fn payments_file(&self) -> PathBuf {
        self.data_dir().join("payments.json")
    }

    pub fn payouts_file(&self) -> PathBuf {
        self.data_dir().join("payouts.json")
    }

    /// Every collection file with its display name
    pub fn collection_files(&self) -> Vec<(&'static str, PathBuf)> {
        vec![
            ("students", self.students_file()),
            ("courses", self.courses_file()),
            ("teachers", self.teachers_file()),
            ("payments", self.payments_file()),
            ("payouts", self.payouts_file()),
        ]
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), TuitionError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TuitionError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| TuitionError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the ledger has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default base directory based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, TuitionError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                TuitionError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("tuition-ledger"))
}

/// Resolve the default base directory based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, TuitionError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| TuitionError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("tuition-ledger"))
}
