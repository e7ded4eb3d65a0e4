//! Storage initialization
//!
//! Handles first-run setup: directories, empty collection files, and the
//! settings file.

use tracing::info;

use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::error::TuitionResult;
use crate::models::{Course, PaymentRecord, Student, Teacher, TeacherPayoutRecord};

use super::collection::JsonCollection;

/// Initialize storage for a fresh installation
///
/// Existing collection files are left untouched. Returns the names of the
/// collections that were created.
pub fn initialize_storage(paths: &LedgerPaths, settings: &Settings) -> TuitionResult<Vec<&'static str>> {
    paths.ensure_directories()?;

    let mut created = Vec::new();

    if JsonCollection::<Student>::new(paths.students_file(), "students").ensure_exists()? {
        created.push("students");
    }
    if JsonCollection::<Course>::new(paths.courses_file(), "courses").ensure_exists()? {
        created.push("courses");
    }
    if JsonCollection::<Teacher>::new(paths.teachers_file(), "teachers").ensure_exists()? {
        created.push("teachers");
    }
    if JsonCollection::<PaymentRecord>::new(paths.payments_file(), "payments").ensure_exists()? {
        created.push("payments");
    }
    if JsonCollection::<TeacherPayoutRecord>::new(paths.payouts_file(), "payouts").ensure_exists()? {
        created.push("payouts");
    }

    if !paths.settings_file().exists() {
        settings.save(paths)?;
    }

    info!(created = ?created, base = %paths.base_dir().display(), "storage initialized");
    Ok(created)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.is_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));

        let created = initialize_storage(&paths, &Settings::default()).unwrap();

        assert_eq!(created.len(), 5);
        assert!(!needs_initialization(&paths));
        for (_, file) in paths.collection_files() {
            assert!(file.exists());
        }
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths, &Settings::default()).unwrap();

        let teachers = JsonCollection::<Teacher>::new(paths.teachers_file(), "teachers");
        teachers.save(&[Teacher::new("t-1", "Amy", "Math")]).unwrap();

        let created = initialize_storage(&paths, &Settings::default()).unwrap();
        assert!(created.is_empty());
        assert_eq!(teachers.load().unwrap().len(), 1);
    }
}
