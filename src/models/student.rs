//! Student model
//!
//! Students are owned by the external data layer; the engine only reads them.
//! `created_at` is the enrollment timestamp and defines the billing start.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::StudentId;
use crate::billing::dates;
use crate::error::TuitionResult;

/// A student enrolled at the center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,

    #[serde(default)]
    pub full_name: String,

    /// Free text, may carry a "Grade " prefix
    #[serde(default)]
    pub grade: String,

    /// Raw enrollment timestamp as delivered by the data layer
    pub created_at: String,
}

impl Student {
    /// Create a new student record
    pub fn new(
        id: impl Into<StudentId>,
        full_name: impl Into<String>,
        grade: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            grade: grade.into(),
            created_at: created_at.into(),
        }
    }

    /// The enrollment date, failing if `createdAt` cannot be parsed
    pub fn enrolled_on(&self) -> TuitionResult<NaiveDate> {
        dates::parse_date(&self.created_at)
            .map_err(|_| dates::date_error(format!("student {}", self.id), "createdAt", &self.created_at))
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.full_name.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}", self.full_name)
        }
    }
}

/// Normalize a loosely formatted grade ("  Grade 7 " -> "7")
pub fn normalize_grade(grade: &str) -> &str {
    let trimmed = grade.trim();
    let prefix_len = "grade".len();

    match trimmed.get(..prefix_len) {
        Some(prefix) if prefix.eq_ignore_ascii_case("grade") => {
            let rest = &trimmed[prefix_len..];
            if rest.starts_with(char::is_whitespace) {
                rest.trim()
            } else {
                trimmed
            }
        }
        _ => trimmed,
    }
}

/// Whether two grade strings denote the same grade
pub fn grades_match(a: &str, b: &str) -> bool {
    normalize_grade(a) == normalize_grade(b)
}
