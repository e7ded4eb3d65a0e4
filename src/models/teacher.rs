//! Teacher model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TeacherId;

/// A teacher receiving payouts from the center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,

    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub subject: String,
}

impl Teacher {
    pub fn new(
        id: impl Into<TeacherId>,
        full_name: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            subject: subject.into(),
        }
    }
}

impl fmt::Display for Teacher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name)
    }
}
