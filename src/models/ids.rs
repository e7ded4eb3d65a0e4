//! Strongly-typed ID wrappers for all entity types
//!
//! Ids are opaque strings issued by the data layer. Wrapping them in newtypes
//! prevents accidentally joining a payment to a teacher id at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Borrow the raw identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(StudentId);
define_id!(CourseId);
define_id!(TeacherId);
define_id!(PaymentId);
define_id!(PayoutId);
