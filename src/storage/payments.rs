//! Payment repository for JSON storage
//!
//! Payments are append-only. Every append holds an exclusive file lock over
//! its load, duplicate check and save, so separate processes writing the
//! same file cannot lose records or both pass the duplicate check.

use std::path::PathBuf;

use super::collection::JsonCollection;
use super::file_io::FileLock;
use crate::error::TuitionResult;
use crate::models::{NewPayment, PaymentId, PaymentRecord};

/// Result of an append attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AppendOutcome {
    Created(PaymentRecord),
    /// An earlier record already covers the same (student, month, course)
    Duplicate(PaymentRecord),
}

/// Repository for payment persistence
pub struct PaymentRepository {
    collection: JsonCollection<PaymentRecord>,
}

impl PaymentRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            collection: JsonCollection::new(path, "payments"),
        }
    }

    /// All payments in collection order
    pub fn list(&self) -> TuitionResult<Vec<PaymentRecord>> {
        self.collection.load()
    }

    /// Append a payment, optionally refusing a second one for the same key
    pub fn append(&self, new: &NewPayment, reject_duplicates: bool) -> TuitionResult<AppendOutcome> {
        let _lock = FileLock::acquire(self.collection.path())?;

        let mut payments = self.collection.load()?;

        if reject_duplicates {
            let existing = payments.iter().find(|p| {
                p.student_id == new.student_id
                    && p.month_key == new.month_key
                    && p.course_id == new.course_id
            });
            if let Some(existing) = existing {
                return Ok(AppendOutcome::Duplicate(existing.clone()));
            }
        }

        let record = PaymentRecord::from_new(PaymentId::generate(), new.clone());
        payments.push(record.clone());
        self.collection.save(&payments)?;

        Ok(AppendOutcome::Created(record))
    }
}
