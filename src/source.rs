//! Boundaries to the external data layer
//!
//! The engine consumes read operations through `DataSource` and submits new
//! payments through `PaymentSink`. `Snapshot` is one consistent read of every
//! collection; derived ledgers are always recomputed from the latest one.

use chrono::NaiveDate;
use thiserror::Error;

use crate::billing::{LedgerMerger, ObligationCalculator};
use crate::error::{TuitionError, TuitionResult};
use crate::models::{
    Course, CreatePaymentResponse, NewPayment, PaymentRecord, Student, StudentId, Teacher,
    TeacherPayoutRecord,
};

/// Read side of the data layer
pub trait DataSource {
    fn list_students(&self) -> TuitionResult<Vec<Student>>;
    fn list_courses(&self) -> TuitionResult<Vec<Course>>;
    fn list_teachers(&self) -> TuitionResult<Vec<Teacher>>;
    fn list_payments(&self) -> TuitionResult<Vec<PaymentRecord>>;
    fn list_teacher_payouts(&self) -> TuitionResult<Vec<TeacherPayoutRecord>>;

    /// Fetch every collection
    fn snapshot(&self) -> TuitionResult<Snapshot> {
        Ok(Snapshot {
            students: self.list_students()?,
            courses: self.list_courses()?,
            teachers: self.list_teachers()?,
            payments: self.list_payments()?,
            payouts: self.list_teacher_payouts()?,
        })
    }
}

/// The data layer could not be reached or failed to persist
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Write side of the data layer
pub trait PaymentSink {
    /// Submit a payment; `Ok` carries the data layer's verdict
    fn create_payment(&self, payment: &NewPayment) -> Result<CreatePaymentResponse, TransportError>;
}

/// One read of every collection
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub students: Vec<Student>,
    pub courses: Vec<Course>,
    pub teachers: Vec<Teacher>,
    pub payments: Vec<PaymentRecord>,
    pub payouts: Vec<TeacherPayoutRecord>,
}

impl Snapshot {
    /// Look up a student by id
    pub fn student(&self, id: &StudentId) -> TuitionResult<&Student> {
        self.students
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| TuitionError::student_not_found(id.to_string()))
    }

    /// Obligation calculator over this snapshot
    pub fn calculator(&self, today: NaiveDate) -> ObligationCalculator<'_> {
        ObligationCalculator::new(&self.courses, &self.payments, today)
    }

    /// Ledger merger over this snapshot
    pub fn merger(&self) -> LedgerMerger<'_> {
        LedgerMerger::new(&self.students, &self.courses, &self.teachers)
    }
}
