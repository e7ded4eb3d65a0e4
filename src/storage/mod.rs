//! Storage layer for the tuition ledger
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. `JsonStore` is the bundled data layer: it serves every read the
//! engine needs and accepts new payments.

pub mod collection;
pub mod file_io;
pub mod init;
pub mod payments;

pub use collection::JsonCollection;
pub use file_io::{json_file_health, read_json, write_json_atomic, FileHealth, FileLock};
pub use init::{initialize_storage, needs_initialization};
pub use payments::{AppendOutcome, PaymentRepository};

use tracing::{debug, warn};

use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::error::TuitionResult;
use crate::models::{
    Course, CreatePaymentResponse, NewPayment, PaymentRecord, Student, Teacher,
    TeacherPayoutRecord,
};
use crate::source::{DataSource, PaymentSink, TransportError};

/// JSON-file data layer with one file per collection
pub struct JsonStore {
    paths: LedgerPaths,
    pub students: JsonCollection<Student>,
    pub courses: JsonCollection<Course>,
    pub teachers: JsonCollection<Teacher>,
    pub payments: PaymentRepository,
    pub payouts: JsonCollection<TeacherPayoutRecord>,
    reject_duplicate_payments: bool,
}

impl JsonStore {
    /// Create a new store rooted at `paths`
    pub fn new(paths: LedgerPaths, settings: &Settings) -> TuitionResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            students: JsonCollection::new(paths.students_file(), "students"),
            courses: JsonCollection::new(paths.courses_file(), "courses"),
            teachers: JsonCollection::new(paths.teachers_file(), "teachers"),
            payments: PaymentRepository::new(paths.payments_file()),
            payouts: JsonCollection::new(paths.payouts_file(), "payouts"),
            reject_duplicate_payments: settings.reject_duplicate_payments,
            paths,
        })
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn rejects_duplicates(&self) -> bool {
        self.reject_duplicate_payments
    }
}

impl DataSource for JsonStore {
    fn list_students(&self) -> TuitionResult<Vec<Student>> {
        let students = self.students.load()?;
        debug!(count = students.len(), "loaded students");
        Ok(students)
    }

    fn list_courses(&self) -> TuitionResult<Vec<Course>> {
        let courses = self.courses.load()?;
        for course in &courses {
            if let Err(e) = course.validate() {
                warn!(course = %course.id, error = %e, "course has suspicious billing data");
            }
        }
        debug!(count = courses.len(), "loaded courses");
        Ok(courses)
    }

    fn list_teachers(&self) -> TuitionResult<Vec<Teacher>> {
        let teachers = self.teachers.load()?;
        debug!(count = teachers.len(), "loaded teachers");
        Ok(teachers)
    }

    fn list_payments(&self) -> TuitionResult<Vec<PaymentRecord>> {
        let payments = self.payments.list()?;
        debug!(count = payments.len(), "loaded payments");
        Ok(payments)
    }

    fn list_teacher_payouts(&self) -> TuitionResult<Vec<TeacherPayoutRecord>> {
        let payouts = self.payouts.load()?;
        debug!(count = payouts.len(), "loaded teacher payouts");
        Ok(payouts)
    }
}

impl PaymentSink for JsonStore {
    fn create_payment(&self, payment: &NewPayment) -> Result<CreatePaymentResponse, TransportError> {
        let outcome = self
            .payments
            .append(payment, self.reject_duplicate_payments)
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(match outcome {
            AppendOutcome::Created(record) => CreatePaymentResponse::accepted(record),
            AppendOutcome::Duplicate(existing) => {
                let course = existing
                    .course_id
                    .as_ref()
                    .map(|c| format!("course {}", c))
                    .unwrap_or_else(|| "the whole month".to_string());
                CreatePaymentResponse::rejected(format!(
                    "Payment {} already covers {} for student {} in {}",
                    existing.id, course, existing.student_id, existing.month_key
                ))
            }
        })
    }
}
