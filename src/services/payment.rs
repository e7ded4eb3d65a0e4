//! Payment service
//!
//! The single write path of the ledger: marking a student's charge line as
//! paid. The service never mutates derived state; callers recompute
//! obligations and the ledger from a fresh snapshot afterwards.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, warn};

use crate::audit::{AuditEntry, AuditLogger};
use crate::error::PaymentError;
use crate::models::{CourseId, Money, MonthKey, NewPayment, PaymentId, PaymentRecord, StudentId};
use crate::source::PaymentSink;

/// Service for submitting payments
pub struct PaymentService<'a, S: PaymentSink + ?Sized> {
    sink: &'a S,
    audit: Option<&'a AuditLogger>,
}

impl<'a, S: PaymentSink + ?Sized> PaymentService<'a, S> {
    pub fn new(sink: &'a S) -> Self {
        Self { sink, audit: None }
    }

    /// Record every submission outcome in `logger`
    pub fn with_audit(mut self, logger: &'a AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Mark an obligation as paid, stamped with the current time
    ///
    /// `course_id` of `None` records a whole-month payment, which appears in
    /// the ledger but settles no individual course.
    pub fn mark_obligation_paid(
        &self,
        student_id: &StudentId,
        month: MonthKey,
        amount: Money,
        course_id: Option<CourseId>,
    ) -> Result<PaymentRecord, PaymentError> {
        self.mark_obligation_paid_at(student_id, month, amount, course_id, Utc::now())
    }

    /// Mark an obligation as paid with an explicit payment timestamp
    pub fn mark_obligation_paid_at(
        &self,
        student_id: &StudentId,
        month: MonthKey,
        amount: Money,
        course_id: Option<CourseId>,
        paid_at: DateTime<Utc>,
    ) -> Result<PaymentRecord, PaymentError> {
        let payment = NewPayment {
            student_id: student_id.clone(),
            month_key: month,
            amount,
            course_id,
            payment_date: paid_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        if let Err(e) = validate(&payment) {
            self.record(AuditEntry::rejected(&payment, e.reason()));
            return Err(e);
        }

        let response = self
            .sink
            .create_payment(&payment)
            .map_err(|e| PaymentError::Transport(e.0))?;

        if !response.success {
            let reason = response
                .message
                .unwrap_or_else(|| "the data layer refused the payment".to_string());
            self.record(AuditEntry::rejected(&payment, reason.clone()));
            return Err(PaymentError::Rejected(reason));
        }

        // A data layer that does not echo the record still accepted it
        let record = response
            .payment
            .unwrap_or_else(|| PaymentRecord::from_new(PaymentId::generate(), payment));

        info!(
            payment = %record.id,
            student = %record.student_id,
            month = %record.month_key,
            amount = %record.amount,
            "payment recorded"
        );
        self.record(AuditEntry::created(&record));

        Ok(record)
    }

    fn record(&self, entry: AuditEntry) {
        if let Some(logger) = self.audit {
            if let Err(e) = logger.log(&entry) {
                warn!(error = %e, "failed to write audit entry");
            }
        }
    }
}

fn validate(payment: &NewPayment) -> Result<(), PaymentError> {
    if payment.student_id.as_str().trim().is_empty() {
        return Err(PaymentError::Invalid("Student id cannot be empty".into()));
    }
    if !payment.amount.is_positive() {
        return Err(PaymentError::Invalid(format!(
            "Amount must be positive, got {}",
            payment.amount
        )));
    }
    if let Some(course) = &payment.course_id {
        if course.as_str().trim().is_empty() {
            return Err(PaymentError::Invalid("Course id cannot be empty".into()));
        }
    }
    Ok(())
}
