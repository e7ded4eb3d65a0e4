//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Money, MonthKey, NewPayment, PaymentRecord, StudentId};

/// What happened to a submitted payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// The data layer stored the payment
    Create,
    /// Validation or the data layer refused it
    Reject,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Reject => write!(f, "REJECT"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    /// Id of the stored payment; absent for rejections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,

    pub student_id: StudentId,

    pub month_key: MonthKey,

    pub amount: Money,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,

    /// Why the payment was refused
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// JSON of the stored record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<serde_json::Value>,
}

impl AuditEntry {
    /// Entry for a payment the data layer accepted
    pub fn created(payment: &PaymentRecord) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            payment_id: Some(payment.id.to_string()),
            student_id: payment.student_id.clone(),
            month_key: payment.month_key,
            amount: payment.amount,
            course_id: payment.course_id.as_ref().map(|c| c.to_string()),
            reason: None,
            record: serde_json::to_value(payment).ok(),
        }
    }

    /// Entry for a payment that was refused
    pub fn rejected(payment: &NewPayment, reason: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Reject,
            payment_id: None,
            student_id: payment.student_id.clone(),
            month_key: payment.month_key,
            amount: payment.amount,
            course_id: payment.course_id.as_ref().map(|c| c.to_string()),
            reason: Some(reason.into()),
            record: None,
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} student {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.student_id,
            self.month_key,
            self.amount
        );

        if let Some(course) = &self.course_id {
            output.push_str(&format!(" course {}", course));
        }

        if let Some(id) = &self.payment_id {
            output.push_str(&format!(" -> {}", id));
        }

        if let Some(reason) = &self.reason {
            output.push_str(&format!("\n  Reason: {}", reason));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseId, PaymentId};

    fn new_payment() -> NewPayment {
        NewPayment {
            student_id: StudentId::new("s-1"),
            month_key: MonthKey::parse("2024-05").unwrap(),
            amount: Money::from_cents(4500),
            course_id: Some(CourseId::new("c-1")),
            payment_date: "2024-05-02T08:00:00Z".into(),
        }
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Reject.to_string(), "REJECT");
    }

    #[test]
    fn test_created_entry() {
        let record = PaymentRecord::from_new(PaymentId::new("p-1"), new_payment());
        let entry = AuditEntry::created(&record);

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.payment_id.as_deref(), Some("p-1"));
        assert_eq!(entry.course_id.as_deref(), Some("c-1"));
        assert!(entry.record.is_some());
        assert!(entry.reason.is_none());
    }

    #[test]
    fn test_rejected_entry() {
        let entry = AuditEntry::rejected(&new_payment(), "already paid");

        assert_eq!(entry.operation, Operation::Reject);
        assert!(entry.payment_id.is_none());
        assert!(entry.record.is_none());
        assert_eq!(entry.reason.as_deref(), Some("already paid"));
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::rejected(&new_payment(), "nope");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""operation":"reject""#));
        assert!(json.contains(r#""month_key":"2024-05""#));

        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.amount, Money::from_cents(4500));
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::rejected(&new_payment(), "already paid");
        let formatted = entry.format_human_readable();
        assert!(formatted.contains("REJECT"));
        assert!(formatted.contains("2024-05"));
        assert!(formatted.contains("45.00"));
        assert!(formatted.contains("Reason: already paid"));
    }
}
