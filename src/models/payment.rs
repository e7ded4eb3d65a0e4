//! Student payment records ("money in")
//!
//! A payment is keyed to a billing period by `month_key` and optionally to a
//! single course. A record with no course is a whole-month payment: it shows
//! up in the ledger but never settles an individual charge line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CourseId, PaymentId, StudentId};
use super::money::Money;
use super::month::MonthKey;
use crate::billing::dates;

/// A payment received from a student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: PaymentId,

    pub student_id: StudentId,

    /// `None` for whole-month payments not tied to a course
    #[serde(default)]
    pub course_id: Option<CourseId>,

    pub month_key: MonthKey,

    pub amount: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl PaymentRecord {
    /// Materialize a submitted payment under a freshly issued id
    pub fn from_new(id: PaymentId, new: NewPayment) -> Self {
        Self {
            id,
            student_id: new.student_id,
            course_id: new.course_id,
            month_key: new.month_key,
            amount: new.amount,
            created_at: Some(new.payment_date.clone()),
            payment_date: Some(new.payment_date),
        }
    }

    /// `paymentDate` if it parses, else the creation timestamp
    pub fn effective_date(&self) -> Option<DateTime<Utc>> {
        dates::effective_timestamp(self.payment_date.as_deref(), self.created_at.as_deref())
    }
}

/// The payload of `createPayment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub student_id: StudentId,
    pub month_key: MonthKey,
    pub amount: Money,
    #[serde(default)]
    pub course_id: Option<CourseId>,
    pub payment_date: String,
}

/// The data layer's answer to `createPayment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The stored record, when the data layer echoes it back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentRecord>,
}

impl CreatePaymentResponse {
    pub fn accepted(payment: PaymentRecord) -> Self {
        Self {
            success: true,
            message: None,
            payment: Some(payment),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            payment: None,
        }
    }
}
