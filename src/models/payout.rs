//! Teacher payout records ("money out")

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{PayoutId, TeacherId};
use super::money::Money;
use crate::billing::dates;

/// A payment made by the center to a teacher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPayoutRecord {
    pub id: PayoutId,

    pub teacher_id: TeacherId,

    pub amount: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TeacherPayoutRecord {
    /// `paymentDate` if it parses, else the creation timestamp
    pub fn effective_date(&self) -> Option<DateTime<Utc>> {
        dates::effective_timestamp(self.payment_date.as_deref(), self.created_at.as_deref())
    }
}
