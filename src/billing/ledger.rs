//! Ledger merger
//!
//! Combines student payments (money in) and teacher payouts (money out) into
//! one chronological feed, most recent first, with aggregates recomputed from
//! exactly the entries returned.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use crate::models::{
    Course, CourseId, Money, MonthKey, PaymentRecord, Student, StudentId, Teacher,
    TeacherId, TeacherPayoutRecord,
};

/// Label for ids missing from the loaded collections
pub const UNKNOWN: &str = "Unknown";

/// Details shown for money-in records not tied to a course
pub const ALL_COURSES: &str = "All Courses";

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransactionKind {
    MoneyIn,
    MoneyOut,
}

impl TransactionKind {
    /// Parse "in"/"out" (and the full names), case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "in" | "moneyin" | "money-in" => Some(Self::MoneyIn),
            "out" | "moneyout" | "money-out" => Some(Self::MoneyOut),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoneyIn => write!(f, "Money In"),
            Self::MoneyOut => write!(f, "Money Out"),
        }
    }
}

/// One row of the merged feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub kind: TransactionKind,
    /// Id of the underlying payment or payout record
    pub record_id: String,
    /// Student or teacher name
    pub counterparty: String,
    /// Course name, teacher subject, or "All Courses"
    pub details: String,
    /// Never negative; direction is carried by `kind`
    pub amount: Money,
    /// `paymentDate` if present, else the record's creation timestamp
    pub date: Option<DateTime<Utc>>,
    /// Billing period of a money-in record
    pub month_key: Option<MonthKey>,
    /// Free-text payout description
    pub memo: Option<String>,
}

/// Aggregates over a set of ledger entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub money_in: Money,
    pub money_out: Money,
    pub net: Money,
    pub money_in_count: usize,
    pub money_out_count: usize,
}

impl LedgerSummary {
    pub fn from_entries(entries: &[LedgerEntry]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            match entry.kind {
                TransactionKind::MoneyIn => {
                    summary.money_in += entry.amount;
                    summary.money_in_count += 1;
                }
                TransactionKind::MoneyOut => {
                    summary.money_out += entry.amount;
                    summary.money_out_count += 1;
                }
            }
        }
        summary.net = summary.money_in - summary.money_out;
        summary
    }
}

/// Which entries to keep
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerFilter {
    pub kind: Option<TransactionKind>,
    /// Keep entries whose effective date falls in this month
    pub month: Option<MonthKey>,
}

impl LedgerFilter {
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        if let Some(kind) = self.kind {
            if entry.kind != kind {
                return false;
            }
        }

        if let Some(month) = self.month {
            match entry.date {
                Some(date) if month.contains(date.date_naive()) => {}
                _ => return false,
            }
        }

        true
    }
}

/// The merged feed with its aggregates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ledger {
    pub entries: Vec<LedgerEntry>,
    pub summary: LedgerSummary,
}

/// How much a teacher has earned from collected fees versus been paid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherBalance {
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub subject: String,
    pub earned: Money,
    pub paid_out: Money,
    pub balance: Money,
}

/// Name lookups for one snapshot of students, courses and teachers
pub struct LedgerMerger<'a> {
    students: HashMap<&'a StudentId, &'a Student>,
    courses: HashMap<&'a CourseId, &'a Course>,
    teachers: &'a [Teacher],
    teacher_index: HashMap<&'a TeacherId, &'a Teacher>,
}

impl<'a> LedgerMerger<'a> {
    pub fn new(students: &'a [Student], courses: &'a [Course], teachers: &'a [Teacher]) -> Self {
        Self {
            students: students.iter().map(|s| (&s.id, s)).collect(),
            courses: courses.iter().map(|c| (&c.id, c)).collect(),
            teachers,
            teacher_index: teachers.iter().map(|t| (&t.id, t)).collect(),
        }
    }

    /// Merge payments and payouts into one feed, most recent first
    ///
    /// Entries with equal dates keep collection order, payments before
    /// payouts. Entries with no usable date sort last.
    pub fn merge(
        &self,
        payments: &[PaymentRecord],
        payouts: &[TeacherPayoutRecord],
        filter: &LedgerFilter,
    ) -> Ledger {
        let mut entries: Vec<LedgerEntry> = payments
            .iter()
            .map(|p| self.money_in(p))
            .chain(payouts.iter().map(|p| self.money_out(p)))
            .filter(|entry| filter.matches(entry))
            .collect();

        entries.sort_by(|a, b| b.date.cmp(&a.date));

        let summary = LedgerSummary::from_entries(&entries);
        Ledger { entries, summary }
    }

    /// Earned share versus payouts for every known teacher
    pub fn teacher_balances(
        &self,
        payments: &[PaymentRecord],
        payouts: &[TeacherPayoutRecord],
    ) -> Vec<TeacherBalance> {
        let mut earned: HashMap<&TeacherId, Money> = HashMap::new();
        for payment in payments {
            let Some(course) = payment
                .course_id
                .as_ref()
                .and_then(|id| self.courses.get(id))
            else {
                continue;
            };
            *earned.entry(&course.teacher_id).or_default() +=
                course.teacher_share(payment.amount.abs());
        }

        let mut paid_out: HashMap<&TeacherId, Money> = HashMap::new();
        for payout in payouts {
            if !self.teacher_index.contains_key(&payout.teacher_id) {
                warn!(payout = %payout.id, teacher = %payout.teacher_id, "payout to unknown teacher");
            }
            *paid_out.entry(&payout.teacher_id).or_default() += payout.amount.abs();
        }

        self.teachers
            .iter()
            .map(|teacher| {
                let earned = earned.get(&teacher.id).copied().unwrap_or_default();
                let paid_out = paid_out.get(&teacher.id).copied().unwrap_or_default();
                TeacherBalance {
                    teacher_id: teacher.id.clone(),
                    teacher_name: teacher.full_name.clone(),
                    subject: teacher.subject.clone(),
                    earned,
                    paid_out,
                    balance: earned - paid_out,
                }
            })
            .collect()
    }

    fn money_in(&self, payment: &PaymentRecord) -> LedgerEntry {
        let counterparty = match self.students.get(&payment.student_id) {
            Some(student) => student.full_name.clone(),
            None => {
                warn!(payment = %payment.id, student = %payment.student_id, "payment from unknown student");
                UNKNOWN.to_string()
            }
        };

        let details = match &payment.course_id {
            None => ALL_COURSES.to_string(),
            Some(course_id) => self
                .courses
                .get(course_id)
                .map(|c| c.course_name.clone())
                .unwrap_or_else(|| UNKNOWN.to_string()),
        };

        LedgerEntry {
            kind: TransactionKind::MoneyIn,
            record_id: payment.id.to_string(),
            counterparty,
            details,
            amount: non_negative(payment.amount, payment.id.as_str()),
            date: payment.effective_date(),
            month_key: Some(payment.month_key),
            memo: None,
        }
    }

    fn money_out(&self, payout: &TeacherPayoutRecord) -> LedgerEntry {
        let (counterparty, details) = match self.teacher_index.get(&payout.teacher_id) {
            Some(teacher) => (teacher.full_name.clone(), teacher.subject.clone()),
            None => (UNKNOWN.to_string(), UNKNOWN.to_string()),
        };

        LedgerEntry {
            kind: TransactionKind::MoneyOut,
            record_id: payout.id.to_string(),
            counterparty,
            details,
            amount: non_negative(payout.amount, payout.id.as_str()),
            date: payout.effective_date(),
            month_key: None,
            memo: payout.description.clone(),
        }
    }
}

fn non_negative(amount: Money, record_id: &str) -> Money {
    if amount.is_negative() {
        warn!(record = record_id, %amount, "negative amount on ledger record, using magnitude");
    }
    amount.abs()
}
