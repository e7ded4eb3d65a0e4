//! Payment matching
//!
//! Associates raw payment records with `(student, month, course)` charge
//! lines. A record matches only when all three keys are equal; whole-month
//! records (no course) are never matched here.
//!
//! The data layer does not guarantee uniqueness of the key. When several
//! records share a key, the first one in collection order wins and the rest
//! are ignored for matching, so `paid_amount` is never double-counted.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::warn;

use crate::models::{CourseId, MonthKey, PaymentRecord, StudentId};

type MatchKey = (StudentId, MonthKey, CourseId);

/// Indexed matcher built once per payment snapshot
#[derive(Debug)]
pub struct PaymentMatcher<'a> {
    payments: &'a [PaymentRecord],
    index: HashMap<MatchKey, usize>,
    duplicates: usize,
}

impl<'a> PaymentMatcher<'a> {
    /// Index a payment snapshot
    pub fn new(payments: &'a [PaymentRecord]) -> Self {
        let mut index = HashMap::with_capacity(payments.len());
        let mut duplicates = 0;

        for (position, payment) in payments.iter().enumerate() {
            let Some(course_id) = &payment.course_id else {
                continue;
            };
            let key = (payment.student_id.clone(), payment.month_key, course_id.clone());

            match index.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
                Entry::Occupied(slot) => {
                    let kept = &payments[*slot.get()];
                    warn!(
                        student = %payment.student_id,
                        month = %payment.month_key,
                        course = %course_id,
                        kept = %kept.id,
                        ignored = %payment.id,
                        "duplicate payment for the same charge line"
                    );
                    duplicates += 1;
                }
            }
        }

        Self {
            payments,
            index,
            duplicates,
        }
    }

    /// The record settling this charge line, if any
    pub fn find(
        &self,
        student_id: &StudentId,
        month: MonthKey,
        course_id: &CourseId,
    ) -> Option<&'a PaymentRecord> {
        let key = (student_id.clone(), month, course_id.clone());
        self.index.get(&key).map(|&position| &self.payments[position])
    }

    /// Number of records ignored because an earlier record had the same key
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PaymentId};

    fn payment(id: &str, student: &str, month: &str, course: Option<&str>) -> PaymentRecord {
        PaymentRecord {
            id: PaymentId::new(id),
            student_id: StudentId::new(student),
            course_id: course.map(CourseId::new),
            month_key: MonthKey::parse(month).unwrap(),
            amount: Money::from_cents(10000),
            payment_date: Some("2024-01-10".into()),
            created_at: None,
        }
    }

    #[test]
    fn test_exact_match() {
        let payments = vec![
            payment("p-1", "s-1", "2024-01", Some("c-1")),
            payment("p-2", "s-1", "2024-02", Some("c-1")),
        ];
        let matcher = PaymentMatcher::new(&payments);
        let feb = MonthKey::parse("2024-02").unwrap();

        let found = matcher
            .find(&StudentId::new("s-1"), feb, &CourseId::new("c-1"))
            .unwrap();
        assert_eq!(found.id.as_str(), "p-2");
        assert!(matcher
            .find(&StudentId::new("s-1"), feb, &CourseId::new("c-2"))
            .is_none());
        assert!(matcher
            .find(&StudentId::new("s-2"), feb, &CourseId::new("c-1"))
            .is_none());
    }

    #[test]
    fn test_whole_month_records_are_not_indexed() {
        let payments = vec![payment("p-1", "s-1", "2024-01", None)];
        let matcher = PaymentMatcher::new(&payments);
        let jan = MonthKey::parse("2024-01").unwrap();

        assert!(matcher
            .find(&StudentId::new("s-1"), jan, &CourseId::new("c-1"))
            .is_none());
        assert_eq!(matcher.duplicate_count(), 0);
    }

    #[test]
    fn test_duplicates_resolve_to_first_record() {
        let payments = vec![
            payment("p-1", "s-1", "2024-01", Some("c-1")),
            payment("p-2", "s-1", "2024-01", Some("c-1")),
            payment("p-3", "s-1", "2024-01", Some("c-1")),
        ];
        let matcher = PaymentMatcher::new(&payments);
        let jan = MonthKey::parse("2024-01").unwrap();
        let student = StudentId::new("s-1");
        let course = CourseId::new("c-1");

        assert_eq!(matcher.find(&student, jan, &course).unwrap().id.as_str(), "p-1");
        assert_eq!(matcher.duplicate_count(), 2);
    }
}
