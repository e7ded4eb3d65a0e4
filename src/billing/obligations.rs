//! Obligation calculator
//!
//! Derives, for one student, the month-by-month list of amounts owed across
//! all enrolled courses, which of those charges are paid, and what remains
//! outstanding. Everything here is recomputed from the snapshot passed in;
//! nothing is cached between calls.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::dates::month_range;
use super::matcher::PaymentMatcher;
use crate::error::TuitionResult;
use crate::models::{
    grades_match, Course, CourseId, Money, MonthKey, PaymentId, PaymentRecord, Student, StudentId,
};

/// Settlement state of one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ObligationStatus {
    /// Every charge line is paid
    Paid,
    /// Something is paid, not everything
    Partial,
    /// Nothing is paid
    Pending,
}

impl ObligationStatus {
    fn from_lines(lines: &[ChargeLine], paid_amount: Money) -> Self {
        if !lines.is_empty() && lines.iter().all(|line| line.is_paid) {
            Self::Paid
        } else if paid_amount.is_positive() {
            Self::Partial
        } else {
            Self::Pending
        }
    }
}

impl fmt::Display for ObligationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paid => write!(f, "Paid"),
            Self::Partial => write!(f, "Partial"),
            Self::Pending => write!(f, "Pending"),
        }
    }
}

/// One course's contribution to a monthly obligation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeLine {
    pub course_id: CourseId,
    pub course_name: String,
    pub fee: Money,
    pub subject: String,
    pub grade: String,
    pub is_paid: bool,
    pub payment_date: Option<String>,
    pub payment_id: Option<PaymentId>,
}

impl ChargeLine {
    fn new(course: &Course, payment: Option<&PaymentRecord>) -> Self {
        Self {
            course_id: course.id.clone(),
            course_name: course.course_name.clone(),
            fee: course.course_fee,
            subject: course.subject.clone(),
            grade: course.grade.clone(),
            is_paid: payment.is_some(),
            payment_date: payment.and_then(|p| p.payment_date.clone()),
            payment_id: payment.map(|p| p.id.clone()),
        }
    }
}

/// What a student owes for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyObligation {
    pub month: String,
    pub month_key: MonthKey,
    pub charges: Vec<ChargeLine>,
    pub total_fee: Money,
    pub paid_amount: Money,
    pub pending_amount: Money,
    pub status: ObligationStatus,
}

impl MonthlyObligation {
    /// Aggregate charge lines into a month; totals always reconcile
    pub fn from_charges(month_key: MonthKey, charges: Vec<ChargeLine>) -> Self {
        let total_fee: Money = charges.iter().map(|c| c.fee).sum();
        let paid_amount: Money = charges.iter().filter(|c| c.is_paid).map(|c| c.fee).sum();
        let status = ObligationStatus::from_lines(&charges, paid_amount);

        Self {
            month: month_key.label(),
            month_key,
            charges,
            total_fee,
            paid_amount,
            pending_amount: total_fee - paid_amount,
            status,
        }
    }

    /// The charge line for a course, if it is billed this month
    pub fn charge_for(&self, course_id: &CourseId) -> Option<&ChargeLine> {
        self.charges.iter().find(|c| &c.course_id == course_id)
    }

    /// Whether this month bills anything at all
    pub fn is_billable(&self) -> bool {
        !self.total_fee.is_zero()
    }
}

/// Drop months with nothing to bill
///
/// Kept as its own step: a student enrolled before any of their courses
/// started must not see empty billing periods.
pub fn drop_unbilled_months(months: Vec<MonthlyObligation>) -> Vec<MonthlyObligation> {
    months
        .into_iter()
        .filter(|obligation| {
            let billable = obligation.is_billable();
            if !billable {
                debug!(month = %obligation.month_key, "skipping month with no billable course");
            }
            billable
        })
        .collect()
}

/// An enrolled course with its billing start for one student
struct BilledCourse<'a> {
    course: &'a Course,
    effective_start: NaiveDate,
}

/// Computes monthly obligations against one data snapshot
pub struct ObligationCalculator<'a> {
    courses: &'a [Course],
    matcher: PaymentMatcher<'a>,
    today: NaiveDate,
}

impl<'a> ObligationCalculator<'a> {
    /// Create a calculator; `today` bounds the last billed month
    pub fn new(courses: &'a [Course], payments: &'a [PaymentRecord], today: NaiveDate) -> Self {
        let matcher = PaymentMatcher::new(payments);
        debug!(
            payments = payments.len(),
            ignored_duplicates = matcher.duplicate_count(),
            "indexed payments"
        );
        Self {
            courses,
            matcher,
            today,
        }
    }

    /// Monthly obligations for one student, ascending by month
    ///
    /// Fails if the student's or an enrolled course's `createdAt` cannot be
    /// parsed; no billing start is ever guessed.
    pub fn for_student(&self, student: &Student) -> TuitionResult<Vec<MonthlyObligation>> {
        let enrolled: Vec<&Course> = self
            .courses
            .iter()
            .filter(|course| course.is_enrolled(&student.id))
            .collect();

        if enrolled.is_empty() {
            return Ok(Vec::new());
        }

        let enrolled_on = student.enrolled_on()?;
        let billed = enrolled
            .into_iter()
            .map(|course| {
                Ok(BilledCourse {
                    course,
                    effective_start: course.created_on()?.max(enrolled_on),
                })
            })
            .collect::<TuitionResult<Vec<_>>>()?;

        let months = month_range(enrolled_on, self.today)
            .keys()
            .map(|month| self.month_for(student, month, &billed))
            .collect();

        Ok(drop_unbilled_months(months))
    }

    /// The obligation for a single month, if it bills anything
    pub fn for_student_month(
        &self,
        student: &Student,
        month: MonthKey,
    ) -> TuitionResult<Option<MonthlyObligation>> {
        Ok(self
            .for_student(student)?
            .into_iter()
            .find(|obligation| obligation.month_key == month))
    }

    /// Obligations for every student; one bad record does not stop the rest
    pub fn for_students(&self, students: &[Student]) -> Vec<StudentObligations> {
        students
            .iter()
            .map(|student| StudentObligations {
                student_id: student.id.clone(),
                student_name: student.full_name.clone(),
                obligations: self.for_student(student),
            })
            .collect()
    }

    fn month_for(
        &self,
        student: &Student,
        month: MonthKey,
        billed: &[BilledCourse<'_>],
    ) -> MonthlyObligation {
        let month_end = month.last_day();
        let charges = billed
            .iter()
            .filter(|b| b.effective_start <= month_end)
            .map(|b| {
                let payment = self.matcher.find(&student.id, month, &b.course.id);
                ChargeLine::new(b.course, payment)
            })
            .collect();

        MonthlyObligation::from_charges(month, charges)
    }
}

/// Per-student result of a bulk computation
#[derive(Debug)]
pub struct StudentObligations {
    pub student_id: StudentId,
    pub student_name: String,
    pub obligations: TuitionResult<Vec<MonthlyObligation>>,
}

/// Totals over a student's obligation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub total_billed: Money,
    pub total_paid: Money,
    pub outstanding: Money,
    pub paid_months: usize,
    pub partial_months: usize,
    pub pending_months: usize,
}

impl AccountSummary {
    pub fn from_obligations(obligations: &[MonthlyObligation]) -> Self {
        let count = |status: ObligationStatus| obligations.iter().filter(|o| o.status == status).count();
        let total_billed: Money = obligations.iter().map(|o| o.total_fee).sum();
        let total_paid: Money = obligations.iter().map(|o| o.paid_amount).sum();

        Self {
            total_billed,
            total_paid,
            outstanding: total_billed - total_paid,
            paid_months: count(ObligationStatus::Paid),
            partial_months: count(ObligationStatus::Partial),
            pending_months: count(ObligationStatus::Pending),
        }
    }
}

/// Courses offered for the student's grade, in collection order
pub fn eligible_courses<'a>(student: &Student, courses: &'a [Course]) -> Vec<&'a Course> {
    courses
        .iter()
        .filter(|course| grades_match(&student.grade, &course.grade))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(s: &str) -> MonthKey {
        MonthKey::parse(s).unwrap()
    }

    fn student(created_at: &str) -> Student {
        Student::new("s-1", "Ada Lovelace", "Grade 7", created_at)
    }

    fn course(id: &str, fee_cents: i64, created_at: &str, students: &[&str]) -> Course {
        let mut course = Course::new(id, format!("Course {}", id), "t-1", Money::from_cents(fee_cents), created_at)
            .with_students(students.iter().copied());
        course.grade = "7".into();
        course
    }

    fn paid(id: &str, student: &str, month_key: &str, course: Option<&str>) -> PaymentRecord {
        PaymentRecord {
            id: PaymentId::new(id),
            student_id: StudentId::new(student),
            course_id: course.map(CourseId::new),
            month_key: month(month_key),
            amount: Money::from_cents(10000),
            payment_date: Some(format!("{}-20", month_key)),
            created_at: None,
        }
    }

    #[test]
    fn test_no_enrolled_courses_yields_nothing() {
        let courses = vec![course("c-1", 10000, "2024-01-01", &["someone-else"])];
        let calc = ObligationCalculator::new(&courses, &[], date(2024, 6, 1));
        assert!(calc.for_student(&student("2024-01-15")).unwrap().is_empty());
    }

    #[test]
    fn test_single_pending_month() {
        let courses = vec![course("c-1", 10000, "2024-01-01", &["s-1"])];
        let calc = ObligationCalculator::new(&courses, &[], date(2024, 1, 31));
        let obligations = calc.for_student(&student("2024-01-15")).unwrap();

        assert_eq!(obligations.len(), 1);
        let jan = &obligations[0];
        assert_eq!(jan.month_key, month("2024-01"));
        assert_eq!(jan.month, "January 2024");
        assert_eq!(jan.total_fee.cents(), 10000);
        assert_eq!(jan.pending_amount.cents(), 10000);
        assert_eq!(jan.status, ObligationStatus::Pending);
    }

    #[test]
    fn test_matching_payment_marks_month_paid() {
        let courses = vec![course("c-1", 10000, "2024-01-01", &["s-1"])];
        let payments = vec![paid("p-1", "s-1", "2024-01", Some("c-1"))];
        let calc = ObligationCalculator::new(&courses, &payments, date(2024, 1, 31));
        let jan = &calc.for_student(&student("2024-01-15")).unwrap()[0];

        assert_eq!(jan.status, ObligationStatus::Paid);
        assert!(jan.pending_amount.is_zero());
        let line = jan.charge_for(&CourseId::new("c-1")).unwrap();
        assert!(line.is_paid);
        assert_eq!(line.payment_id.as_ref().unwrap().as_str(), "p-1");
        assert_eq!(line.payment_date.as_deref(), Some("2024-01-20"));
    }

    #[test]
    fn test_one_of_two_courses_paid_is_partial() {
        let courses = vec![
            course("c-1", 10000, "2024-01-01", &["s-1"]),
            course("c-2", 7550, "2024-01-01", &["s-1"]),
        ];
        let payments = vec![paid("p-1", "s-1", "2024-01", Some("c-1"))];
        let calc = ObligationCalculator::new(&courses, &payments, date(2024, 1, 31));
        let jan = &calc.for_student(&student("2024-01-15")).unwrap()[0];

        assert_eq!(jan.status, ObligationStatus::Partial);
        assert_eq!(jan.total_fee.cents(), 17550);
        assert_eq!(jan.paid_amount.cents(), 10000);
        assert_eq!(jan.pending_amount.cents(), 7550);
    }

    #[test]
    fn test_months_before_course_start_are_skipped() {
        let courses = vec![course("c-1", 10000, "2024-03-01", &["s-1"])];
        let calc = ObligationCalculator::new(&courses, &[], date(2024, 4, 10));
        let obligations = calc.for_student(&student("2024-01-01")).unwrap();

        let keys: Vec<String> = obligations.iter().map(|o| o.month_key.to_string()).collect();
        assert_eq!(keys, vec!["2024-03", "2024-04"]);
    }

    #[test]
    fn test_zero_fee_course_does_not_create_months() {
        let courses = vec![
            course("free", 0, "2024-01-01", &["s-1"]),
            course("c-1", 5000, "2024-02-01", &["s-1"]),
        ];
        let calc = ObligationCalculator::new(&courses, &[], date(2024, 2, 15));
        let obligations = calc.for_student(&student("2024-01-01")).unwrap();

        assert_eq!(obligations.len(), 1);
        assert_eq!(obligations[0].month_key, month("2024-02"));
        // The free course still shows as a line in a billed month
        assert_eq!(obligations[0].charges.len(), 2);
    }

    #[test]
    fn test_course_created_mid_month_bills_that_month() {
        let courses = vec![course("c-1", 10000, "2024-02-28T18:00:00Z", &["s-1"])];
        let calc = ObligationCalculator::new(&courses, &[], date(2024, 2, 29));
        let obligations = calc.for_student(&student("2024-01-01")).unwrap();
        assert_eq!(obligations.len(), 1);
        assert_eq!(obligations[0].month_key, month("2024-02"));
    }

    #[test]
    fn test_whole_month_payment_does_not_settle_course_lines() {
        let courses = vec![course("c-1", 10000, "2024-01-01", &["s-1"])];
        let payments = vec![paid("p-1", "s-1", "2024-01", None)];
        let calc = ObligationCalculator::new(&courses, &payments, date(2024, 1, 31));
        let jan = &calc.for_student(&student("2024-01-15")).unwrap()[0];
        assert_eq!(jan.status, ObligationStatus::Pending);
    }

    #[test]
    fn test_duplicate_payments_are_not_double_counted() {
        let courses = vec![course("c-1", 10000, "2024-01-01", &["s-1"])];
        let payments = vec![
            paid("p-1", "s-1", "2024-01", Some("c-1")),
            paid("p-2", "s-1", "2024-01", Some("c-1")),
        ];
        let calc = ObligationCalculator::new(&courses, &payments, date(2024, 1, 31));
        let jan = &calc.for_student(&student("2024-01-15")).unwrap()[0];

        assert_eq!(jan.paid_amount.cents(), 10000);
        assert_eq!(
            jan.charges[0].payment_id.as_ref().unwrap().as_str(),
            "p-1"
        );
    }

    #[test]
    fn test_totals_reconcile_and_keys_ascend() {
        let courses = vec![
            course("c-1", 12345, "2023-10-01", &["s-1"]),
            course("c-2", 999, "2024-01-15", &["s-1"]),
        ];
        let payments = vec![
            paid("p-1", "s-1", "2023-11", Some("c-1")),
            paid("p-2", "s-1", "2024-02", Some("c-2")),
        ];
        let calc = ObligationCalculator::new(&courses, &payments, date(2024, 5, 3));
        let obligations = calc.for_student(&student("2023-10-20")).unwrap();

        assert_eq!(obligations.len(), 8);
        for o in &obligations {
            assert_eq!(o.total_fee, o.paid_amount + o.pending_amount);
        }
        for pair in obligations.windows(2) {
            assert!(pair[0].month_key < pair[1].month_key);
        }
    }

    #[test]
    fn test_idempotent() {
        let courses = vec![course("c-1", 10000, "2024-01-01", &["s-1"])];
        let payments = vec![paid("p-1", "s-1", "2024-02", Some("c-1"))];
        let calc = ObligationCalculator::new(&courses, &payments, date(2024, 4, 1));
        let s = student("2024-01-15");
        assert_eq!(calc.for_student(&s).unwrap(), calc.for_student(&s).unwrap());
    }

    #[test]
    fn test_malformed_student_date_fails() {
        let courses = vec![course("c-1", 10000, "2024-01-01", &["s-1"])];
        let calc = ObligationCalculator::new(&courses, &[], date(2024, 4, 1));
        let err = calc.for_student(&student("sometime")).unwrap_err();
        assert!(matches!(err, crate::error::TuitionError::DateParse { .. }));
    }

    #[test]
    fn test_malformed_course_date_fails() {
        let courses = vec![course("c-1", 10000, "??", &["s-1"])];
        let calc = ObligationCalculator::new(&courses, &[], date(2024, 4, 1));
        assert!(calc.for_student(&student("2024-01-01")).is_err());
    }

    #[test]
    fn test_bulk_isolates_bad_students() {
        let courses = vec![course("c-1", 10000, "2024-01-01", &["s-1", "s-2"])];
        let students = vec![
            student("2024-01-01"),
            Student::new("s-2", "Bad Date", "7", "n/a"),
        ];
        let calc = ObligationCalculator::new(&courses, &[], date(2024, 2, 1));
        let results = calc.for_students(&students);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].obligations.as_ref().unwrap().len(), 2);
        assert!(results[1].obligations.is_err());
    }

    #[test]
    fn test_for_student_month() {
        let courses = vec![course("c-1", 10000, "2024-01-01", &["s-1"])];
        let calc = ObligationCalculator::new(&courses, &[], date(2024, 3, 1));
        let s = student("2024-01-01");

        assert!(calc.for_student_month(&s, month("2024-02")).unwrap().is_some());
        assert!(calc.for_student_month(&s, month("2024-09")).unwrap().is_none());
    }

    #[test]
    fn test_account_summary() {
        let courses = vec![course("c-1", 10000, "2024-01-01", &["s-1"])];
        let payments = vec![paid("p-1", "s-1", "2024-01", Some("c-1"))];
        let calc = ObligationCalculator::new(&courses, &payments, date(2024, 3, 1));
        let obligations = calc.for_student(&student("2024-01-01")).unwrap();
        let summary = AccountSummary::from_obligations(&obligations);

        assert_eq!(summary.total_billed.cents(), 30000);
        assert_eq!(summary.total_paid.cents(), 10000);
        assert_eq!(summary.outstanding.cents(), 20000);
        assert_eq!(summary.paid_months, 1);
        assert_eq!(summary.pending_months, 2);
        assert_eq!(summary.partial_months, 0);
    }

    #[test]
    fn test_eligible_courses_use_normalized_grades() {
        let mut eight = course("c-8", 100, "2024-01-01", &[]);
        eight.grade = "Grade 8".into();
        let mut seven = course("c-7", 100, "2024-01-01", &[]);
        seven.grade = " grade 7".into();
        let courses = vec![eight, seven];

        let eligible = eligible_courses(&student("2024-01-01"), &courses);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id.as_str(), "c-7");
    }
}
