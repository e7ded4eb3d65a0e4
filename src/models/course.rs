//! Course model
//!
//! A course carries the monthly fee billed to every enrolled student and the
//! share of collected fees owed to its teacher.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CourseId, StudentId, TeacherId};
use super::money::Money;
use crate::billing::dates;
use crate::error::TuitionResult;

/// A course offered by the center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,

    #[serde(default)]
    pub course_name: String,

    #[serde(default)]
    pub subject: String,

    /// Same loose format as the student grade
    #[serde(default)]
    pub grade: String,

    pub teacher_id: TeacherId,

    /// Monthly fee per enrolled student
    pub course_fee: Money,

    /// Teacher's cut of collected fees, 0-100
    #[serde(default)]
    pub teacher_payment_percentage: f64,

    /// Raw course creation timestamp
    pub created_at: String,

    /// Membership set; order carries no meaning
    #[serde(default)]
    pub enrolled_students: Vec<StudentId>,
}

impl Course {
    /// Create a course with no enrolled students
    pub fn new(
        id: impl Into<CourseId>,
        course_name: impl Into<String>,
        teacher_id: impl Into<TeacherId>,
        course_fee: Money,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            course_name: course_name.into(),
            subject: String::new(),
            grade: String::new(),
            teacher_id: teacher_id.into(),
            course_fee,
            teacher_payment_percentage: 0.0,
            created_at: created_at.into(),
            enrolled_students: Vec::new(),
        }
    }

    /// Builder-style enrollment, mostly for fixtures
    pub fn with_students<I, S>(mut self, students: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StudentId>,
    {
        self.enrolled_students
            .extend(students.into_iter().map(Into::into));
        self
    }

    /// Whether the student is currently enrolled
    pub fn is_enrolled(&self, student_id: &StudentId) -> bool {
        self.enrolled_students.contains(student_id)
    }

    /// The course creation date, failing if `createdAt` cannot be parsed
    pub fn created_on(&self) -> TuitionResult<NaiveDate> {
        dates::parse_date(&self.created_at)
            .map_err(|_| dates::date_error(format!("course {}", self.id), "createdAt", &self.created_at))
    }

    /// The teacher's share of an amount collected for this course
    pub fn teacher_share(&self, amount: Money) -> Money {
        amount.percent(self.teacher_payment_percentage)
    }

    /// Validate the course
    pub fn validate(&self) -> Result<(), CourseValidationError> {
        if self.course_fee.is_negative() {
            return Err(CourseValidationError::NegativeFee(self.course_fee));
        }

        if !(0.0..=100.0).contains(&self.teacher_payment_percentage) {
            return Err(CourseValidationError::PercentageOutOfRange(
                self.teacher_payment_percentage,
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.course_name)
    }
}

/// Validation errors for courses
#[derive(Debug, Clone, PartialEq)]
pub enum CourseValidationError {
    NegativeFee(Money),
    PercentageOutOfRange(f64),
}

impl fmt::Display for CourseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeFee(fee) => write!(f, "Course fee cannot be negative ({})", fee),
            Self::PercentageOutOfRange(pct) => {
                write!(f, "Teacher payment percentage must be 0-100, got {}", pct)
            }
        }
    }
}

impl std::error::Error for CourseValidationError {}
