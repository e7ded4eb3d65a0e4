//! Core data models for the tuition ledger
//!
//! These are the records exchanged with the external data layer (students,
//! courses, teachers, payments, payouts) plus the value types they share.

pub mod course;
pub mod ids;
pub mod money;
pub mod month;
pub mod payment;
pub mod payout;
pub mod student;
pub mod teacher;

pub use course::{Course, CourseValidationError};
pub use ids::{CourseId, PaymentId, PayoutId, StudentId, TeacherId};
pub use money::{Money, MoneyParseError};
pub use month::{MonthKey, MonthParseError};
pub use payment::{CreatePaymentResponse, NewPayment, PaymentRecord};
pub use payout::TeacherPayoutRecord;
pub use student::{grades_match, normalize_grade, Student};
pub use teacher::Teacher;
