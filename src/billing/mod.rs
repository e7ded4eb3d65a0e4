//! Tuition billing reconciliation engine
//!
//! Pure functions over a data snapshot: nothing in this module performs I/O
//! or keeps state between calls.
//!
//! - `dates`: month keys, month ranges and timestamp parsing
//! - `obligations`: per-student monthly obligations
//! - `matcher`: joins payment records to charge lines
//! - `ledger`: merged money-in / money-out feed and teacher balances

pub mod dates;
pub mod ledger;
pub mod matcher;
pub mod obligations;

pub use dates::{first_of_month, last_of_month, month_key_of, month_range, MonthRange};
pub use ledger::{
    Ledger, LedgerEntry, LedgerFilter, LedgerMerger, LedgerSummary, TeacherBalance,
    TransactionKind,
};
pub use matcher::PaymentMatcher;
pub use obligations::{
    drop_unbilled_months, eligible_courses, AccountSummary, ChargeLine, MonthlyObligation,
    ObligationCalculator, ObligationStatus, StudentObligations,
};
