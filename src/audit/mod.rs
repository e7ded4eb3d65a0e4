//! Audit trail for payment mutations
//!
//! Every submission through the payment gateway leaves one line in an
//! append-only JSONL file: accepted payments as `create`, refusals as
//! `reject`. Diagnostic logging goes through `tracing`; this log is the
//! durable record a bursar can hand to an auditor.

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
