//! JSON export of ledgers and obligations
//!
//! Reports are wrapped with a schema version and export timestamp so other
//! tools can tell snapshots apart.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::billing::{AccountSummary, Ledger, MonthlyObligation};
use crate::error::{TuitionError, TuitionResult};
use crate::models::StudentId;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A report with its export metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportExport<T> {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub report: T,
}

impl<T: Serialize> ReportExport<T> {
    pub fn new(report: T) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            report,
        }
    }

    fn write_to<W: Write>(&self, writer: W) -> TuitionResult<()> {
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| TuitionError::Export(format!("Failed to write JSON: {}", e)))
    }
}

#[derive(Debug, Clone, Serialize)]
struct StudentReport<'a> {
    student_id: &'a StudentId,
    summary: AccountSummary,
    obligations: &'a [MonthlyObligation],
}

/// Export the merged ledger with its totals
pub fn export_ledger_json<W: Write>(ledger: &Ledger, writer: W) -> TuitionResult<()> {
    ReportExport::new(ledger).write_to(writer)
}

/// Export a student's obligations with account totals
pub fn export_obligations_json<W: Write>(
    student_id: &StudentId,
    obligations: &[MonthlyObligation],
    writer: W,
) -> TuitionResult<()> {
    let report = StudentReport {
        student_id,
        summary: AccountSummary::from_obligations(obligations),
        obligations,
    };
    ReportExport::new(report).write_to(writer)
}
