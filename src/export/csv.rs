//! CSV export of ledgers and obligations
//!
//! Amounts are written as plain decimals with two fraction digits; ledger
//! amounts stay non-negative with the direction in the Type column.

use std::io::Write;

use crate::billing::{Ledger, MonthlyObligation};
use crate::error::TuitionResult;

/// Export the merged ledger, newest first
pub fn export_ledger_csv<W: Write>(ledger: &Ledger, writer: W) -> TuitionResult<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    csv.write_record(["Date", "Type", "Counterparty", "Details", "Amount"])?;

    for entry in &ledger.entries {
        let date = entry
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        csv.write_record([
            date,
            entry.kind.to_string(),
            entry.counterparty.clone(),
            entry.details.clone(),
            entry.amount.to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Export a student's obligations, one row per charge line
pub fn export_obligations_csv<W: Write>(
    obligations: &[MonthlyObligation],
    writer: W,
) -> TuitionResult<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    csv.write_record(["Month", "Course", "Subject", "Fee", "Paid", "Payment Date"])?;

    for obligation in obligations {
        for charge in &obligation.charges {
            csv.write_record([
                obligation.month_key.to_string(),
                charge.course_name.clone(),
                charge.subject.clone(),
                charge.fee.to_string(),
                if charge.is_paid { "yes" } else { "no" }.to_string(),
                charge.payment_date.clone().unwrap_or_default(),
            ])?;
        }
    }

    csv.flush()?;
    Ok(())
}
