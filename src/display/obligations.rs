//! Obligation display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use super::{truncate, DisplayOptions};
use crate::billing::{AccountSummary, MonthlyObligation, StudentObligations};

#[derive(Tabled)]
struct ChargeRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Course")]
    course: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Fee")]
    fee: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Paid On")]
    paid_on: String,
}

#[derive(Tabled)]
struct OutstandingRow {
    #[tabled(rename = "Student")]
    student: String,
    #[tabled(rename = "Billed")]
    billed: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Outstanding")]
    outstanding: String,
    #[tabled(rename = "Pending Months")]
    pending_months: String,
}

/// Format a student's obligations, one row per charge line
pub fn format_obligations(obligations: &[MonthlyObligation], opts: &DisplayOptions) -> String {
    if obligations.is_empty() {
        return "No obligations found.\n".to_string();
    }

    let mut rows = Vec::new();
    for obligation in obligations {
        for charge in &obligation.charges {
            rows.push(ChargeRow {
                month: obligation.month_key.to_string(),
                course: truncate(&charge.course_name, 28),
                subject: charge.subject.clone(),
                fee: opts.money(charge.fee),
                status: if charge.is_paid { "Paid" } else { "Pending" }.to_string(),
                paid_on: if charge.is_paid {
                    opts.raw_date(charge.payment_date.as_deref())
                } else {
                    String::new()
                },
            });
        }
    }

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .modify(Columns::new(3..4), Alignment::right());

    let mut output = table.to_string();
    output.push_str("\n\n");

    for obligation in obligations {
        output.push_str(&format!(
            "{:15} {:>12} billed {:>12} paid {:>12} pending  [{}]\n",
            obligation.month,
            opts.money(obligation.total_fee),
            opts.money(obligation.paid_amount),
            opts.money(obligation.pending_amount),
            obligation.status
        ));
    }

    output
}

/// Format the totals across all of a student's months
pub fn format_account_summary(summary: &AccountSummary, opts: &DisplayOptions) -> String {
    let mut output = String::new();
    output.push_str(&format!("Total billed:  {:>12}\n", opts.money(summary.total_billed)));
    output.push_str(&format!("Total paid:    {:>12}\n", opts.money(summary.total_paid)));
    output.push_str(&format!("Outstanding:   {:>12}\n", opts.money(summary.outstanding)));
    output.push_str(&format!(
        "Months:        {} paid, {} partial, {} pending\n",
        summary.paid_months, summary.partial_months, summary.pending_months
    ));
    output
}

/// Format every student's outstanding balance
///
/// Students whose dates could not be parsed are listed with the error
/// instead of a balance.
pub fn format_outstanding(students: &[StudentObligations], opts: &DisplayOptions) -> String {
    if students.is_empty() {
        return "No students found.\n".to_string();
    }

    let mut rows = Vec::new();
    let mut failures = Vec::new();

    for entry in students {
        let name = if entry.student_name.is_empty() {
            entry.student_id.to_string()
        } else {
            entry.student_name.clone()
        };

        match &entry.obligations {
            Ok(obligations) => {
                let summary = AccountSummary::from_obligations(obligations);
                rows.push(OutstandingRow {
                    student: truncate(&name, 30),
                    billed: opts.money(summary.total_billed),
                    paid: opts.money(summary.total_paid),
                    outstanding: opts.money(summary.outstanding),
                    pending_months: (summary.pending_months + summary.partial_months).to_string(),
                });
            }
            Err(e) => failures.push(format!("  {}: {}", name, e)),
        }
    }

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .modify(Columns::new(1..), Alignment::right());

    let mut output = table.to_string();
    output.push('\n');

    if !failures.is_empty() {
        output.push_str("\nCould not compute:\n");
        for failure in failures {
            output.push_str(&failure);
            output.push('\n');
        }
    }

    output
}
