//! Ledger and teacher balance display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use super::{truncate, DisplayOptions};
use crate::billing::{Ledger, TeacherBalance, TransactionKind};

#[derive(Tabled)]
struct LedgerRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Counterparty")]
    counterparty: String,
    #[tabled(rename = "Details")]
    details: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Teacher")]
    teacher: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Earned")]
    earned: String,
    #[tabled(rename = "Paid Out")]
    paid_out: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

/// Format the merged ledger followed by its totals
pub fn format_ledger(ledger: &Ledger, opts: &DisplayOptions) -> String {
    if ledger.entries.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<LedgerRow> = ledger
        .entries
        .iter()
        .map(|entry| {
            let sign = match entry.kind {
                TransactionKind::MoneyIn => "+",
                TransactionKind::MoneyOut => "-",
            };
            LedgerRow {
                date: entry
                    .date
                    .map(|d| d.format(&opts.date_format).to_string())
                    .unwrap_or_else(|| "-".to_string()),
                kind: entry.kind.to_string(),
                counterparty: truncate(&entry.counterparty, 24),
                details: truncate(&entry.details, 24),
                amount: format!("{}{}", sign, opts.money(entry.amount)),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .modify(Columns::new(4..), Alignment::right());

    let summary = &ledger.summary;
    let mut output = table.to_string();
    output.push_str("\n\n");
    output.push_str(&format!(
        "Money in:  {:>12}  ({} transactions)\n",
        opts.money(summary.money_in),
        summary.money_in_count
    ));
    output.push_str(&format!(
        "Money out: {:>12}  ({} transactions)\n",
        opts.money(summary.money_out),
        summary.money_out_count
    ));
    output.push_str(&format!("Net:       {:>12}\n", opts.money(summary.net)));

    output
}

/// Format each teacher's earned share against payouts
pub fn format_teacher_balances(balances: &[TeacherBalance], opts: &DisplayOptions) -> String {
    if balances.is_empty() {
        return "No teachers found.\n".to_string();
    }

    let rows: Vec<BalanceRow> = balances
        .iter()
        .map(|b| BalanceRow {
            teacher: truncate(&b.teacher_name, 24),
            subject: b.subject.clone(),
            earned: opts.money(b.earned),
            paid_out: opts.money(b.paid_out),
            balance: opts.money(b.balance),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .modify(Columns::new(2..), Alignment::right());

    let mut output = table.to_string();
    output.push('\n');
    output
}
