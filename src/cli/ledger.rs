//! Ledger CLI commands

use std::path::PathBuf;

use clap::Args;

use super::create_export_file;
use crate::billing::{LedgerFilter, TransactionKind};
use crate::config::Settings;
use crate::display::{format_ledger, format_teacher_balances, DisplayOptions};
use crate::error::TuitionResult;
use crate::export::{export_ledger_csv, export_ledger_json};
use crate::models::MonthKey;
use crate::source::DataSource;

fn parse_direction(s: &str) -> Result<TransactionKind, String> {
    TransactionKind::parse(s).ok_or_else(|| format!("Unknown direction '{}', expected in or out", s))
}

/// Arguments for `ledger`
#[derive(Args, Debug)]
pub struct LedgerArgs {
    /// Only money in or money out
    #[arg(short, long, value_parser = parse_direction)]
    pub direction: Option<TransactionKind>,

    /// Only entries dated in this month (YYYY-MM)
    #[arg(short, long)]
    pub month: Option<MonthKey>,

    /// Write the ledger to a file (.csv or .json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the `ledger` command
pub fn handle_ledger_command<S: DataSource>(
    source: &S,
    settings: &Settings,
    args: LedgerArgs,
) -> TuitionResult<()> {
    let snapshot = source.snapshot()?;
    let filter = LedgerFilter {
        kind: args.direction,
        month: args.month,
    };
    let ledger = snapshot
        .merger()
        .merge(&snapshot.payments, &snapshot.payouts, &filter);

    if let Some(path) = args.output {
        let (writer, is_json) = create_export_file(&path)?;
        if is_json {
            export_ledger_json(&ledger, writer)?;
        } else {
            export_ledger_csv(&ledger, writer)?;
        }
        println!(
            "Exported {} transactions to {}",
            ledger.entries.len(),
            path.display()
        );
        return Ok(());
    }

    print!("{}", format_ledger(&ledger, &DisplayOptions::from(settings)));
    Ok(())
}

/// Handle the `teachers` command
pub fn handle_teachers_command<S: DataSource>(source: &S, settings: &Settings) -> TuitionResult<()> {
    let snapshot = source.snapshot()?;
    let balances = snapshot
        .merger()
        .teacher_balances(&snapshot.payments, &snapshot.payouts);

    print!(
        "{}",
        format_teacher_balances(&balances, &DisplayOptions::from(settings))
    );
    Ok(())
}
