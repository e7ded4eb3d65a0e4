//! Payment CLI commands
//!
//! `pay` is the only command that writes. After a successful submission it
//! reloads the snapshot and shows the recomputed month.

use clap::Args;
use tracing::warn;

use super::{parse_amount, today};
use crate::audit::AuditLogger;
use crate::config::Settings;
use crate::display::{format_obligations, DisplayOptions};
use crate::error::{TuitionError, TuitionResult};
use crate::models::{CourseId, Money, MonthKey, StudentId};
use crate::services::PaymentService;
use crate::source::{DataSource, PaymentSink};

/// Arguments for `pay`
#[derive(Args, Debug)]
pub struct PayArgs {
    /// Student ID
    pub student: String,

    /// Billing month (YYYY-MM)
    pub month: MonthKey,

    /// Amount paid, e.g. 100 or 99.50
    #[arg(value_parser = parse_amount, allow_hyphen_values = true)]
    pub amount: Money,

    /// Course the payment settles; omit for a whole-month payment
    #[arg(short, long)]
    pub course: Option<String>,
}

/// Arguments for `audit`
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Number of entries to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Handle the `pay` command
pub fn handle_pay_command<S>(
    store: &S,
    audit: &AuditLogger,
    settings: &Settings,
    args: PayArgs,
) -> TuitionResult<()>
where
    S: DataSource + PaymentSink,
{
    let student_id = StudentId::new(args.student);
    let course_id = args.course.map(CourseId::new);

    // Catch typos before anything is written
    let snapshot = store.snapshot()?;
    let student = snapshot.student(&student_id)?;
    if let Some(course_id) = &course_id {
        let course = snapshot
            .courses
            .iter()
            .find(|c| &c.id == course_id)
            .ok_or_else(|| TuitionError::course_not_found(course_id.to_string()))?;
        if !course.is_enrolled(&student.id) {
            warn!(student = %student.id, course = %course.id, "student is not enrolled in course");
        }
    }

    let service = PaymentService::new(store).with_audit(audit);
    let record = match service.mark_obligation_paid(&student_id, args.month, args.amount, course_id)
    {
        Ok(record) => record,
        Err(e) => {
            if e.is_retryable() {
                eprintln!("The payment was not recorded; it is safe to retry.");
            }
            return Err(e.into());
        }
    };

    let opts = DisplayOptions::from(settings);
    println!(
        "Recorded payment {} of {} for {} ({})",
        record.id,
        opts.money(record.amount),
        student,
        record.month_key
    );

    // The payment is recorded; a failed refresh must not turn into a failed command
    if let Err(e) = show_recomputed_month(store, &student_id, record.month_key, &opts) {
        eprintln!(
            "Warning: payment {} was recorded, but the month could not be recomputed: {}",
            record.id, e
        );
    }

    Ok(())
}

/// Derived state is never patched locally; recompute from a fresh read
fn show_recomputed_month<S: DataSource>(
    source: &S,
    student_id: &StudentId,
    month: MonthKey,
    opts: &DisplayOptions,
) -> TuitionResult<()> {
    let snapshot = source.snapshot()?;
    let student = snapshot.student(student_id)?;
    match snapshot.calculator(today()).for_student_month(student, month)? {
        Some(obligation) => {
            println!();
            print!("{}", format_obligations(&[obligation], opts));
        }
        None => println!("No obligation is billed for {}.", month),
    }
    Ok(())
}

/// Handle the `audit` command
pub fn handle_audit_command(audit: &AuditLogger, args: AuditArgs) -> TuitionResult<()> {
    let entries = audit.read_recent(args.limit)?;

    if entries.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    println!("\nShowing {} of {} entries", entries.len(), audit.entry_count()?);
    Ok(())
}
