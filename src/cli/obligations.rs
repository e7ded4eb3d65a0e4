//! Obligation CLI commands
//!
//! `obligations`, `outstanding` and `courses`: everything read per student.

use std::path::PathBuf;

use chrono::Local;
use clap::Args;

use super::{create_export_file, today};
use crate::billing::{eligible_courses, AccountSummary};
use crate::config::Settings;
use crate::display::{format_account_summary, format_obligations, format_outstanding, DisplayOptions};
use crate::error::TuitionResult;
use crate::export::{export_obligations_csv, export_obligations_json};
use crate::models::{MonthKey, StudentId};
use crate::source::DataSource;

/// Arguments for `obligations`
#[derive(Args, Debug)]
pub struct ObligationsArgs {
    /// Student ID
    pub student: String,

    /// Only show this month (YYYY-MM)
    #[arg(short, long)]
    pub month: Option<MonthKey>,

    /// Reload and recompute on the configured poll interval
    #[arg(short, long, conflicts_with = "output")]
    pub watch: bool,

    /// Write the charge lines to a file (.csv or .json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the `obligations` command
pub fn handle_obligations_command<S: DataSource>(
    source: &S,
    settings: &Settings,
    args: ObligationsArgs,
) -> TuitionResult<()> {
    let student_id = StudentId::new(args.student);
    let opts = DisplayOptions::from(settings);

    if !args.watch {
        let report = student_report(source, &student_id, args.month, &opts)?;

        if let Some(path) = args.output {
            let (writer, is_json) = create_export_file(&path)?;
            if is_json {
                export_obligations_json(&student_id, &report.obligations, writer)?;
            } else {
                export_obligations_csv(&report.obligations, writer)?;
            }
            println!(
                "Exported {} months to {}",
                report.obligations.len(),
                path.display()
            );
        } else {
            print!("{}", report.rendered);
        }
        return Ok(());
    }

    // Fixed polling: every tick recomputes from a fresh snapshot
    loop {
        println!("--- {} ---", Local::now().format("%Y-%m-%d %H:%M:%S"));
        match student_report(source, &student_id, args.month, &opts) {
            Ok(report) => print!("{}", report.rendered),
            // A failed tick is reported and the next one tries again
            Err(e) => eprintln!("Error: {}", e),
        }
        std::thread::sleep(settings.poll_interval());
    }
}

struct StudentReport {
    obligations: Vec<crate::billing::MonthlyObligation>,
    rendered: String,
}

fn student_report<S: DataSource>(
    source: &S,
    student_id: &StudentId,
    month: Option<MonthKey>,
    opts: &DisplayOptions,
) -> TuitionResult<StudentReport> {
    let snapshot = source.snapshot()?;
    let student = snapshot.student(student_id)?;

    let mut obligations = snapshot.calculator(today()).for_student(student)?;
    if let Some(month) = month {
        obligations.retain(|o| o.month_key == month);
    }

    let mut rendered = format!("Student: {} ({})\n\n", student, student.id);
    rendered.push_str(&format_obligations(&obligations, opts));
    if !obligations.is_empty() {
        rendered.push('\n');
        rendered.push_str(&format_account_summary(
            &AccountSummary::from_obligations(&obligations),
            opts,
        ));
    }

    Ok(StudentReport {
        obligations,
        rendered,
    })
}

/// Handle the `outstanding` command
pub fn handle_outstanding_command<S: DataSource>(source: &S, settings: &Settings) -> TuitionResult<()> {
    let snapshot = source.snapshot()?;
    let mut students = snapshot
        .calculator(today())
        .for_students(&snapshot.students);

    students.retain(|entry| match &entry.obligations {
        Ok(obligations) => !AccountSummary::from_obligations(obligations)
            .outstanding
            .is_zero(),
        Err(_) => true,
    });

    if students.is_empty() {
        println!("No outstanding balances.");
        return Ok(());
    }

    print!("{}", format_outstanding(&students, &DisplayOptions::from(settings)));
    Ok(())
}

/// Handle the `courses` command: courses offered for the student's grade
pub fn handle_courses_command<S: DataSource>(
    source: &S,
    settings: &Settings,
    student: String,
) -> TuitionResult<()> {
    let opts = DisplayOptions::from(settings);
    let snapshot = source.snapshot()?;
    let student = snapshot.student(&StudentId::new(student))?;

    let courses = eligible_courses(student, &snapshot.courses);
    if courses.is_empty() {
        println!("No courses offered for grade '{}'.", student.grade);
        return Ok(());
    }

    println!("Courses for {} (grade {}):", student, student.grade);
    println!("{:12} {:30} {:15} {:>12}", "ID", "Course", "Subject", "Fee");
    println!("{}", "-".repeat(72));

    for course in &courses {
        let enrolled = if course.is_enrolled(&student.id) { " *" } else { "" };
        println!(
            "{:12} {:30} {:15} {:>12}{}",
            course.id,
            course.course_name,
            course.subject,
            opts.money(course.course_fee),
            enrolled
        );
    }

    println!("\n* = enrolled");
    Ok(())
}
