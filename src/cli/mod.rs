//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the billing engine and the payment service.

pub mod ledger;
pub mod obligations;
pub mod payment;

pub use ledger::{handle_ledger_command, handle_teachers_command, LedgerArgs};
pub use obligations::{
    handle_courses_command, handle_obligations_command, handle_outstanding_command,
    ObligationsArgs,
};
pub use payment::{handle_audit_command, handle_pay_command, AuditArgs, PayArgs};

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::error::{TuitionError, TuitionResult};
use crate::models::Money;

/// Clap value parser for amounts such as `100`, `99.50` or `$12.5`
pub fn parse_amount(s: &str) -> Result<Money, String> {
    Money::parse(s).map_err(|e| e.to_string())
}

/// The billing horizon for commands run now: the local calendar date
pub(crate) fn today() -> NaiveDate {
    billing_horizon(&Local::now())
}

fn billing_horizon<Tz: TimeZone>(now: &DateTime<Tz>) -> NaiveDate {
    now.date_naive()
}

/// Open an export file; `.json` paths get JSON, anything else CSV
pub(crate) fn create_export_file(path: &Path) -> TuitionResult<(BufWriter<File>, bool)> {
    let file = File::create(path).map_err(|e| {
        TuitionError::Export(format!("Failed to create {}: {}", path.display(), e))
    })?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    Ok((BufWriter::new(file), is_json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100").unwrap(), Money::from_cents(10000));
        assert_eq!(parse_amount("$12.50").unwrap(), Money::from_cents(1250));
        assert!(parse_amount("twelve").is_err());
    }

    #[test]
    fn test_billing_horizon_uses_wall_clock_date() {
        use chrono::FixedOffset;

        // 23:30 UTC on Jan 31 is already Feb 1 two hours east
        let instant = Utc.with_ymd_and_hms(2024, 1, 31, 23, 30, 0).unwrap();
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            billing_horizon(&instant.with_timezone(&east)),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert_eq!(
            billing_horizon(&instant),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
    }

    #[test]
    fn test_today_is_local_date() {
        let before = Local::now().date_naive();
        let horizon = today();
        let after = Local::now().date_naive();
        assert!(horizon == before || horizon == after);
    }
}
