//! Export module for the tuition ledger
//!
//! - CSV: ledger and obligation rows for spreadsheets
//! - JSON: the same reports with totals, for other tools

pub mod csv;
pub mod json;

pub use self::csv::{export_ledger_csv, export_obligations_csv};
pub use self::json::{export_ledger_json, export_obligations_json, ReportExport, EXPORT_SCHEMA_VERSION};
