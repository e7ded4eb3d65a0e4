//! Tuition Ledger - billing reconciliation for a tuition center
//!
//! Derives each student's monthly obligations from enrollments and course
//! fees, matches them against recorded payments, and merges student payments
//! with teacher payouts into one ledger.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `billing`: The pure engine (months, obligations, matching, ledger)
//! - `models`: Records exchanged with the data layer
//! - `source`: Read and write boundaries to the data layer
//! - `storage`: The bundled JSON-file data layer
//! - `services`: The payment gateway
//! - `audit`: Append-only audit log of payment submissions
//! - `config`: Configuration and path management
//! - `display`: Terminal tables
//! - `export`: CSV and JSON export
//! - `cli`: Command handlers
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use tuition_ledger::config::{LedgerPaths, Settings};
//! use tuition_ledger::source::DataSource;
//! use tuition_ledger::storage::JsonStore;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = JsonStore::new(paths, &settings)?;
//!
//! let snapshot = store.snapshot()?;
//! let calculator = snapshot.calculator(chrono::Local::now().date_naive());
//! let obligations = calculator.for_student(snapshot.student(&"s-1".into())?)?;
//! ```

pub mod audit;
pub mod billing;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod source;
pub mod storage;

pub use error::{PaymentError, TuitionError, TuitionResult};
