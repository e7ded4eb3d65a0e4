//! Service layer for the tuition ledger
//!
//! Operations with side effects live here; everything derived is computed by
//! the pure `billing` module.

pub mod payment;

pub use payment::PaymentService;
