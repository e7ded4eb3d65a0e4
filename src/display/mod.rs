//! Display formatting for terminal output
//!
//! Renders obligations, ledgers and teacher balances as tables. Amounts are
//! always shown with two fraction digits and the configured currency symbol.

pub mod ledger;
pub mod obligations;

pub use ledger::{format_ledger, format_teacher_balances};
pub use obligations::{format_account_summary, format_obligations, format_outstanding};

use crate::billing::dates;
use crate::config::Settings;
use crate::models::Money;

/// Formatting preferences taken from settings
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub currency_symbol: String,
    pub date_format: String,
}

impl DisplayOptions {
    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Render a stored timestamp; unparsable values are shown as stored
    pub fn raw_date(&self, value: Option<&str>) -> String {
        match value {
            Some(raw) => match dates::parse_timestamp(raw) {
                Ok(ts) => ts.format(&self.date_format).to_string(),
                Err(_) => raw.to_string(),
            },
            None => "-".to_string(),
        }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for DisplayOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            currency_symbol: settings.currency_symbol.clone(),
            date_format: settings.date_format.clone(),
        }
    }
}

/// Truncate a string to a maximum display width
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_uses_symbol() {
        let opts = DisplayOptions::default();
        assert_eq!(opts.money(Money::from_cents(1050)), "$10.50");
        assert_eq!(opts.money(Money::from_cents(-5)), "-$0.05");
    }

    #[test]
    fn test_raw_date() {
        let opts = DisplayOptions::default();
        assert_eq!(opts.raw_date(Some("2024-01-20T10:00:00Z")), "2024-01-20");
        assert_eq!(opts.raw_date(Some("someday")), "someday");
        assert_eq!(opts.raw_date(None), "-");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Mathematics", 20), "Mathematics");
        assert_eq!(truncate("Advanced Mathematics", 10), "Advance...");
    }
}
