//! Text rendering for meeting sessions.
//!
//! This module turns a [`SessionSnapshot`] into text:
//! - **Summary**: the multi-line report handed to the clipboard
//! - **Status line**: the one-line live readout shown while a meeting runs
//!
//! Currency display is delegated to a [`CurrencyFormatter`]; the crate ships
//! [`SymbolCurrency`] (`$1,234.56` style).
//!
//! # Example
//!
//! ```rust
//! use meetingcost_core::format::{SummaryFormatter, SymbolCurrency};
//! use meetingcost_core::{ManualTicker, MeetingSession};
//!
//! let session = MeetingSession::new(ManualTicker::new());
//! let formatter = SummaryFormatter::new(SymbolCurrency::default());
//! let report = formatter.render(&session.snapshot());
//! assert!(report.starts_with("Meeting Cost Summary"));
//! ```

use serde::{Deserialize, Serialize};

use crate::session::{Phase, SessionSnapshot};

/// Title of the summary report.
pub const SUMMARY_TITLE: &str = "Meeting Cost Summary";
/// Width of the dashed separator under the title.
pub const SEPARATOR_WIDTH: usize = 30;

/// Turns a currency amount into display text.
pub trait CurrencyFormatter {
    /// Formats `amount` for display.
    fn format_amount(&self, amount: f64) -> String;
}

impl<C: CurrencyFormatter + ?Sized> CurrencyFormatter for &C {
    fn format_amount(&self, amount: f64) -> String {
        (**self).format_amount(amount)
    }
}

/// Symbol-prefixed amounts with two decimals and `,` thousands grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolCurrency {
    /// Prefix placed before the digits (e.g. `$`).
    pub symbol: String,
}

impl Default for SymbolCurrency {
    fn default() -> Self {
        Self::new("$")
    }
}

impl SymbolCurrency {
    /// Creates a formatter with the given symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

impl CurrencyFormatter for SymbolCurrency {
    fn format_amount(&self, amount: f64) -> String {
        let fixed = format!("{:.2}", amount.abs());
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        // Amounts that round to zero carry no sign.
        let negative = amount < 0.0 && fixed != "0.00";
        format!(
            "{}{}{}.{}",
            if negative { "-" } else { "" },
            self.symbol,
            group_thousands(whole),
            cents
        )
    }
}

/// Inserts `,` between every group of three digits.
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Renders session snapshots as text.
#[derive(Debug, Clone)]
pub struct SummaryFormatter<C> {
    currency: C,
}

impl<C: CurrencyFormatter> SummaryFormatter<C> {
    /// Creates a formatter using the given currency display.
    pub fn new(currency: C) -> Self {
        Self { currency }
    }

    /// The currency display in use.
    pub fn currency(&self) -> &C {
        &self.currency
    }

    /// Returns the summary report lines in display order.
    ///
    /// The `Meeting:` line only appears for a non-empty name.
    pub fn lines(&self, snapshot: &SessionSnapshot) -> Vec<String> {
        let mut lines = vec![SUMMARY_TITLE.to_string(), "-".repeat(SEPARATOR_WIDTH)];
        if !snapshot.meeting_name.is_empty() {
            lines.push(format!("Meeting: {}", snapshot.meeting_name));
        }
        lines.push(format!("Duration: {}", snapshot.formatted_time));
        lines.push(format!("Attendees: {}", snapshot.attendees));
        lines.push(format!(
            "Hourly Rate: {}",
            self.currency.format_amount(snapshot.hourly_rate)
        ));
        lines.push(format!(
            "Total Cost: {}",
            self.currency.format_amount(snapshot.running_cost)
        ));
        lines.push(format!(
            "Cost/Person: {}",
            self.currency.format_amount(snapshot.cost_per_person)
        ));
        lines
    }

    /// Renders the summary report, newline-joined without a trailing newline.
    pub fn render(&self, snapshot: &SessionSnapshot) -> String {
        self.lines(snapshot).join("\n")
    }

    /// Renders the live one-line readout: clock, accrued cost, per-minute rate.
    pub fn status_line(&self, snapshot: &SessionSnapshot) -> String {
        let mut line = format!(
            "{}  {}  ({}/min)",
            snapshot.formatted_time,
            self.currency.format_amount(snapshot.running_cost),
            self.currency.format_amount(snapshot.cost_per_minute)
        );
        if snapshot.phase == Phase::Paused {
            line.push_str("  [paused]");
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod currency {
        use super::*;

        #[test]
        fn two_decimals() {
            let usd = SymbolCurrency::default();
            assert_eq!(usd.format_amount(0.0), "$0.00");
            assert_eq!(usd.format_amount(1.5), "$1.50");
            assert_eq!(usd.format_amount(0.016667), "$0.02");
        }

        #[test]
        fn thousands_grouping() {
            let usd = SymbolCurrency::default();
            assert_eq!(usd.format_amount(999.999), "$1,000.00");
            assert_eq!(usd.format_amount(1234567.891), "$1,234,567.89");
            assert_eq!(usd.format_amount(100000.0), "$100,000.00");
        }

        #[test]
        fn negative_amounts() {
            let usd = SymbolCurrency::default();
            assert_eq!(usd.format_amount(-12.5), "-$12.50");
            assert_eq!(usd.format_amount(-0.001), "$0.00");
        }

        #[test]
        fn custom_symbol() {
            let eur = SymbolCurrency::new("€");
            assert_eq!(eur.format_amount(42.0), "€42.00");
        }

        #[test]
        fn grouping_helper() {
            assert_eq!(group_thousands(""), "");
            assert_eq!(group_thousands("7"), "7");
            assert_eq!(group_thousands("123"), "123");
            assert_eq!(group_thousands("1234"), "1,234");
            assert_eq!(group_thousands("123456"), "123,456");
        }
    }
}
