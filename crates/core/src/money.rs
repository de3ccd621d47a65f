//! Monetary values: parsing raw statement cells and formatting totals.
//!
//! Statement exports mix numeric cells with text in several regional
//! conventions. The text rules follow the Colombian convention the statements
//! are produced in: a lone `.` is always a thousands separator, never a decimal
//! point.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cell::Cell;

/// Parses an amount cell into a signed decimal.
///
/// Numeric cells are converted as they are. Text goes through
/// [`parse_amount_str`]. Empty, NaN, boolean and date cells yield `None`.
pub fn parse_amount(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Int(i) => Some(Decimal::from(*i)),
        Cell::Float(f) => Decimal::from_f64(*f),
        Cell::Decimal(d) => Some(*d),
        Cell::Text(s) => parse_amount_str(s),
        Cell::Empty | Cell::Bool(_) | Cell::DateTime(_) => None,
    }
}

/// Parses a textual amount such as `"$ -45.000,00"`, `"1000,50"` or `"300.000"`.
pub fn parse_amount_str(raw: &str) -> Option<Decimal> {
    let cleaned = strip_currency(raw.trim());
    if cleaned.is_empty() {
        return None;
    }

    let has_dot = cleaned.contains('.');
    let has_comma = cleaned.contains(',');
    let normalized = match (has_dot, has_comma) {
        (true, false) => cleaned.replace('.', ""),
        (true, true) => cleaned.replace('.', "").replace(',', "."),
        (false, true) => cleaned.replace(',', "."),
        (false, false) => cleaned,
    };

    if !normalized
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
    {
        return None;
    }
    Decimal::from_str(&normalized).ok()
}

/// Removes a leading `$`, also when it follows the minus sign (`-$1.000`).
fn strip_currency(s: &str) -> String {
    if let Some(rest) = s.strip_prefix('$') {
        rest.trim().to_string()
    } else if let Some(rest) = s.strip_prefix("-$") {
        format!("-{}", rest.trim())
    } else {
        s.to_string()
    }
}

/// A display wrapper for summed amounts, e.g. `$1,234,567.89`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0.is_sign_negative() && !self.0.is_zero() {
            "-"
        } else {
            ""
        };
        let fixed = format!("{:.2}", self.0.abs());
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (ix, ch) in whole.chars().enumerate() {
            if ix > 0 && (whole.len() - ix) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "{sign}${grouped}.{cents}")
    }
}
