use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cell::Cell;
use crate::period::{MonthKey, WeekKey};

/// Direction of money movement for a statement row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Flow {
    Debit,
    Credit,
}

impl Flow {
    /// `Debit` only for a parsed, strictly negative amount. Zero and
    /// unparseable amounts are `Credit`.
    pub fn classify(amount: Option<Decimal>) -> Self {
        match amount {
            Some(a) if a.is_sign_negative() && !a.is_zero() => Flow::Debit,
            _ => Flow::Credit,
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flow::Debit => write!(f, "DEBIT"),
            Flow::Credit => write!(f, "CREDIT"),
        }
    }
}

/// One statement row after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTransaction {
    /// Zero-based position in the source table.
    pub row: usize,
    pub amount: Option<Decimal>,
    pub flow: Flow,
    pub category: String,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub period_month: Option<MonthKey>,
    pub period_week: Option<WeekKey>,
    /// Original cells aligned with the outcome's column list; the amount
    /// column holds the parsed value.
    pub cells: Vec<Cell>,
}

impl NormalizedTransaction {
    pub fn is_debit(&self) -> bool {
        self.flow == Flow::Debit
    }

    pub fn is_credit(&self) -> bool {
        self.flow == Flow::Credit
    }

    /// Sets the date and derives both period keys from it.
    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date;
        self.period_month = date.map(MonthKey::from_date);
        self.period_week = date.map(WeekKey::from_date);
    }
}
