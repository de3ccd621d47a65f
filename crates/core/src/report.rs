//! Aggregates over normalized transactions for the dashboard: headline
//! metrics, spending trends, category breakdown, income vs expenses and the
//! day-of-month heatmap.
//!
//! Expenses are the absolute values of debit amounts; income is the sum of
//! credit amounts. Rows without an amount add nothing, and rows without a
//! date are left out of every time-bucketed view. Sums saturate at the
//! `Decimal` bounds instead of overflowing.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::period::{MonthKey, WeekKey};
use crate::transaction::{Flow, NormalizedTransaction};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total: usize,
    pub expenses: usize,
    pub income: usize,
    pub average_expense: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
    pub transactions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyFlow {
    pub month: MonthKey,
    pub income: Decimal,
    pub expenses: Decimal,
}

fn expense(tx: &NormalizedTransaction) -> Option<Decimal> {
    match tx.flow {
        Flow::Debit => tx.amount.map(|a| a.abs()),
        Flow::Credit => None,
    }
}

fn income(tx: &NormalizedTransaction) -> Option<Decimal> {
    match tx.flow {
        Flow::Credit => tx.amount,
        Flow::Debit => None,
    }
}

fn add_to(total: &mut Decimal, amount: Decimal) {
    *total = total.saturating_add(amount);
}

pub fn summary(txs: &[NormalizedTransaction]) -> SummaryMetrics {
    let expenses: Vec<Decimal> = txs.iter().filter_map(expense).collect();
    let average_expense = if expenses.is_empty() {
        None
    } else {
        let sum = expenses
            .iter()
            .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(*amount));
        Some((sum / Decimal::from(expenses.len())).round_dp(2))
    };

    SummaryMetrics {
        total: txs.len(),
        expenses: txs.iter().filter(|t| t.is_debit()).count(),
        income: txs.iter().filter(|t| t.is_credit()).count(),
        average_expense,
    }
}

/// Total spending per month, oldest first.
pub fn monthly_spending(txs: &[NormalizedTransaction]) -> Vec<(MonthKey, Decimal)> {
    let mut buckets: BTreeMap<MonthKey, Decimal> = BTreeMap::new();
    for tx in txs {
        if let (Some(month), Some(amount)) = (tx.period_month, expense(tx)) {
            add_to(buckets.entry(month).or_default(), amount);
        }
    }
    buckets.into_iter().collect()
}

/// Total spending for the most recent `last_n` weeks that have any, oldest first.
pub fn weekly_spending(txs: &[NormalizedTransaction], last_n: usize) -> Vec<(WeekKey, Decimal)> {
    let mut buckets: BTreeMap<WeekKey, Decimal> = BTreeMap::new();
    for tx in txs {
        if let (Some(week), Some(amount)) = (tx.period_week, expense(tx)) {
            add_to(buckets.entry(week).or_default(), amount);
        }
    }
    let skip = buckets.len().saturating_sub(last_n);
    buckets.into_iter().skip(skip).collect()
}

/// Spending per category, largest first; ties broken by name.
pub fn category_breakdown(txs: &[NormalizedTransaction]) -> Vec<CategoryTotal> {
    let mut buckets: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();
    for tx in txs {
        if let Some(amount) = expense(tx) {
            let entry = buckets.entry(tx.category.as_str()).or_default();
            add_to(&mut entry.0, amount);
            entry.1 += 1;
        }
    }

    let mut totals: Vec<CategoryTotal> = buckets
        .into_iter()
        .map(|(category, (amount, transactions))| CategoryTotal {
            category: category.to_string(),
            amount,
            transactions,
        })
        .collect();
    totals.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    totals
}

pub fn top_categories(txs: &[NormalizedTransaction], n: usize) -> Vec<CategoryTotal> {
    let mut totals = category_breakdown(txs);
    totals.truncate(n);
    totals
}

/// Monthly income and expense totals, oldest first. A month appears when it
/// has at least one dated row with an amount.
pub fn income_vs_expenses(txs: &[NormalizedTransaction]) -> Vec<MonthlyFlow> {
    let mut buckets: BTreeMap<MonthKey, (Decimal, Decimal)> = BTreeMap::new();
    for tx in txs {
        let Some(month) = tx.period_month else { continue };
        if let Some(amount) = income(tx) {
            add_to(&mut buckets.entry(month).or_default().0, amount);
        } else if let Some(amount) = expense(tx) {
            add_to(&mut buckets.entry(month).or_default().1, amount);
        }
    }
    buckets
        .into_iter()
        .map(|(month, (income, expenses))| MonthlyFlow {
            month,
            income,
            expenses,
        })
        .collect()
}

/// Spending summed by calendar month (rows) and day of month (columns),
/// regardless of year.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DailyHeatmap {
    cells: BTreeMap<u32, BTreeMap<u32, Decimal>>,
}

impl DailyHeatmap {
    pub fn get(&self, month: u32, day: u32) -> Option<Decimal> {
        self.cells.get(&month).and_then(|days| days.get(&day)).copied()
    }

    /// Months with any spending, ascending.
    pub fn months(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.keys().copied()
    }

    /// One row of 31 slots for `month`; `None` where nothing was spent.
    pub fn row(&self, month: u32) -> Vec<Option<Decimal>> {
        (1..=31).map(|day| self.get(month, day)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

pub fn daily_heatmap(txs: &[NormalizedTransaction]) -> DailyHeatmap {
    let mut heatmap = DailyHeatmap::default();
    for tx in txs {
        if let (Some(date), Some(amount)) = (tx.date, expense(tx)) {
            let cell = heatmap
                .cells
                .entry(date.month())
                .or_default()
                .entry(date.day())
                .or_default();
            add_to(cell, amount);
        }
    }
    heatmap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UNCATEGORIZED;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(amount: Option<Decimal>, category: &str, date: Option<(i32, u32, u32)>) -> NormalizedTransaction {
        let mut tx = NormalizedTransaction {
            row: 0,
            amount,
            flow: Flow::classify(amount),
            category: category.to_string(),
            description: String::new(),
            date: None,
            period_month: None,
            period_week: None,
            cells: Vec::new(),
        };
        tx.set_date(date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)));
        tx
    }

    fn month(year: i32, month: u32) -> MonthKey {
        MonthKey::from_date(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
    }

    fn sample() -> Vec<NormalizedTransaction> {
        vec![
            tx(Some(dec!(-100)), "Food", Some((2024, 1, 3))),
            tx(Some(dec!(-50)), "Fun", Some((2024, 1, 3))),
            tx(Some(dec!(1000)), UNCATEGORIZED, Some((2024, 1, 15))),
            tx(Some(dec!(-30)), "Food", Some((2024, 2, 10))),
            tx(None, UNCATEGORIZED, Some((2024, 2, 11))),
            tx(Some(dec!(-20)), "Fun", None),
        ]
    }

    // ── summary ──────────────────────────────────────────────────────────────

    #[test]
    fn summary_counts_and_average() {
        let s = summary(&sample());
        assert_eq!(s.total, 6);
        assert_eq!(s.expenses, 4);
        assert_eq!(s.income, 2);
        assert_eq!(s.average_expense, Some(dec!(50)));
    }

    #[test]
    fn summary_without_expenses_has_no_average() {
        let s = summary(&[tx(Some(dec!(10)), "X", None)]);
        assert_eq!(s.average_expense, None);
    }

    // ── trends ───────────────────────────────────────────────────────────────

    #[test]
    fn monthly_spending_skips_undated_rows() {
        let months = monthly_spending(&sample());
        assert_eq!(
            months,
            vec![
                (month(2024, 1), dec!(150)),
                (month(2024, 2), dec!(30)),
            ]
        );
    }

    #[test]
    fn weekly_spending_keeps_last_weeks() {
        let weeks = weekly_spending(&sample(), 1);
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].0.to_string(), "2024-02-05/2024-02-11");
        assert_eq!(weeks[0].1, dec!(30));

        assert_eq!(weekly_spending(&sample(), 12).len(), 2);
    }

    // ── categories ───────────────────────────────────────────────────────────

    #[test]
    fn category_breakdown_sorted_descending() {
        let totals = category_breakdown(&sample());
        assert_eq!(totals[0].category, "Food");
        assert_eq!(totals[0].amount, dec!(130));
        assert_eq!(totals[0].transactions, 2);
        assert_eq!(totals[1].category, "Fun");
        assert_eq!(totals[1].amount, dec!(70));
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn top_categories_truncates() {
        assert_eq!(top_categories(&sample(), 1).len(), 1);
    }

    // ── income vs expenses ───────────────────────────────────────────────────

    #[test]
    fn income_vs_expenses_by_month() {
        let flows = income_vs_expenses(&sample());
        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].income, dec!(1000));
        assert_eq!(flows[0].expenses, dec!(150));
        assert_eq!(flows[1].income, Decimal::ZERO);
        assert_eq!(flows[1].expenses, dec!(30));
    }

    // ── heatmap ──────────────────────────────────────────────────────────────

    #[test]
    fn heatmap_sums_by_month_and_day() {
        let heatmap = daily_heatmap(&sample());
        assert_eq!(heatmap.get(1, 3), Some(dec!(150)));
        assert_eq!(heatmap.get(2, 10), Some(dec!(30)));
        assert_eq!(heatmap.get(2, 11), None);
        assert_eq!(heatmap.months().collect::<Vec<_>>(), vec![1, 2]);
        let row = heatmap.row(1);
        assert_eq!(row.len(), 31);
        assert_eq!(row[2], Some(dec!(150)));
    }

    #[test]
    fn heatmap_empty_without_dates() {
        assert!(daily_heatmap(&[tx(Some(dec!(-5)), "X", None)]).is_empty());
    }

    // ── overflow ─────────────────────────────────────────────────────────────

    #[test]
    fn sums_saturate_instead_of_panicking() {
        let huge = crate::parse_amount_str("-79228162514264337593543950335");
        assert_eq!(huge, Some(-Decimal::MAX));
        let txs = vec![
            tx(huge, "Big", Some((2024, 3, 1))),
            tx(huge, "Big", Some((2024, 3, 1))),
            tx(Some(Decimal::MAX), UNCATEGORIZED, Some((2024, 3, 2))),
            tx(Some(Decimal::MAX), UNCATEGORIZED, Some((2024, 3, 2))),
        ];

        let totals = category_breakdown(&txs);
        assert_eq!(totals[0].amount, Decimal::MAX);
        assert_eq!(totals[0].transactions, 2);
        assert_eq!(monthly_spending(&txs), vec![(month(2024, 3), Decimal::MAX)]);
        assert_eq!(weekly_spending(&txs, 12)[0].1, Decimal::MAX);
        let flows = income_vs_expenses(&txs);
        assert_eq!(flows[0].income, Decimal::MAX);
        assert_eq!(flows[0].expenses, Decimal::MAX);
        assert_eq!(daily_heatmap(&txs).get(3, 1), Some(Decimal::MAX));
        assert!(summary(&txs).average_expense.is_some());
    }
}
