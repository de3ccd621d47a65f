use anyhow::{Context, Result};
use saldo_core::report::{self, DailyHeatmap};
use saldo_core::{CategoryError, CategoryTable, Money, NormalizedTransaction};
use saldo_import::{write_csv, IngestOutcome};
use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::session::Session;

const TOP_CATEGORIES: usize = 5;

pub struct ExportTargets<'a> {
    pub debits: Option<&'a Path>,
    pub credits: Option<&'a Path>,
    pub all: Option<&'a Path>,
}

pub fn cmd_ingest(session: &Session, file: &Path, exports: ExportTargets<'_>, json: bool) -> Result<()> {
    let outcome = session
        .ingest(file)
        .with_context(|| format!("Failed to ingest {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_ingest(&outcome)?);
    }

    for (target, rows) in [
        (exports.debits, &outcome.debits),
        (exports.credits, &outcome.credits),
        (exports.all, &outcome.transactions),
    ] {
        if let Some(path) = target {
            export(path, &outcome.columns, rows)?;
            eprintln!("Wrote {} rows to {}", rows.len(), path.display());
        }
    }
    Ok(())
}

pub fn cmd_report(session: &Session, file: &Path, weekly_window: usize) -> Result<()> {
    let outcome = session
        .ingest(file)
        .with_context(|| format!("Failed to ingest {}", file.display()))?;
    print!("{}", render_report(&outcome.transactions, weekly_window)?);
    Ok(())
}

pub fn cmd_categories_list(session: &Session) -> Result<()> {
    if let Some(diagnostic) = session.load_diagnostic() {
        eprintln!("Note: {diagnostic}");
    }
    print!("{}", render_categories(session.categories())?);
    Ok(())
}

pub fn cmd_categories_add(session: &mut Session, name: &str, keywords: &[String]) -> Result<()> {
    match session.add_category(name, keywords) {
        Ok(()) => {
            println!(
                "Added category '{}' with {} keyword(s) to {}",
                name.trim(),
                keywords.len(),
                session.store().path().display()
            );
            Ok(())
        }
        Err(e) => match e.downcast_ref::<CategoryError>() {
            Some(CategoryError::Duplicate(existing)) => {
                anyhow::bail!("Category '{existing}' already exists; nothing was changed")
            }
            _ => Err(e),
        },
    }
}

fn export(path: &Path, columns: &[String], rows: &[NormalizedTransaction]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(BufWriter::new(file), columns, rows)
        .with_context(|| format!("Failed to write {}", path.display()))
}

// ── Rendering ────────────────────────────────────────────────────────────────

pub fn render_ingest(outcome: &IngestOutcome) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{}", outcome.summary_message())?;
    writeln!(
        out,
        "  debits: {}  credits: {}",
        outcome.counts.debits, outcome.counts.credits
    )?;

    if outcome.needs_attention() > 0 {
        writeln!(out, "{} value(s) need attention:", outcome.needs_attention())?;
        for failure in &outcome.parse_failures {
            writeln!(out, "  row {}: {:?}", failure.row + 1, failure.raw)?;
        }
    }
    for diagnostic in &outcome.diagnostics {
        writeln!(out, "warning: {diagnostic}")?;
    }

    let breakdown = report::category_breakdown(&outcome.transactions);
    if !breakdown.is_empty() {
        writeln!(out, "\nSpending by category:")?;
        for total in &breakdown {
            writeln!(
                out,
                "  {:<24} {:>16}  ({})",
                total.category,
                Money::from_decimal(total.amount).to_string(),
                total.transactions
            )?;
        }
    }
    Ok(out)
}

pub fn render_report(
    txs: &[NormalizedTransaction],
    weekly_window: usize,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let summary = report::summary(txs);
    writeln!(out, "Transactions: {}", summary.total)?;
    writeln!(out, "Expenses:     {}", summary.expenses)?;
    writeln!(out, "Income:       {}", summary.income)?;
    let average = summary
        .average_expense
        .map(|avg| Money::from_decimal(avg).to_string())
        .unwrap_or_else(|| "-".to_string());
    writeln!(out, "Avg expense:  {average}")?;

    let monthly = report::monthly_spending(txs);
    if !monthly.is_empty() {
        writeln!(out, "\nMonthly spending:")?;
        for (month, amount) in monthly {
            writeln!(out, "  {month}  {:>16}", Money::from_decimal(amount).to_string())?;
        }
    }

    let weekly = report::weekly_spending(txs, weekly_window);
    if !weekly.is_empty() {
        writeln!(out, "\nWeekly spending (last {weekly_window}):")?;
        for (week, amount) in weekly {
            writeln!(out, "  {week}  {:>16}", Money::from_decimal(amount).to_string())?;
        }
    }

    let top = report::top_categories(txs, TOP_CATEGORIES);
    if !top.is_empty() {
        writeln!(out, "\nTop categories:")?;
        for total in top {
            writeln!(
                out,
                "  {:<24} {:>16}",
                total.category,
                Money::from_decimal(total.amount).to_string()
            )?;
        }
    }

    let flows = report::income_vs_expenses(txs);
    if !flows.is_empty() {
        writeln!(out, "\nIncome vs expenses:")?;
        for flow in flows {
            writeln!(
                out,
                "  {}  in {:>16}  out {:>16}",
                flow.month,
                Money::from_decimal(flow.income).to_string(),
                Money::from_decimal(flow.expenses).to_string()
            )?;
        }
    }

    let heatmap = report::daily_heatmap(txs);
    if !heatmap.is_empty() {
        writeln!(out, "\nDaily expenses (month x day):")?;
        out.push_str(&render_heatmap(&heatmap)?);
    }
    Ok(out)
}

/// One line per month; `.` marks a day without expenses.
fn render_heatmap(heatmap: &DailyHeatmap) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for month in heatmap.months() {
        let cells: Vec<String> = heatmap
            .row(month)
            .into_iter()
            .map(|cell| cell.map_or_else(|| ".".to_string(), |v| v.round_dp(0).to_string()))
            .collect();
        writeln!(out, "  {month:02}: {}", cells.join(" "))?;
    }
    Ok(out)
}

pub fn render_categories(table: &CategoryTable) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for (name, keywords) in table.iter() {
        writeln!(out, "{name} ({} keywords)", keywords.len())?;
    }
    let stats = table.stats();
    writeln!(
        out,
        "\n{} categories, {} keywords",
        stats.total_categories, stats.total_keywords
    )?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use saldo_core::CategoryTable;
    use saldo_import::ReadOptions;
    use saldo_storage::CategoryStore;
    use std::fs;

    const STATEMENT: &str = "\
FECHA,DESCRIPCIÓN,VALOR
15/01/2024,NETFLIX,\"-45.000,00\"
20/01/2024,NOMINA,\"3.000.000,00\"
03/02/2024,EXITO,-120.000
,MYSTERY,abc
";

    fn session_with(dir: &tempfile::TempDir) -> Session {
        let store = CategoryStore::new(dir.path().join("categories.json"));
        store
            .save(&CategoryTable::from_entries(vec![
                ("Subscriptions", vec!["NETFLIX"]),
                ("Groceries", vec!["EXITO"]),
            ]))
            .unwrap();
        Session::open(store, ReadOptions::default())
    }

    fn statement(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("statement.csv");
        fs::write(&path, STATEMENT).unwrap();
        path
    }

    // ── ingest ───────────────────────────────────────────────────────────────

    #[test]
    fn render_ingest_lists_counts_attention_and_breakdown() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = session_with(&dir).ingest(&statement(&dir)).unwrap();
        let text = render_ingest(&outcome).unwrap();

        assert!(text.starts_with("Successfully loaded 4 transactions\n"));
        assert!(text.contains("debits: 2  credits: 2"));
        assert!(text.contains("1 value(s) need attention"));
        assert!(text.contains("row 4: \"abc\""));
        assert!(text.contains("warning: 1 row(s) have no usable date"));
        assert!(text.contains("$120,000.00"));
        assert!(text.contains("$45,000.00"));
    }

    #[test]
    fn cmd_ingest_writes_exports() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(&dir);
        let debits = dir.path().join("debits.csv");
        let all = dir.path().join("all.csv");

        cmd_ingest(
            &session,
            &statement(&dir),
            ExportTargets {
                debits: Some(&debits),
                credits: None,
                all: Some(&all),
            },
            false,
        )
        .unwrap();

        let debits_text = fs::read_to_string(&debits).unwrap();
        assert_eq!(debits_text.lines().count(), 3);
        assert!(debits_text.lines().all(|l| !l.contains("NOMINA")));
        assert_eq!(fs::read_to_string(&all).unwrap().lines().count(), 5);
    }

    #[test]
    fn cmd_ingest_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(&dir);
        let result = cmd_ingest(
            &session,
            &dir.path().join("missing.csv"),
            ExportTargets {
                debits: None,
                credits: None,
                all: None,
            },
            true,
        );
        assert!(result.is_err());
    }

    // ── report ───────────────────────────────────────────────────────────────

    #[test]
    fn render_report_sections() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = session_with(&dir).ingest(&statement(&dir)).unwrap();
        let text = render_report(&outcome.transactions, 12).unwrap();

        assert!(text.contains("Transactions: 4"));
        assert!(text.contains("Expenses:     2"));
        assert!(text.contains("Monthly spending:"));
        assert!(text.contains("2024-01"));
        assert!(text.contains("Weekly spending (last 12):"));
        assert!(text.contains("Top categories:"));
        assert!(text.contains("Income vs expenses:"));
        assert!(text.contains("  01: "));
        assert!(text.contains("  02: "));
    }

    #[test]
    fn render_report_without_transactions() {
        let text = render_report(&[], 12).unwrap();
        assert!(text.contains("Transactions: 0"));
        assert!(text.contains("Avg expense:  -"));
        assert!(!text.contains("Monthly spending"));
    }

    // ── categories ───────────────────────────────────────────────────────────

    #[test]
    fn render_categories_with_stats() {
        let table = CategoryTable::from_entries(vec![
            ("Subscriptions", vec!["NETFLIX", "SPOTIFY"]),
            ("Groceries", vec!["EXITO"]),
        ]);
        let text = render_categories(&table).unwrap();
        assert!(text.contains("Subscriptions (2 keywords)"));
        assert!(text.contains("3 categories, 3 keywords"));
    }

    #[test]
    fn cmd_categories_add_rejects_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(&dir);
        let err = cmd_categories_add(&mut session, "Groceries", &["CARULLA".to_string()]).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        cmd_categories_add(&mut session, "Transport", &["UBER".to_string()]).unwrap();
        assert!(session.categories().contains("Transport"));
    }
}
