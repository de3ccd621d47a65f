use saldo_core::NormalizedTransaction;
use std::io::Write;

pub const FLOW_HEADER: &str = "DEBIT/CREDIT";
pub const CATEGORY_HEADER: &str = "Category";

/// Writes transactions as CSV: the outcome's columns, then flow and category.
/// Amounts are written as plain decimals; unparseable ones as empty fields.
pub fn write_csv<W: Write>(
    writer: W,
    columns: &[String],
    transactions: &[NormalizedTransaction],
) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = columns.iter().map(String::as_str).collect();
    header.push(FLOW_HEADER);
    header.push(CATEGORY_HEADER);
    out.write_record(&header)?;

    for tx in transactions {
        let mut record: Vec<String> = tx.cells.iter().map(ToString::to_string).collect();
        record.resize(columns.len(), String::new());
        record.push(tx.flow.to_string());
        record.push(tx.category.clone());
        out.write_record(&record)?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use saldo_core::{Cell, Flow};

    #[test]
    fn write_csv_appends_flow_and_category() {
        let columns = vec!["DESCRIPCIÓN".to_string(), "VALOR".to_string()];
        let txs = vec![
            NormalizedTransaction {
                row: 0,
                amount: Some(dec!(-45000.00)),
                flow: Flow::Debit,
                category: "Subscriptions".to_string(),
                description: "NETFLIX".to_string(),
                date: None,
                period_month: None,
                period_week: None,
                cells: vec![Cell::text("NETFLIX"), Cell::Decimal(dec!(-45000.00))],
            },
            NormalizedTransaction {
                row: 1,
                amount: None,
                flow: Flow::Credit,
                category: "Uncategorized".to_string(),
                description: "A, B".to_string(),
                date: None,
                period_month: None,
                period_week: None,
                cells: vec![Cell::text("A, B"), Cell::Empty],
            },
        ];

        let mut buf = Vec::new();
        write_csv(&mut buf, &columns, &txs).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "DESCRIPCIÓN,VALOR,DEBIT/CREDIT,Category\n\
             NETFLIX,-45000.00,DEBIT,Subscriptions\n\
             \"A, B\",,CREDIT,Uncategorized\n"
        );
    }
}
