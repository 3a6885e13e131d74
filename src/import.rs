// ============================================================================
// IMPORT - bulk transaction entry from CSV or JSON files
// ============================================================================
//
// Rows without a category, with a zero amount or with an amount longer than
// the forms accept are skipped, the same rule the batch entry form applies.
// Rows default to expenses when `type` is empty.

use std::path::Path;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;

use crate::ledger::{MAX_AMOUNT, Transaction, TxKind, amount_value};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub transactions: Vec<Transaction>,
    pub skipped: usize,
}

#[derive(Debug, serde::Deserialize)]
struct ImportRow {
    date: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    amount: serde_json::Value,
    #[serde(default)]
    memo: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

pub fn import_transactions(path: &Path, default_date: NaiveDate) -> Result<ImportReport> {
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

    let rows = match extension.to_lowercase().as_str() {
        "json" => read_json(path)?,
        "csv" => read_csv(path)?,
        _ => return Err(anyhow!("Unsupported file format. Use .json or .csv")),
    };

    let mut report = ImportReport::default();
    for row in rows {
        match row_to_transaction(row, default_date) {
            Some(tx) => report.transactions.push(tx),
            None => report.skipped += 1,
        }
    }
    log::info!(
        "import from {}: {} rows accepted, {} skipped",
        path.display(),
        report.transactions.len(),
        report.skipped
    );
    Ok(report)
}

fn read_json(path: &Path) -> Result<Vec<ImportRow>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn read_csv(path: &Path) -> Result<Vec<ImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let field = |i: usize| record.get(i).unwrap_or("").to_string();
        rows.push(ImportRow {
            date: field(0),
            category: field(1),
            amount: serde_json::Value::String(field(2)),
            memo: field(3),
            kind: record.get(4).map(str::to_string),
        });
    }
    Ok(rows)
}

fn row_to_transaction(row: ImportRow, default_date: NaiveDate) -> Option<Transaction> {
    let category = row.category.trim();
    if category.is_empty() {
        return None;
    }

    // The sign in the file is ignored; the type column decides it
    let raw = match &row.amount {
        serde_json::Value::Number(n) => n.as_i64()?.unsigned_abs(),
        serde_json::Value::String(s) => amount_value(s)?,
        _ => return None,
    };
    if raw == 0 || raw > MAX_AMOUNT {
        return None;
    }

    let kind = match row.kind.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        Some(text) => TxKind::parse(text)?,
        None => TxKind::Expense,
    };

    let date = if row.date.trim().is_empty() {
        default_date
    } else {
        NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d").ok()?
    };

    Some(Transaction::new(
        date,
        category.to_string(),
        kind.signed(raw),
        row.memo.trim().to_string(),
    ))
}
