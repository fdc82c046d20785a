use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::expand_home;
use crate::models::Expense;

/// Writes `expenses` as CSV with an `id,amount,category,description` header.
/// Returns the number of rows written.
pub(crate) fn export_expenses(expenses: &[Expense], path: &Path) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    writer.write_record(["id", "amount", "category", "description"])?;
    for expense in expenses {
        writer.write_record([
            expense.id.to_string(),
            expense.amount.to_string(),
            expense.category.clone(),
            expense.description.clone(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;
    tracing::info!(rows = expenses.len(), path = %path.display(), "expenses exported");
    Ok(expenses.len())
}

/// `~/budgetledger-export-YYYY-MM-DD.csv`, or `path` with `~/` expanded.
pub(crate) fn export_path(path: Option<&str>) -> PathBuf {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => PathBuf::from(expand_home(p)),
        None => {
            let today = chrono::Local::now().format("%Y-%m-%d");
            PathBuf::from(expand_home(&format!("~/budgetledger-export-{today}.csv")))
        }
    }
}
