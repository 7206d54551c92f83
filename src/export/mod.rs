use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Transaction;

/// Write transactions as `date,amount,category` rows under a header line.
/// Returns the number of transactions written.
pub(crate) fn write_csv(path: &Path, transactions: &[Transaction]) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    writer.write_record(["date", "amount", "category"])?;
    for txn in transactions {
        writer.write_record([
            txn.date_string(),
            txn.amount.to_string(),
            txn.category.clone(),
        ])?;
    }
    writer.flush()?;
    tracing::info!(path = %path.display(), count = transactions.len(), "exported transactions");
    Ok(transactions.len())
}
