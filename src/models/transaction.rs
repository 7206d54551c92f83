use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};

/// Storage format for transaction dates, e.g. `2024-01-15 09:30:00.250000`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Accepts the storage format and also a date without fractional seconds.
const DATE_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: Option<i64>,
    pub date: NaiveDateTime,
    pub amount: Decimal,
    pub category: String,
}

impl Transaction {
    pub fn new(date: NaiveDateTime, amount: Decimal, category: String) -> Self {
        Self {
            id: None,
            date: truncate_to_micros(date),
            amount,
            category,
        }
    }

    /// A transaction dated now, in local time.
    pub fn now(amount: Decimal, category: String) -> Self {
        Self::new(chrono::Local::now().naive_local(), amount, category)
    }

    /// Rebuild a transaction from its stored text columns.
    pub fn from_stored(id: i64, date: &str, amount: &str, category: String) -> LedgerResult<Self> {
        Ok(Self {
            id: Some(id),
            date: parse_date(date)?,
            amount: Decimal::from_str(amount).map_err(|_| {
                LedgerError::corruption(format!("transaction {id} has invalid amount '{amount}'"))
            })?,
            category,
        })
    }

    pub fn date_string(&self) -> String {
        format_date(&self.date)
    }
}

pub fn format_date(date: &NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> LedgerResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), DATE_PARSE_FORMAT)
        .map_err(|e| LedgerError::corruption(format!("unreadable timestamp '{s}': {e}")))
}

/// Drop sub-microsecond precision so a stored date parses back to the same value.
fn truncate_to_micros(date: NaiveDateTime) -> NaiveDateTime {
    let micros = date.nanosecond() / 1_000;
    date.with_nanosecond(micros * 1_000).unwrap_or(date)
}
