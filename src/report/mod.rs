use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::db::Database;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Session;

/// Spending per category for one calendar month (not a rolling window).
///
/// Categories with no transactions in the month are absent; a month with no
/// spending yields an empty map.
pub(crate) fn monthly_category_totals(
    db: &Database,
    username: &str,
    year: i32,
    month: u32,
) -> LedgerResult<BTreeMap<String, Decimal>> {
    if !(1..=12).contains(&month) {
        return Err(LedgerError::validation(format!("Invalid month: {month}")));
    }
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for (category, amount) in db.get_month_amounts(username, year, month)? {
        let total = totals.entry(category).or_default();
        *total = total
            .checked_add(amount)
            .ok_or_else(|| LedgerError::validation("Monthly total is out of range"))?;
    }
    Ok(totals)
}

/// Net retained funds.
///
/// Defined as `initial - spent` where `initial = income + spent`, i.e. the
/// balance before any recorded expense minus everything recorded since.
/// That is always exactly the current income.
pub(crate) fn total_savings(session: &Session) -> Decimal {
    session.income()
}

/// Parse a "YYYY-MM" month argument.
pub(crate) fn parse_month(s: &str) -> LedgerResult<(i32, u32)> {
    let invalid = || LedgerError::validation(format!("Invalid month '{s}', expected YYYY-MM"));
    let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}
