use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"$1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let rounded = val.round_dp(2);
    let abs = rounded.abs();
    let formatted = format!("{abs:.2}");
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if rounded < Decimal::ZERO {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Parse a typed amount. Tolerates surrounding whitespace, a leading `$`
/// and thousands separators; anything else non-numeric is rejected.
pub(crate) fn parse_amount(input: &str) -> LedgerResult<Decimal> {
    let trimmed = input.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let cleaned = rest.trim_start_matches('$').replace(',', "");
    if cleaned.is_empty() {
        return Err(LedgerError::validation("Please enter a number"));
    }
    // The only sign accepted is a single leading `-`.
    if cleaned.starts_with(['-', '+']) {
        return Err(LedgerError::validation(format!("'{trimmed}' is not a valid number")));
    }
    let value = Decimal::from_str(&cleaned)
        .map_err(|_| LedgerError::validation(format!("'{trimmed}' is not a valid number")))?;
    Ok(if negative { -value } else { value })
}
