#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;
use crate::error::LedgerError;

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
    assert_eq!(format_amount(dec!(800)), "$800.00");
    assert_eq!(format_amount(dec!(1234567.891)), "$1,234,567.89");
    assert_eq!(format_amount(dec!(-42.5)), "-$42.50");
}

#[test]
fn test_format_amount_no_sign_when_rounding_to_zero() {
    assert_eq!(format_amount(dec!(-0.004)), "$0.00");
    assert_eq!(format_amount(dec!(-0.005)), "$0.00");
    assert_eq!(format_amount(dec!(-0.006)), "-$0.01");
}

#[test]
fn test_format_amount_rounds_half_even() {
    assert_eq!(format_amount(dec!(0.125)), "$0.12");
    assert_eq!(format_amount(dec!(0.135)), "$0.14");
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate() {
    assert_eq!(truncate("FOOD", 10), "FOOD");
    assert_eq!(truncate("TRANSPORTATION", 6), "TRANS…");
    assert_eq!(truncate("anything", 0), "");
    assert_eq!(truncate("日本語テスト", 4), "日本語…");
}

// ── parse_amount ──────────────────────────────────────────────

#[test]
fn test_parse_amount_plain() {
    assert_eq!(parse_amount("200").unwrap(), dec!(200));
    assert_eq!(parse_amount(" 12.34 ").unwrap(), dec!(12.34));
    assert_eq!(parse_amount("-99.99").unwrap(), dec!(-99.99));
}

#[test]
fn test_parse_amount_currency_formatting() {
    assert_eq!(parse_amount("$1,234.50").unwrap(), dec!(1234.50));
    assert_eq!(parse_amount("-$5").unwrap(), dec!(-5));
}

#[test]
fn test_parse_amount_rejects_non_numeric() {
    for input in ["", "   ", "$", "ten", "12abc", "1.2.3", "--5", "-$-5", "$-5", "-+5", "+-5"] {
        assert!(
            matches!(parse_amount(input), Err(LedgerError::Validation(_))),
            "{input:?} should be rejected"
        );
    }
}
