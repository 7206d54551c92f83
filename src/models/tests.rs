#![allow(clippy::unwrap_used, clippy::panic)]

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal_macros::dec;

use super::transaction::{format_date, parse_date};
use super::*;
use crate::error::LedgerError;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, micro: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_micro_opt(h, min, s, micro)
        .unwrap()
}

// ── Dates ─────────────────────────────────────────────────────

#[test]
fn test_format_date_has_six_fraction_digits() {
    assert_eq!(
        format_date(&at(2024, 1, 15, 9, 30, 0, 250_000)),
        "2024-01-15 09:30:00.250000"
    );
    assert_eq!(
        format_date(&at(2024, 1, 15, 9, 30, 0, 0)),
        "2024-01-15 09:30:00.000000"
    );
}

#[test]
fn test_parse_date_exact() {
    let parsed = parse_date("2023-11-02 17:04:59.123456").unwrap();
    assert_eq!(parsed, at(2023, 11, 2, 17, 4, 59, 123_456));
}

#[test]
fn test_format_parse_is_lossless() {
    let date = at(2024, 2, 29, 23, 59, 59, 999_999);
    assert_eq!(parse_date(&format_date(&date)).unwrap(), date);
}

#[test]
fn test_parse_date_garbage_is_corruption() {
    let err = parse_date("last tuesday").unwrap_err();
    assert!(matches!(err, LedgerError::DataCorruption(_)));
}

#[test]
fn test_parse_date_date_only_is_corruption() {
    assert!(matches!(
        parse_date("2024-01-15"),
        Err(LedgerError::DataCorruption(_))
    ));
}

// ── Transaction ───────────────────────────────────────────────

#[test]
fn test_new_drops_nanoseconds() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_nano_opt(12, 0, 0, 123_456_789)
        .unwrap();
    let txn = Transaction::new(date, dec!(10), "FOOD".into());
    assert_eq!(txn.date, at(2024, 3, 1, 12, 0, 0, 123_456));
    assert!(txn.id.is_none());
}

#[test]
fn test_now_roundtrips_through_storage_text() {
    let txn = Transaction::now(dec!(12.34), "FOOD".into());
    let restored = Transaction::from_stored(1, &txn.date_string(), "12.34", "FOOD".into()).unwrap();
    assert_eq!(restored.date, txn.date);
    assert_eq!(restored.amount, txn.amount);
    assert_eq!(restored.id, Some(1));
}

#[test]
fn test_from_stored_bad_amount() {
    let err = Transaction::from_stored(7, "2024-01-15 10:00:00.000000", "twelve", "FOOD".into())
        .unwrap_err();
    match err {
        LedgerError::DataCorruption(msg) => assert!(msg.contains("transaction 7")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_category_is_free_form() {
    let txn = Transaction::new(at(2024, 1, 1, 0, 0, 0, 0), dec!(1), "coffee & snacks".into());
    assert_eq!(txn.category, "coffee & snacks");
}

// ── User ──────────────────────────────────────────────────────

#[test]
fn test_user_new_defaults() {
    let user = User::new("alice".into(), "$argon2id$stub".into(), dec!(1000));
    assert_eq!(user.username, "alice");
    assert_eq!(user.income, dec!(1000));
    assert!(!user.created_at.is_empty());
}

#[test]
fn test_user_can_afford_boundary() {
    let user = User::new("alice".into(), String::new(), dec!(800));
    assert!(user.can_afford(dec!(800)));
    assert!(user.can_afford(dec!(0.01)));
    assert!(!user.can_afford(dec!(800.01)));
}
