#![allow(clippy::unwrap_used, clippy::panic)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;

const PASSWORD: &str = "Abcdef1@";

fn open_with(username: &str, income: Decimal) -> (Database, Session) {
    let db = Database::open_in_memory().unwrap();
    create_account(&db, username, PASSWORD, income).unwrap();
    let session = authenticate(&db, username, PASSWORD).unwrap();
    (db, session)
}

// ── Account creation ──────────────────────────────────────────

#[test]
fn test_create_account() {
    let db = Database::open_in_memory().unwrap();
    let user = create_account(&db, "alice", PASSWORD, dec!(1000)).unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.income, dec!(1000));
    assert_ne!(user.password_hash, PASSWORD);

    let stored = db.get_user("alice").unwrap().unwrap();
    assert_eq!(stored.password_hash, user.password_hash);
}

#[test]
fn test_create_account_rejects_weak_password() {
    let db = Database::open_in_memory().unwrap();
    let err = create_account(&db, "alice", "password", dec!(1000)).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(db.get_user("alice").unwrap().is_none());
}

#[test]
fn test_create_account_rejects_empty_username() {
    let db = Database::open_in_memory().unwrap();
    assert!(matches!(
        create_account(&db, "   ", PASSWORD, dec!(1)),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn test_create_account_duplicate() {
    let db = Database::open_in_memory().unwrap();
    create_account(&db, "alice", PASSWORD, dec!(1000)).unwrap();
    let err = create_account(&db, "alice", "Zyxwvu9#", dec!(5)).unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateUser(_)));
}

#[test]
fn test_weak_password_reported_before_duplicate() {
    let db = Database::open_in_memory().unwrap();
    create_account(&db, "alice", PASSWORD, dec!(1000)).unwrap();
    assert!(matches!(
        create_account(&db, "alice", "weak", dec!(5)),
        Err(LedgerError::Validation(_))
    ));
}

// ── Authentication ────────────────────────────────────────────

#[test]
fn test_authenticate_returns_income() {
    let (_db, session) = open_with("alice", dec!(1000));
    assert_eq!(session.username(), "alice");
    assert_eq!(session.income(), dec!(1000));
    assert!(session.history().is_empty());
}

#[test]
fn test_wrong_password_is_auth_error() {
    let db = Database::open_in_memory().unwrap();
    create_account(&db, "alice", PASSWORD, dec!(1000)).unwrap();
    for attempt in ["Abcdef1#", "abcdef1@", "", "Abcdef1@ "] {
        assert!(
            matches!(authenticate(&db, "alice", attempt), Err(LedgerError::Auth)),
            "{attempt:?} must be rejected"
        );
    }
}

#[test]
fn test_unknown_user_is_auth_error() {
    let db = Database::open_in_memory().unwrap();
    assert!(matches!(
        authenticate(&db, "nobody", PASSWORD),
        Err(LedgerError::Auth)
    ));
}

#[test]
fn test_authenticate_loads_history() {
    let (mut db, mut session) = open_with("alice", dec!(100));
    session.log_transaction(&mut db, dec!(10), "FOOD").unwrap();
    session.log_transaction(&mut db, dec!(5), "TRANSPORT").unwrap();

    let reloaded = authenticate(&db, "alice", PASSWORD).unwrap();
    assert_eq!(reloaded.income(), dec!(85));
    assert_eq!(reloaded.history(), session.history());
}

// ── Transactions ──────────────────────────────────────────────

#[test]
fn test_log_transaction_updates_balance_and_history() {
    let (mut db, mut session) = open_with("alice", dec!(1000));
    let before = session.income();

    let txn = session
        .log_transaction(&mut db, dec!(200), "FOOD")
        .unwrap()
        .clone();
    assert_eq!(txn.amount, dec!(200));
    assert_eq!(txn.category, "FOOD");
    assert!(txn.id.is_some());

    assert_eq!(session.income(), before - dec!(200));
    assert_eq!(session.history(), &[txn]);
    assert_eq!(db.get_user("alice").unwrap().unwrap().income, dec!(800));
}

#[test]
fn test_log_uses_given_date() {
    let (mut db, mut session) = open_with("alice", dec!(50));
    let date = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_micro_opt(9, 0, 0, 1)
        .unwrap();
    session
        .log(&mut db, Transaction::new(date, dec!(20), "FOOD".into()))
        .unwrap();
    assert_eq!(load_history(&db, "alice").unwrap()[0].date, date);
}

#[test]
fn test_spending_entire_balance_is_allowed() {
    let (mut db, mut session) = open_with("alice", dec!(42.50));
    session.log_transaction(&mut db, dec!(42.50), "RENT").unwrap();
    assert_eq!(session.income(), Decimal::ZERO);
}

#[test]
fn test_insufficient_funds_leaves_state_unchanged() {
    let (mut db, mut session) = open_with("alice", dec!(100));
    session.log_transaction(&mut db, dec!(40), "FOOD").unwrap();

    let err = session
        .log_transaction(&mut db, dec!(60.01), "RENT")
        .unwrap_err();
    match err {
        LedgerError::InsufficientFunds {
            available,
            requested,
        } => {
            assert_eq!(available, dec!(60));
            assert_eq!(requested, dec!(60.01));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(session.income(), dec!(60));
    assert_eq!(session.history().len(), 1);
    assert_eq!(db.get_transaction_count("alice").unwrap(), 1);
    assert_eq!(db.get_user("alice").unwrap().unwrap().income, dec!(60));
}

#[test]
fn test_non_positive_amount_rejected() {
    let (mut db, mut session) = open_with("alice", dec!(100));
    for amount in [Decimal::ZERO, dec!(-5)] {
        assert!(matches!(
            session.log_transaction(&mut db, amount, "FOOD"),
            Err(LedgerError::Validation(_))
        ));
    }
    assert_eq!(session.income(), dec!(100));
    assert!(session.history().is_empty());
}

#[test]
fn test_store_failure_keeps_session_intact() {
    let (mut db, mut session) = open_with("alice", dec!(100));
    db.conn_for_tests()
        .execute_batch("DROP TABLE transactions")
        .unwrap();

    assert!(matches!(
        session.log_transaction(&mut db, dec!(10), "FOOD"),
        Err(LedgerError::Store(_))
    ));
    assert_eq!(session.income(), dec!(100));
    assert!(session.history().is_empty());
}

// ── Income ────────────────────────────────────────────────────

#[test]
fn test_add_income_persists() {
    let (db, mut session) = open_with("alice", dec!(100));
    assert_eq!(session.add_income(&db, dec!(2500)).unwrap(), dec!(2600));
    assert_eq!(db.get_user("alice").unwrap().unwrap().income, dec!(2600));
}

#[test]
fn test_add_income_round_trip_is_exact() {
    let (db, mut session) = open_with("alice", dec!(1000.10));
    for amount in [dec!(0.1), dec!(0.2), dec!(1234.5678), dec!(-99.99)] {
        let before = session.income();
        session.add_income(&db, amount).unwrap();
        session.add_income(&db, -amount).unwrap();
        assert_eq!(session.income(), before);
    }
    assert_eq!(db.get_user("alice").unwrap().unwrap().income, dec!(1000.10));
}

#[test]
fn test_add_income_overflow_rejected() {
    let (db, mut session) = open_with("alice", Decimal::MAX);
    assert!(matches!(
        session.add_income(&db, dec!(1)),
        Err(LedgerError::Validation(_))
    ));
    assert_eq!(session.income(), Decimal::MAX);
}

// ── End to end ────────────────────────────────────────────────

#[test]
fn test_alice_scenario() {
    let mut db = Database::open_in_memory().unwrap();
    create_account(&db, "alice", "Abcdef1@", dec!(1000)).unwrap();
    let mut session = authenticate(&db, "alice", "Abcdef1@").unwrap();

    session.log_transaction(&mut db, dec!(200), "FOOD").unwrap();
    assert_eq!(session.income(), dec!(800));
    assert_eq!(session.history().len(), 1);

    assert!(matches!(
        session.log_transaction(&mut db, dec!(900), "RENT"),
        Err(LedgerError::InsufficientFunds { .. })
    ));
    assert_eq!(session.income(), dec!(800));
    assert_eq!(session.history().len(), 1);

    assert!(matches!(
        authenticate(&db, "alice", "Abcdef1#"),
        Err(LedgerError::Auth)
    ));
}
