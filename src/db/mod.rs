mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};
use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::info!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn conn_for_tests(&self) -> &Connection {
        &self.conn
    }

    /// Flush and release the connection. Errors from SQLite on close are
    /// reported instead of being dropped silently.
    pub(crate) fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close database")?;
        tracing::info!("database closed");
        Ok(())
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            tracing::debug!(version = schema::CURRENT_VERSION, "creating fresh schema");
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            tracing::debug!(from = current, to = schema::CURRENT_VERSION, "schema upgraded");
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Users ─────────────────────────────────────────────────

    pub(crate) fn insert_user(&self, user: &User) -> LedgerResult<()> {
        let result = self.conn.execute(
            "INSERT INTO users (username, password_hash, income, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user.username,
                user.password_hash,
                user.income.to_string(),
                user.created_at,
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(LedgerError::DuplicateUser(user.username.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_user(&self, username: &str) -> LedgerResult<Option<User>> {
        let row = self
            .conn
            .query_row(
                "SELECT username, password_hash, income, created_at FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(username, password_hash, income, created_at)| {
            let income = parse_amount(&income)
                .ok_or_else(|| LedgerError::corruption(format!("user '{username}' has invalid income '{income}'")))?;
            Ok(User {
                username,
                password_hash,
                income,
                created_at,
            })
        })
        .transpose()
    }

    pub(crate) fn update_income(&self, username: &str, income: Decimal) -> LedgerResult<()> {
        let changed = self.conn.execute(
            "UPDATE users SET income = ?1 WHERE username = ?2",
            params![income.to_string(), username],
        )?;
        if changed == 0 {
            return Err(LedgerError::validation(format!("No account named '{username}'")));
        }
        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    /// Store a new expense and the user's reduced income as one atomic unit.
    /// Either both writes land or neither does.
    pub(crate) fn record_transaction(
        &mut self,
        username: &str,
        txn: &Transaction,
        new_income: Decimal,
    ) -> LedgerResult<i64> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE users SET income = ?1 WHERE username = ?2",
            params![new_income.to_string(), username],
        )?;
        if changed == 0 {
            return Err(LedgerError::validation(format!("No account named '{username}'")));
        }
        tx.execute(
            "INSERT INTO transactions (username, date, amount, category)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                username,
                txn.date_string(),
                txn.amount.to_string(),
                txn.category,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    /// All of a user's transactions in insertion order.
    pub(crate) fn get_transactions(&self, username: &str) -> LedgerResult<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, amount, category FROM transactions
             WHERE username = ?1
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![username], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut transactions = Vec::new();
        for row in rows {
            let (id, date, amount, category) = row?;
            transactions.push(Transaction::from_stored(id, &date, &amount, category)?);
        }
        Ok(transactions)
    }

    pub(crate) fn get_transaction_count(&self, username: &str) -> LedgerResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )?)
    }

    // ── Analytics ─────────────────────────────────────────────

    /// (category, amount) for every transaction dated in the given calendar
    /// month. Month matching uses SQLite's own date parsing of the stored text.
    pub(crate) fn get_month_amounts(
        &self,
        username: &str,
        year: i32,
        month: u32,
    ) -> LedgerResult<Vec<(String, Decimal)>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, amount FROM transactions
             WHERE username = ?1 AND strftime('%Y', date) = ?2 AND strftime('%m', date) = ?3
             ORDER BY id",
        )?;
        let rows = stmt.query_map(
            params![username, format!("{year:04}"), format!("{month:02}")],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;

        let mut amounts = Vec::new();
        for row in rows {
            let (category, amount) = row?;
            let amount = parse_amount(&amount).ok_or_else(|| {
                LedgerError::corruption(format!("transaction in '{category}' has invalid amount '{amount}'"))
            })?;
            amounts.push((category, amount));
        }
        Ok(amounts)
    }
}

fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(s.trim()).ok()
}
