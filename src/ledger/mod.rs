use rust_decimal::Decimal;

use crate::credentials;
use crate::db::Database;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Transaction, User};

/// An authenticated user's ledger: balance plus the append-only history.
///
/// A session is an explicit value handed to each operation; nothing about
/// the logged-in user lives in global state.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    user: User,
    history: Vec<Transaction>,
}

impl Session {
    pub(crate) fn username(&self) -> &str {
        &self.user.username
    }

    pub(crate) fn income(&self) -> Decimal {
        self.user.income
    }

    pub(crate) fn history(&self) -> &[Transaction] {
        &self.history
    }

    /// Whether `amount` could be logged right now: it must be positive and
    /// no larger than the current balance.
    pub(crate) fn check_spend(&self, amount: Decimal) -> LedgerResult<()> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::validation("Amount must be greater than zero"));
        }
        if !self.user.can_afford(amount) {
            tracing::warn!(
                user = %self.user.username,
                balance = %self.user.income,
                requested = %amount,
                "transaction rejected: insufficient funds"
            );
            return Err(LedgerError::InsufficientFunds {
                available: self.user.income,
                requested: amount,
            });
        }
        Ok(())
    }

    /// Record an expense dated now.
    pub(crate) fn log_transaction(
        &mut self,
        db: &mut Database,
        amount: Decimal,
        category: &str,
    ) -> LedgerResult<&Transaction> {
        self.log(db, Transaction::now(amount, category.to_string()))
    }

    /// Spend `txn.amount` from the balance. The store is written first, in a
    /// single transaction; the session only changes once that commit succeeds.
    pub(crate) fn log(&mut self, db: &mut Database, mut txn: Transaction) -> LedgerResult<&Transaction> {
        self.check_spend(txn.amount)?;

        let new_income = self.user.income - txn.amount;
        let id = db.record_transaction(&self.user.username, &txn, new_income)?;
        txn.id = Some(id);

        tracing::info!(
            user = %self.user.username,
            amount = %txn.amount,
            category = %txn.category,
            "transaction logged"
        );
        self.user.income = new_income;
        self.history.push(txn);
        Ok(&self.history[self.history.len() - 1])
    }

    /// Add `amount` to the balance. Negative amounts are accepted and lower it.
    pub(crate) fn add_income(&mut self, db: &Database, amount: Decimal) -> LedgerResult<Decimal> {
        let new_income = self
            .user
            .income
            .checked_add(amount)
            .ok_or_else(|| LedgerError::validation("Amount is out of range"))?;
        db.update_income(&self.user.username, new_income)?;
        tracing::info!(user = %self.user.username, %amount, income = %new_income, "income updated");
        self.user.income = new_income;
        Ok(new_income)
    }
}

/// Register a new user. The password must satisfy the complexity policy and
/// is stored only as a salted hash.
pub(crate) fn create_account(
    db: &Database,
    username: &str,
    password: &str,
    income: Decimal,
) -> LedgerResult<User> {
    let username = username.trim();
    if username.is_empty() {
        return Err(LedgerError::validation("Username cannot be empty"));
    }
    credentials::validate_password(password)?;

    let user = User::new(
        username.to_string(),
        credentials::hash_password(password)?,
        income,
    );
    db.insert_user(&user)?;
    tracing::info!(user = %user.username, "account created");
    Ok(user)
}

/// Verify credentials and load the user's ledger. Unknown users and wrong
/// passwords fail identically.
pub(crate) fn authenticate(db: &Database, username: &str, password: &str) -> LedgerResult<Session> {
    let Some(user) = db.get_user(username.trim())? else {
        tracing::warn!(user = %username, "login failed: unknown user");
        return Err(LedgerError::Auth);
    };
    if !credentials::verify_password(password, &user.password_hash)? {
        tracing::warn!(user = %user.username, "login failed: wrong password");
        return Err(LedgerError::Auth);
    }
    let history = load_history(db, &user.username)?;
    tracing::info!(user = %user.username, transactions = history.len(), "logged in");
    Ok(Session { user, history })
}

pub(crate) fn load_history(db: &Database, username: &str) -> LedgerResult<Vec<Transaction>> {
    db.get_transactions(username)
}

#[cfg(test)]
mod tests;
