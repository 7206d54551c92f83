use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the ledger, report and store layers.
///
/// Every variant except `Store` and `Credential` is an expected outcome of a
/// user action: the operation is abandoned, state is left untouched and the
/// message is shown to the user.
#[derive(Debug, Error)]
pub(crate) enum LedgerError {
    #[error("{0}")]
    Validation(String),

    #[error("Username '{0}' already exists")]
    DuplicateUser(String),

    #[error("Invalid username or password")]
    Auth,

    #[error("Insufficient funds: balance {available}, requested {requested}")]
    InsufficientFunds {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Corrupt stored data: {0}")]
    DataCorruption(String),

    #[error("Password hashing failed: {0}")]
    Credential(String),

    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl LedgerError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn corruption(message: impl Into<String>) -> Self {
        Self::DataCorruption(message.into())
    }

    /// Whether this error stems from the store or hashing backend rather
    /// than from invalid user input.
    pub(crate) fn is_internal(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Credential(_))
    }
}

pub(crate) type LedgerResult<T> = std::result::Result<T, LedgerError>;
