use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};

use crate::error::{LedgerError, LedgerResult};

/// Symbols that satisfy the "special character" rule of the password policy.
pub(crate) const PASSWORD_SYMBOLS: &[char] = &['@', '#', '$', '%', '^', '&', '+', '='];

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

/// Check a new password against the complexity policy: at least
/// `MIN_PASSWORD_LEN` characters with a lowercase letter, an uppercase
/// letter, a digit and one of `PASSWORD_SYMBOLS`.
///
/// Returns the list of unmet rules so the user can fix all of them at once.
pub(crate) fn policy_violations(password: &str) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        missing.push("at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        missing.push("a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        missing.push("an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("a digit");
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(&c)) {
        missing.push("one of @ # $ % ^ & + =");
    }
    missing
}

pub(crate) fn validate_password(password: &str) -> LedgerResult<()> {
    let missing = policy_violations(password);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LedgerError::validation(format!(
            "Invalid password format: needs {}",
            missing.join(", ")
        )))
    }
}

/// Hash a password with Argon2id and a fresh random salt (PHC string).
pub(crate) fn hash_password(password: &str) -> LedgerResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| LedgerError::Credential(e.to_string()))
}

/// `Ok(false)` on a wrong password; a malformed stored hash is corruption.
pub(crate) fn verify_password(password: &str, stored_hash: &str) -> LedgerResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|_| LedgerError::corruption("stored password hash is malformed"))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(LedgerError::Credential(e.to_string())),
    }
}
