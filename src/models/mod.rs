mod transaction;
mod user;

pub use transaction::Transaction;
pub use user::User;

#[cfg(test)]
mod tests;
