use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    /// Argon2id PHC string; the raw password is never stored.
    pub password_hash: String,
    /// Remaining spendable balance. Spending lowers it, salary raises it.
    pub income: Decimal,
    pub created_at: String,
}

impl User {
    pub fn new(username: String, password_hash: String, income: Decimal) -> Self {
        Self {
            username,
            password_hash,
            income,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn can_afford(&self, amount: Decimal) -> bool {
        amount <= self.income
    }
}
