use chrono::NaiveDate;
use passbook_core::{CategoryRules, Direction, Transaction};

/// A transaction candidate produced by one of the extractors, before
/// reconciliation assigns its category.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub date: NaiveDate,
    pub description: String,
    /// Non-negative magnitude
    pub amount: f64,
    pub direction: Direction,
    pub balance_after: Option<f64>,
}

impl Candidate {
    /// Finalize into a [`Transaction`] by tagging the category.
    pub fn into_transaction(self, rules: &CategoryRules) -> Transaction {
        let category = rules.categorize(&self.description, self.direction).to_string();
        Transaction {
            date: self.date,
            description: self.description,
            amount: self.amount,
            direction: self.direction,
            category,
            balance_after: self.balance_after,
        }
    }
}
