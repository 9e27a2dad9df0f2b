//! Transaction types shared by the extraction engine and its consumers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum length of a sanitized transaction description.
pub const MAX_DESCRIPTION_LEN: usize = 100;

/// Whether money moved into or out of the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "expense")]
    Expense,
}

impl Direction {
    /// Signed multiplier for balance arithmetic (+1 income, -1 expense)
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Income => 1.0,
            Direction::Expense => -1.0,
        }
    }
}

/// A single transaction pulled out of a statement.
///
/// `amount` is always a non-negative magnitude; the sign lives in
/// `direction`. Storage identity (user, row id) is assigned downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction date (day-first formats resolved at parse time)
    pub date: NaiveDate,
    /// Sanitized description, at most [`MAX_DESCRIPTION_LEN`] chars
    pub description: String,
    /// Non-negative magnitude
    pub amount: f64,
    /// Income or expense
    #[serde(rename = "type")]
    pub direction: Direction,
    /// Category tag assigned by the keyword categorizer
    pub category: String,
    /// Running balance after this row, when the statement prints one
    #[serde(rename = "balance", skip_serializing_if = "Option::is_none")]
    pub balance_after: Option<f64>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.direction == Direction::Expense
    }

    pub fn is_income(&self) -> bool {
        self.direction == Direction::Income
    }

    /// Amount with the direction's sign applied
    pub fn signed_amount(&self) -> f64 {
        self.amount * self.direction.sign()
    }
}
