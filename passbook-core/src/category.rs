//! Deterministic keyword categorizer for extracted transactions.
//!
//! Keyword rules are plain data held in [`CategoryRules`] and passed into
//! the engine, so tests can substitute taxonomies. Rules are checked in
//! declaration order and the first match wins; several categories share
//! keywords (e.g. "investment"), so the order is part of the contract.

use serde::{Deserialize, Serialize};

use crate::transaction::Direction;

/// One category and the lowercase keywords that select it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn matches(&self, description_lower: &str) -> bool {
        self.keywords.iter().any(|k| description_lower.contains(k))
    }
}

/// Immutable taxonomy: income rules, expense rules, and the fallback
/// category for each direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules {
    pub income: Vec<CategoryRule>,
    pub expense: Vec<CategoryRule>,
    pub income_fallback: String,
    pub expense_fallback: String,
}

impl Default for CategoryRules {
    /// Indian-market taxonomy in fixed priority order.
    fn default() -> Self {
        Self {
            income: vec![
                CategoryRule::new("Salary", &["salary", "payroll", "employer", "wage"]),
                CategoryRule::new(
                    "Investment",
                    &["dividend", "interest", "mutual fund", "return"],
                ),
                CategoryRule::new("Refund", &["refund", "cashback", "reversal"]),
                CategoryRule::new("Transfer", &["transfer", "neft", "imps", "rtgs", "upi"]),
            ],
            expense: vec![
                CategoryRule::new(
                    "Food & Groceries",
                    &[
                        "grocery",
                        "supermarket",
                        "food",
                        "swiggy",
                        "zomato",
                        "restaurant",
                        "cafe",
                        "blinkit",
                        "bigbasket",
                        "dmart",
                    ],
                ),
                CategoryRule::new(
                    "Transportation",
                    &[
                        "uber", "ola", "rapido", "petrol", "fuel", "parking", "metro", "bus",
                        "taxi", "fastag",
                    ],
                ),
                CategoryRule::new(
                    "Shopping",
                    &[
                        "amazon", "flipkart", "myntra", "ajio", "meesho", "mall", "store",
                        "shopping",
                    ],
                ),
                CategoryRule::new(
                    "Bills",
                    &[
                        "electricity",
                        "water",
                        "gas",
                        "internet",
                        "broadband",
                        "mobile",
                        "phone",
                        "recharge",
                        "utility",
                        "bill",
                    ],
                ),
                CategoryRule::new(
                    "Entertainment",
                    &[
                        "netflix",
                        "prime",
                        "hotstar",
                        "spotify",
                        "movie",
                        "bookmyshow",
                        "game",
                        "entertainment",
                    ],
                ),
                CategoryRule::new(
                    "Healthcare",
                    &[
                        "pharmacy", "medical", "doctor", "hospital", "health", "clinic",
                        "apollo", "medplus",
                    ],
                ),
                CategoryRule::new("Insurance", &["insurance", "premium", "lic", "policy"]),
                CategoryRule::new("EMI", &["emi", "loan", "repayment"]),
                CategoryRule::new(
                    "Investment",
                    &["mutual fund", "sip", "stock", "investment", "zerodha", "groww"],
                ),
            ],
            income_fallback: "Other Income".to_string(),
            expense_fallback: "Other".to_string(),
        }
    }
}

impl CategoryRules {
    /// Pick the category for a description. First matching rule in
    /// priority order wins; no match falls back per direction.
    pub fn categorize(&self, description: &str, direction: Direction) -> &str {
        let desc = description.to_lowercase();
        let (rules, fallback) = match direction {
            Direction::Income => (&self.income, &self.income_fallback),
            Direction::Expense => (&self.expense, &self.expense_fallback),
        };
        rules
            .iter()
            .find(|r| r.matches(&desc))
            .map(|r| r.name.as_str())
            .unwrap_or(fallback)
    }
}
