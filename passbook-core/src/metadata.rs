//! Statement-level metadata and the extraction result envelope

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Inclusive date range a statement covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Header fields located on the statement. Every field is independently
/// optional; absence of one never blocks the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementMetadata {
    pub bank_name: Option<String>,
    /// Masked to the last 4 digits (`****1234`)
    pub account_number: Option<String>,
    pub customer_name: Option<String>,
    pub statement_period: Option<StatementPeriod>,
    pub opening_balance: Option<f64>,
    pub closing_balance: Option<f64>,
}

/// Diagnostic comparison of the statement's balance delta against the
/// extracted transaction totals. Never fails extraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceCheck {
    /// closing_balance - opening_balance
    pub expected_delta: f64,
    /// sum(income) - sum(expense)
    pub actual_delta: f64,
    /// |expected - actual|
    pub discrepancy: f64,
}

impl BalanceCheck {
    pub fn balanced(&self) -> bool {
        self.discrepancy < 1.0
    }
}

/// Final output of one extraction call.
///
/// `file_hash` is a function of the raw bytes only, so re-uploads of the
/// same file can be rejected without re-parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub bank_info: StatementMetadata,
    pub transactions: Vec<Transaction>,
    /// MD5 of the raw document bytes, lowercase hex
    pub file_hash: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_check: Option<BalanceCheck>,
}

impl ExtractionResult {
    /// Well-formed failure envelope. Transactions stay empty; the hash is
    /// kept when the bytes were readable so dedup still works upstream.
    pub fn failure(file_hash: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            bank_info: StatementMetadata::default(),
            transactions: Vec::new(),
            file_hash: file_hash.into(),
            success: false,
            error: Some(error.into()),
            balance_check: None,
        }
    }

    pub fn total_income(&self) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.is_income())
            .map(|t| t.amount)
            .sum()
    }

    pub fn total_expense(&self) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.amount)
            .sum()
    }
}
