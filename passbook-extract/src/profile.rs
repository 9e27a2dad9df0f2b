//! Pluggable bank-format assumptions.
//!
//! The source statements this engine grew up on vary by issuer: different
//! column orders, credit markers and end-of-statement footers. Those
//! assumptions live here as plain data supplied to the pipeline, so a new
//! bank format is a new profile, not a code fork.

use serde::{Deserialize, Serialize};

use crate::table::ColumnKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankProfile {
    /// Bank names searched case-insensitively in the header text;
    /// first hit wins and is reported verbatim.
    pub bank_names: Vec<String>,
    /// Column roles assumed when a table carries no recognizable header.
    pub fixed_columns: Vec<ColumnKind>,
    /// Lowercase keywords marking a credit row in unlabeled text lines.
    pub credit_keywords: Vec<String>,
    /// A line containing any of these (lowercase) ends the transaction
    /// block in the text-line fallback.
    pub end_markers: Vec<String>,
}

impl Default for BankProfile {
    /// Generic Indian-bank profile.
    fn default() -> Self {
        Self {
            bank_names: [
                "State Bank of India",
                "SBI",
                "HDFC",
                "ICICI",
                "Axis Bank",
                "Punjab National Bank",
                "PNB",
                "Bank of Baroda",
                "Canara Bank",
                "Union Bank",
                "Bank of India",
                "Indian Bank",
                "Central Bank",
                "IndusInd Bank",
                "Yes Bank",
                "Kotak Mahindra",
                "IDBI",
                "UCO Bank",
                "Karnataka Bank",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            fixed_columns: vec![
                ColumnKind::Date,
                ColumnKind::Description,
                ColumnKind::Debit,
                ColumnKind::Credit,
                ColumnKind::Balance,
            ],
            credit_keywords: [
                "salary", "refund", "deposit", "interest", "reversal", "received", "credited",
                "cashback",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            end_markers: [
                "system generated",
                "computer generated",
                "computer-generated",
                "end of statement",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}
