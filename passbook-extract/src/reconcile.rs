//! Reconciliation: merge the two extraction paths into one result.

use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, warn};

use passbook_core::{
    BalanceCheck, CategoryRules, ExtractionResult, StatementMetadata, Transaction,
};

use crate::types::Candidate;

/// Pick the richer candidate sequence, deduplicate, categorize and
/// attach the balance diagnostic. Always succeeds; an empty transaction
/// list is a legitimate outcome.
pub fn reconcile(
    table: Vec<Candidate>,
    text: Vec<Candidate>,
    metadata: StatementMetadata,
    file_hash: String,
    rules: &CategoryRules,
) -> ExtractionResult {
    // Strictly more rows wins; ties prefer the table path, which reads
    // explicit columns instead of positional guesses.
    let table_rows = table.len();
    let text_rows = text.len();
    let (chosen, source) = if text_rows > table_rows {
        (text, "text-lines")
    } else {
        (table, "table")
    };
    debug!(source, table_rows, text_rows, "reconciliation choice");

    let transactions: Vec<Transaction> = dedup(chosen)
        .into_iter()
        .map(|c| c.into_transaction(rules))
        .collect();
    let balance_check = check_balance(&metadata, &transactions);

    ExtractionResult {
        bank_info: metadata,
        transactions,
        file_hash,
        success: true,
        error: None,
        balance_check,
    }
}

type DedupKey = (NaiveDate, String, String);

fn dedup_key(c: &Candidate) -> DedupKey {
    (
        c.date,
        format!("{:.2}", c.amount),
        c.description.chars().take(30).collect(),
    )
}

/// Drop exact duplicates on (date, amount, first 30 chars of the
/// description); first occurrence wins and order is preserved.
fn dedup(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen: HashSet<DedupKey> = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(dedup_key(c)))
        .collect()
}

/// Compare the statement's balance delta against the extracted totals.
/// Diagnostic only: a mismatch is logged, never an error.
fn check_balance(
    metadata: &StatementMetadata,
    transactions: &[Transaction],
) -> Option<BalanceCheck> {
    let (Some(opening), Some(closing)) = (metadata.opening_balance, metadata.closing_balance)
    else {
        return None;
    };
    let expected_delta = closing - opening;
    let actual_delta: f64 = transactions.iter().map(|t| t.signed_amount()).sum();
    let check = BalanceCheck {
        expected_delta,
        actual_delta,
        discrepancy: (expected_delta - actual_delta).abs(),
    };
    if !check.balanced() {
        warn!(
            expected = check.expected_delta,
            actual = check.actual_delta,
            discrepancy = check.discrepancy,
            "statement balance does not reconcile with extracted totals"
        );
    }
    Some(check)
}
