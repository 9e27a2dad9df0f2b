//! Text-line fallback extraction.
//!
//! When a statement renders without usable table geometry, transactions
//! are reconstructed from raw lines by position: a leading date token,
//! then trailing decimal columns where the last number is the running
//! balance. This always runs as a cross-check next to the table path;
//! whichever yields more rows wins at reconciliation.

use anyhow::Result;
use regex::Regex;
use tracing::debug;

use passbook_core::Direction;

use crate::normalize::{parse_amount, parse_date, sanitize_description, DATE_TOKEN, DECIMAL_NUMBER};
use crate::profile::BankProfile;
use crate::types::Candidate;

/// Scan raw statement text and return every line that parses as a
/// transaction. Malformed lines are skipped, never an error.
pub fn extract_from_text(text: &str, profile: &BankProfile) -> Result<Vec<Candidate>> {
    let lead_re = Regex::new(&format!(r"^\s*({DATE_TOKEN})"))?;
    let num_re = Regex::new(DECIMAL_NUMBER)?;

    let lines: Vec<&str> = text.lines().collect();
    // Start after the column-header line when one exists; statements
    // without one are scanned whole.
    let start = lines
        .iter()
        .position(|l| is_block_header(l))
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut out = Vec::new();
    let mut skipped = 0usize;
    for line in &lines[start..] {
        let lower = line.to_lowercase();
        if profile.end_markers.iter().any(|m| lower.contains(m)) {
            break;
        }
        match parse_line(line, &lead_re, &num_re, profile) {
            Some(c) => out.push(c),
            None => {
                if !line.trim().is_empty() {
                    skipped += 1;
                }
            }
        }
    }
    debug!(parsed = out.len(), skipped, "text-line fallback scan");
    Ok(out)
}

fn is_block_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("date") && (lower.contains("particular") || lower.contains("balance"))
}

fn parse_line(
    line: &str,
    lead_re: &Regex,
    num_re: &Regex,
    profile: &BankProfile,
) -> Option<Candidate> {
    let caps = lead_re.captures(line)?;
    let date = parse_date(caps.get(1)?.as_str()).ok()?;
    let rest = &line[caps.get(0)?.end()..];

    // Last number is the running balance. A lone balance (carry-over
    // rows like "Opening Balance") is not a transaction. Of the numbers
    // left after dropping the balance, a single one is the amount; with
    // two or more (withdrawal and deposit both printed) the
    // second-to-last is taken.
    let nums: Vec<regex::Match> = num_re.find_iter(rest).collect();
    if nums.len() < 2 {
        return None;
    }
    let amount_idx = if nums.len() >= 3 { nums.len() - 3 } else { 0 };
    let amount = parse_amount(nums[amount_idx].as_str()).ok()?.value;
    if amount <= 0.0 {
        return None;
    }
    let balance_after = parse_amount(nums[nums.len() - 1].as_str()).ok().map(|a| a.value);

    let desc_raw = &rest[..nums[0].start()];
    let desc_lower = desc_raw.to_lowercase();
    // Ambiguous payment-rail transfers deliberately default to expense;
    // the balance cross-check depends on this bias staying put.
    let direction = if profile.credit_keywords.iter().any(|k| desc_lower.contains(k)) {
        Direction::Income
    } else {
        Direction::Expense
    };

    Some(Candidate {
        date,
        description: sanitize_description(desc_raw),
        amount,
        direction,
        balance_after,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn extract(text: &str) -> Vec<Candidate> {
        extract_from_text(text, &BankProfile::default()).unwrap()
    }

    #[test]
    fn test_expense_line() {
        let out = extract("08-01-2024 UPI-Swiggy Food Order 450.00 1,24,550.00");
        assert_eq!(out.len(), 1);
        let c = &out[0];
        assert_eq!(c.date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(c.amount, 450.0);
        assert_eq!(c.direction, Direction::Expense);
        assert_eq!(c.description, "Swiggy Food Order");
        assert_eq!(c.balance_after, Some(124_550.0));
    }

    #[test]
    fn test_credit_keyword_marks_income() {
        let out = extract("05/01/2024 Salary Credit - ABC Corporation 75,000.00 1,25,000.00");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].direction, Direction::Income);
        assert_eq!(out[0].amount, 75_000.0);
    }

    #[test]
    fn test_lines_without_leading_date_skipped() {
        let out = extract("ref 881200 UPI-Swiggy Food Order 450.00 1,24,550.00");
        assert!(out.is_empty());
    }

    #[test]
    fn test_lone_balance_is_not_a_transaction() {
        let out = extract("01/01/2024 Opening Balance 50,000.00");
        assert!(out.is_empty());
    }

    #[test]
    fn test_three_numbers_take_second_to_last_before_balance() {
        // withdrawal, deposit and balance columns all printed
        let out = extract("10/01/2024 NEFT Transfer - Rent Payment 25,000.00 0.00 99,550.00");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].amount, 25_000.0);
        assert_eq!(out[0].balance_after, Some(99_550.0));
    }

    #[test]
    fn test_block_bounds() {
        let text = "\
Account Holder: Test User 12/12/2023 99.00 100.00
Date        Particulars                 Amount      Balance
08/01/2024  UPI-Swiggy Food Order       450.00      1,24,550.00
This is a system generated statement.
09/01/2024  UPI-Zomato Food Delivery    650.00      1,23,900.00
";
        let out = extract(text);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].description, "Swiggy Food Order");
    }

    #[test]
    fn test_closing_balance_mid_block_is_data_not_terminator() {
        let text = "\
08/01/2024  UPI-Swiggy Food Order  450.00  1,24,550.00
15/01/2024  Closing Balance  1,24,550.00
20/01/2024  UPI-Zomato Food Delivery  650.00  1,23,900.00
";
        let out = extract(text);
        assert_eq!(out.len(), 2);
    }
}
