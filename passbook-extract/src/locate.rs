//! Best-effort metadata location over the full statement text.
//!
//! Every field is detected independently; a miss on one field never
//! blocks the others, and a fully empty result is still a valid result.

use anyhow::Result;
use regex::Regex;
use tracing::debug;

use passbook_core::{StatementMetadata, StatementPeriod};

use crate::normalize::{parse_amount, parse_date, DATE_TOKEN, DECIMAL_NUMBER};
use crate::profile::BankProfile;

/// Scan the whole text for header metadata. First match wins per field.
pub fn locate_metadata(text: &str, profile: &BankProfile) -> StatementMetadata {
    let metadata = StatementMetadata {
        bank_name: find_bank_name(text, profile),
        account_number: find_account_number(text).unwrap_or(None),
        customer_name: find_customer_name(text).unwrap_or(None),
        statement_period: find_period(text).unwrap_or(None),
        opening_balance: find_labeled_balance(text, "opening").unwrap_or(None),
        closing_balance: find_labeled_balance(text, "closing").unwrap_or(None),
    };
    debug!(
        bank = metadata.bank_name.as_deref().unwrap_or("-"),
        account = metadata.account_number.as_deref().unwrap_or("-"),
        period = metadata.statement_period.is_some(),
        balances = metadata.opening_balance.is_some() && metadata.closing_balance.is_some(),
        "located statement metadata"
    );
    metadata
}

fn find_bank_name(text: &str, profile: &BankProfile) -> Option<String> {
    let lower = text.to_lowercase();
    profile
        .bank_names
        .iter()
        .find(|bank| lower.contains(&bank.to_lowercase()))
        .cloned()
}

/// Account numbers are stored masked to the last 4 digits whatever the
/// statement printed.
fn find_account_number(text: &str) -> Result<Option<String>> {
    // masked ("XXXX XXXX 1234"), labeled A/c, then plain long digit runs
    let patterns = [
        r"(?i)account\s*(?:number|no\.?)?\s*[:\-]?\s*[x*][x*\s]*(\d{4})",
        r"(?i)a/c\s*(?:no\.?)?\s*[:\-]?\s*[\d\s]*(\d{4})",
        r"(?i)account\s*(?:number|no\.?)?\s*[:\-]?\s*(\d{10,16})",
    ];
    for pattern in patterns {
        let re = Regex::new(pattern)?;
        if let Some(caps) = re.captures(text) {
            let digits = &caps[1];
            let last4 = &digits[digits.len().saturating_sub(4)..];
            return Ok(Some(format!("****{last4}")));
        }
    }
    Ok(None)
}

fn find_customer_name(text: &str) -> Result<Option<String>> {
    let re = Regex::new(r"(?im)^\s*(?:account\s+holder|customer\s+name)\s*[:\-]\s*(.{2,60}?)\s*$")?;
    Ok(re.captures(text).map(|caps| caps[1].trim().to_string()))
}

fn find_labeled_balance(text: &str, label: &str) -> Result<Option<f64>> {
    let re = Regex::new(&format!(r"(?i){label}\s+balance[^\d\n]*?({DECIMAL_NUMBER})"))?;
    let Some(caps) = re.captures(text) else {
        return Ok(None);
    };
    Ok(parse_amount(&caps[1]).ok().map(|a| a.value))
}

fn find_period(text: &str) -> Result<Option<StatementPeriod>> {
    let patterns = [
        format!(r"(?i)statement\s+period\s*[:\-]?\s*({DATE_TOKEN})\s+to\s+({DATE_TOKEN})"),
        format!(r"(?i)\bfrom\s*[:\-]?\s*({DATE_TOKEN})\s+to\s+({DATE_TOKEN})"),
        format!(r"(?i)\bbetween\s+({DATE_TOKEN})\s+and\s+({DATE_TOKEN})"),
    ];
    for pattern in &patterns {
        let re = Regex::new(pattern)?;
        if let Some(caps) = re.captures(text) {
            let (Ok(start), Ok(end)) = (parse_date(&caps[1]), parse_date(&caps[2])) else {
                continue;
            };
            return Ok(Some(StatementPeriod { start, end }));
        }
    }
    Ok(None)
}
