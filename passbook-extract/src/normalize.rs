//! Locale-aware date and amount normalization.
//!
//! Every function here either produces a canonical value or a definitive
//! [`NormalizeError`] — never a best-effort guess. The extractors call
//! these inline and treat errors as "skip this row".

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use passbook_core::MAX_DESCRIPTION_LEN;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("unparseable date: {0:?}")]
    UnparseableDate(String),
    #[error("unparseable amount: {0:?}")]
    UnparseableAmount(String),
}

/// One date token in any accepted statement format:
/// `15/01/2024`, `15-01-24`, `15 Jan 2024`, `2024-01-15`.
pub const DATE_TOKEN: &str =
    r"\d{4}-\d{2}-\d{2}|\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{1,2}\s+[A-Za-z]{3,9}\s+\d{2,4}";

/// A decimal amount with optional thousands grouping (Indian or western)
/// and exactly two decimal digits: `450.00`, `75,000.00`, `1,24,550.00`.
pub const DECIMAL_NUMBER: &str = r"\b(?:\d{1,3}(?:,\d{2,3})+|\d+)\.\d{2}\b";

/// Four-digit-year formats tried first, then two-digit-year fallbacks.
/// `%Y` happily parses `"24"` as year 24, so short years get their own
/// pass guarded behind the >= 1000 check.
const FULL_YEAR_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d %b %Y", "%d %B %Y", "%Y-%m-%d"];
const SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d %b %y"];

/// Parse a date token using the day-first convention.
pub fn parse_date(token: &str) -> Result<NaiveDate, NormalizeError> {
    let t = token.trim();
    for fmt in FULL_YEAR_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(t, fmt) {
            if d.year() >= 1000 {
                return Ok(d);
            }
        }
    }
    for fmt in SHORT_YEAR_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(t, fmt) {
            return Ok(d);
        }
    }
    Err(NormalizeError::UnparseableDate(t.to_string()))
}

/// An amount reduced to a non-negative magnitude. `bracketed` records
/// the `(123.45)` debit notation for direction inference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedAmount {
    pub value: f64,
    pub bracketed: bool,
}

static CURRENCY_RE: OnceLock<Regex> = OnceLock::new();

fn currency_re() -> &'static Regex {
    CURRENCY_RE.get_or_init(|| {
        Regex::new(r"(?i)₹|rs\.?|inr|\b(?:cr|dr)\b").expect("static pattern compiles")
    })
}

/// Parse a numeric cell: strips currency markers (₹, Rs, INR, Cr/Dr),
/// grouping commas and bracket notation, then converts the remainder.
pub fn parse_amount(raw: &str) -> Result<ParsedAmount, NormalizeError> {
    let stripped = currency_re().replace_all(raw, "");
    let s = stripped.trim();
    let bracketed = s.starts_with('(') && s.ends_with(')');
    let digits: String = s
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | ',' | ' '))
        .collect();
    if digits.is_empty() {
        return Err(NormalizeError::UnparseableAmount(raw.to_string()));
    }
    match digits.parse::<f64>() {
        Ok(v) => Ok(ParsedAmount {
            value: v.abs(),
            bracketed,
        }),
        Err(_) => Err(NormalizeError::UnparseableAmount(raw.to_string())),
    }
}

/// Payment-rail prefixes stripped off descriptions.
const RAIL_PREFIXES: &[&str] = &["UPI", "NEFT", "IMPS", "RTGS", "POS", "ATM"];

fn strip_rail_prefix(token: &str) -> &str {
    for rail in RAIL_PREFIXES {
        let Some(prefix) = token.get(..rail.len()) else {
            continue;
        };
        if prefix.eq_ignore_ascii_case(rail)
            && token.len() > rail.len()
            && matches!(token.as_bytes()[rail.len()], b'-' | b'/' | b':')
        {
            return &token[rail.len() + 1..];
        }
    }
    token
}

/// Sanitize a transaction description: drop payment-rail boilerplate
/// (`UPI-`, `NEFT/`, bare leading rail tokens), drop `@handle` VPA
/// tokens, collapse whitespace and cap at [`MAX_DESCRIPTION_LEN`] chars.
pub fn sanitize_description(raw: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for token in raw.split_whitespace() {
        if token.contains('@') {
            continue;
        }
        let token = strip_rail_prefix(token);
        // a bare rail marker opening the description carries no meaning
        if kept.is_empty() && RAIL_PREFIXES.iter().any(|r| token.eq_ignore_ascii_case(r)) {
            continue;
        }
        if !token.is_empty() {
            kept.push(token);
        }
    }
    let joined = kept.join(" ");
    let trimmed = joined.trim_matches(|c: char| matches!(c, '-' | '/' | ':') || c.is_whitespace());
    let capped: String = trimmed.chars().take(MAX_DESCRIPTION_LEN).collect();
    if capped.trim().len() < 3 {
        "Transaction".to_string()
    } else {
        capped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_day_first() {
        let d = parse_date("05/01/2024").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        // day-first, not month-first
        let d = parse_date("08-01-2024").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(
            parse_date("15 Jan 2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            parse_date("15 January 2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_parse_date_two_digit_year() {
        assert_eq!(
            parse_date("15/01/24").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(matches!(
            parse_date("Particulars"),
            Err(NormalizeError::UnparseableDate(_))
        ));
        // invalid calendar date
        assert!(parse_date("31/02/2024").is_err());
    }

    #[test]
    fn test_parse_amount_indian_grouping() {
        let a = parse_amount("1,25,000.00").unwrap();
        assert_eq!(a.value, 125_000.0);
        assert!(!a.bracketed);
    }

    #[test]
    fn test_parse_amount_currency_markers() {
        assert_eq!(parse_amount("₹ 1,23,456.78").unwrap().value, 123_456.78);
        assert_eq!(parse_amount("Rs. 500.00").unwrap().value, 500.0);
        assert_eq!(parse_amount("INR 250.00").unwrap().value, 250.0);
        assert_eq!(parse_amount("123.45 Cr").unwrap().value, 123.45);
    }

    #[test]
    fn test_parse_amount_bracketed_debit() {
        let a = parse_amount("(123.45)").unwrap();
        assert_eq!(a.value, 123.45);
        assert!(a.bracketed);
    }

    #[test]
    fn test_parse_amount_rejects_empty_and_text() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("   ").is_err());
        assert!(parse_amount("n/a").is_err());
    }

    #[test]
    fn test_sanitize_strips_rail_prefixes() {
        assert_eq!(sanitize_description("UPI-Swiggy Food Order"), "Swiggy Food Order");
        assert_eq!(sanitize_description("NEFT Transfer - Rent Payment"), "Transfer - Rent Payment");
        assert_eq!(sanitize_description("UPI: merchant payment"), "merchant payment");
    }

    #[test]
    fn test_sanitize_drops_vpa_handles() {
        assert_eq!(
            sanitize_description("UPI/swiggy@ybl Food Order"),
            "Food Order"
        );
    }

    #[test]
    fn test_sanitize_keeps_plain_descriptions() {
        assert_eq!(
            sanitize_description("Salary Credit - ABC Corporation"),
            "Salary Credit - ABC Corporation"
        );
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "x".repeat(400);
        assert_eq!(sanitize_description(&long).chars().count(), MAX_DESCRIPTION_LEN);
    }

    #[test]
    fn test_sanitize_empty_becomes_placeholder() {
        assert_eq!(sanitize_description(""), "Transaction");
        assert_eq!(sanitize_description("UPI"), "Transaction");
    }

    #[test]
    fn test_decimal_number_pattern() {
        let re = Regex::new(DECIMAL_NUMBER).unwrap();
        let hits: Vec<&str> = re
            .find_iter("UPI-Swiggy Food Order 450.00 1,24,550.00")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(hits, vec!["450.00", "1,24,550.00"]);
    }

    #[test]
    fn test_decimal_number_requires_two_decimals() {
        let re = Regex::new(DECIMAL_NUMBER).unwrap();
        assert!(re.find("order no 12345").is_none());
        assert!(re.find("5000.00").is_some());
    }
}
