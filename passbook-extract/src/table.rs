//! Table-structured extraction.
//!
//! PDF text keeps the page's visual geometry as whitespace, so tables are
//! reconstructed from line geometry before rows are read. Detection runs
//! as an ordered list of strategies, each a pure function of the page
//! text; on every page the first strategy whose table yields any
//! transactions short-circuits the rest. An empty result is never fatal,
//! only the signal to lean on the text-line fallback.

use serde::{Deserialize, Serialize};
use tracing::debug;

use passbook_core::Direction;

use crate::normalize::{parse_amount, parse_date, sanitize_description};
use crate::profile::BankProfile;
use crate::types::Candidate;

/// Semantic role of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Date,
    Description,
    Debit,
    Credit,
    Balance,
}

/// A reconstructed table: rows of trimmed cell strings. Empty cells are
/// preserved so positional column mapping stays honest.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

type Strategy = fn(&str) -> Option<Table>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("aligned-columns", detect_aligned_columns),
    ("ruled-rows", detect_ruled_rows),
    ("fixed-positions", detect_fixed_positions),
];

/// Run the strategy ladder over every page and collect transactions.
pub fn extract_from_pages(pages: &[String], profile: &BankProfile) -> Vec<Candidate> {
    let mut out = Vec::new();
    for (page_no, page) in pages.iter().enumerate() {
        for &(name, strategy) in STRATEGIES {
            let Some(table) = strategy(page) else {
                debug!(page = page_no + 1, strategy = name, "strategy found no table");
                continue;
            };
            let candidates = table_to_candidates(&table, profile);
            debug!(
                page = page_no + 1,
                strategy = name,
                rows = table.rows.len(),
                parsed = candidates.len(),
                "strategy attempted"
            );
            if !candidates.is_empty() {
                out.extend(candidates);
                break;
            }
        }
    }
    out
}

/// A line that reads like the transaction-table header row.
fn is_header_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("date") && (lower.contains("particular") || lower.contains("withdrawal"))
}

/// Text-alignment inference: fields are separated by runs of columns
/// that stay blank in every line of the table block.
fn detect_aligned_columns(page: &str) -> Option<Table> {
    let lines: Vec<&str> = page.lines().collect();
    let header = lines.iter().position(|l| is_header_line(l))?;
    let block: Vec<&str> = lines[header..]
        .iter()
        .take_while(|l| !l.trim().is_empty())
        .copied()
        .collect();
    if block.len() < 3 {
        return None;
    }
    let spans = shared_column_spans(&block);
    if spans.len() < 3 {
        return None;
    }
    let rows = block.iter().map(|line| slice_spans(line, &spans)).collect();
    Some(Table { rows })
}

fn shared_column_spans(lines: &[&str]) -> Vec<(usize, usize)> {
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let mut blank = vec![true; width];
    for line in lines {
        for (i, ch) in line.chars().enumerate() {
            if ch != ' ' {
                blank[i] = false;
            }
        }
    }

    let mut spans = Vec::new();
    let mut field_start: Option<usize> = None;
    let mut i = 0;
    while i < width {
        if blank[i] {
            let run_start = i;
            while i < width && blank[i] {
                i += 1;
            }
            // a single blank column is intra-field spacing, not a gap
            if i - run_start >= 2 {
                if let Some(start) = field_start.take() {
                    spans.push((start, run_start));
                }
            }
        } else {
            if field_start.is_none() {
                field_start = Some(i);
            }
            i += 1;
        }
    }
    if let Some(start) = field_start {
        spans.push((start, width));
    }
    spans
}

/// Ruling-line inference: rows whose cells are separated by `|`.
fn detect_ruled_rows(page: &str) -> Option<Table> {
    let rows: Vec<Vec<String>> = page
        .lines()
        .filter(|l| l.matches('|').count() >= 2)
        .map(|l| {
            l.trim()
                .trim_matches('|')
                .split('|')
                .map(|c| c.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|cells: &Vec<String>| cells.len() >= 3)
        .collect();
    if rows.len() < 2 {
        return None;
    }
    Some(Table { rows })
}

/// Explicit-position inference: slice every row at the character
/// positions where the header row's fields begin.
fn detect_fixed_positions(page: &str) -> Option<Table> {
    let lines: Vec<&str> = page.lines().collect();
    let header = lines.iter().position(|l| is_header_line(l))?;
    let starts = field_starts(lines[header]);
    if starts.len() < 3 {
        return None;
    }
    let spans: Vec<(usize, usize)> = starts
        .iter()
        .enumerate()
        .map(|(i, &s)| (s, starts.get(i + 1).copied().unwrap_or(usize::MAX)))
        .collect();
    let block: Vec<&str> = lines[header..]
        .iter()
        .take_while(|l| !l.trim().is_empty())
        .copied()
        .collect();
    let rows = block.iter().map(|line| slice_spans(line, &spans)).collect();
    Some(Table { rows })
}

/// Char index of each header field preceded by two or more spaces.
fn field_starts(header: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut gap = usize::MAX;
    for (i, ch) in header.chars().enumerate() {
        if ch == ' ' {
            gap = gap.saturating_add(1);
        } else {
            if gap >= 2 {
                starts.push(i);
            }
            gap = 0;
        }
    }
    starts
}

fn slice_spans(line: &str, spans: &[(usize, usize)]) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    spans
        .iter()
        .map(|&(start, end)| {
            if start >= chars.len() {
                String::new()
            } else {
                chars[start..end.min(chars.len())]
                    .iter()
                    .collect::<String>()
                    .trim()
                    .to_string()
            }
        })
        .collect()
}

/// Column indices for each semantic role.
#[derive(Debug, Clone, Default)]
struct ColumnMap {
    date: Option<usize>,
    description: Option<usize>,
    debit: Option<usize>,
    credit: Option<usize>,
    balance: Option<usize>,
}

impl ColumnMap {
    fn from_header(cells: &[String]) -> Self {
        let mut map = Self::default();
        for (i, cell) in cells.iter().enumerate() {
            let c = cell.to_lowercase();
            if c.contains("date") {
                map.date.get_or_insert(i);
            } else if c.contains("particular") || c.contains("description") {
                map.description.get_or_insert(i);
            } else if c.contains("withdrawal") || c.contains("debit") {
                map.debit.get_or_insert(i);
            } else if c.contains("deposit") || c.contains("credit") {
                map.credit.get_or_insert(i);
            } else if c.contains("balance") {
                map.balance.get_or_insert(i);
            }
        }
        map
    }

    fn from_columns(kinds: &[ColumnKind]) -> Self {
        let mut map = Self::default();
        for (i, kind) in kinds.iter().enumerate() {
            match kind {
                ColumnKind::Date => {
                    map.date.get_or_insert(i);
                }
                ColumnKind::Description => {
                    map.description.get_or_insert(i);
                }
                ColumnKind::Debit => {
                    map.debit.get_or_insert(i);
                }
                ColumnKind::Credit => {
                    map.credit.get_or_insert(i);
                }
                ColumnKind::Balance => {
                    map.balance.get_or_insert(i);
                }
            }
        }
        map
    }
}

fn is_header_row(row: &[String]) -> bool {
    let joined = row.join(" ").to_lowercase();
    joined.contains("date") && (joined.contains("particular") || joined.contains("withdrawal"))
}

/// Read a detected table into transaction candidates. Header lookup is
/// limited to the first few rows; without one, the profile's fixed
/// column layout applies to every row.
fn table_to_candidates(table: &Table, profile: &BankProfile) -> Vec<Candidate> {
    let header = table
        .rows
        .iter()
        .take(5)
        .position(|row| is_header_row(row));
    let (map, data_start) = match header {
        Some(idx) => (ColumnMap::from_header(&table.rows[idx]), idx + 1),
        None => (ColumnMap::from_columns(&profile.fixed_columns), 0),
    };

    let mut out = Vec::new();
    let mut skipped = 0usize;
    for row in &table.rows[data_start..] {
        match row_to_candidate(row, &map) {
            Some(c) => out.push(c),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, "table rows skipped");
    }
    out
}

fn row_to_candidate(row: &[String], map: &ColumnMap) -> Option<Candidate> {
    let joined = row.join(" ").to_lowercase();
    // balance carry-over rows and repeated headers are boilerplate
    if joined.contains("opening balance") || joined.contains("closing balance") {
        return None;
    }
    if is_header_row(row) {
        return None;
    }

    let cell =
        |idx: Option<usize>| idx.and_then(|i| row.get(i)).map(|s| s.as_str()).unwrap_or("");

    let date = parse_date(cell(map.date)).ok()?;
    let debit = parse_amount(cell(map.debit)).ok();
    let credit = parse_amount(cell(map.credit)).ok();
    let (amount, direction) = match (debit, credit) {
        (Some(d), _) if d.value > 0.0 => (d.value, Direction::Expense),
        (_, Some(c)) if c.value > 0.0 => {
            // bracket notation marks a debit even in the credit column
            let direction = if c.bracketed {
                Direction::Expense
            } else {
                Direction::Income
            };
            (c.value, direction)
        }
        _ => return None,
    };
    let balance_after = parse_amount(cell(map.balance)).ok().map(|a| a.value);
    let description = sanitize_description(cell(map.description));

    Some(Candidate {
        date,
        description,
        amount,
        direction,
        balance_after,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_salary_row_maps_to_income() {
        let table = Table {
            rows: vec![
                row(&["Date", "Particulars", "Debit (₹)", "Credit (₹)", "Balance (₹)"]),
                row(&[
                    "05/01/2024",
                    "Salary Credit - ABC Corporation",
                    "",
                    "75,000.00",
                    "1,25,000.00",
                ]),
            ],
        };
        let out = table_to_candidates(&table, &BankProfile::default());
        assert_eq!(out.len(), 1);
        let c = &out[0];
        assert_eq!(c.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(c.description, "Salary Credit - ABC Corporation");
        assert_eq!(c.amount, 75_000.0);
        assert_eq!(c.direction, Direction::Income);
        assert_eq!(c.balance_after, Some(125_000.0));
    }

    #[test]
    fn test_withdrawal_deposit_header_variant() {
        let table = Table {
            rows: vec![
                row(&["Txn Date", "Description", "Withdrawal", "Deposit", "Balance"]),
                row(&["08/01/2024", "UPI-Swiggy Food Order", "450.00", "", "1,24,550.00"]),
            ],
        };
        let out = table_to_candidates(&table, &BankProfile::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].direction, Direction::Expense);
        assert_eq!(out[0].amount, 450.0);
        assert_eq!(out[0].description, "Swiggy Food Order");
    }

    #[test]
    fn test_headerless_table_uses_fixed_columns() {
        let table = Table {
            rows: vec![row(&[
                "10/01/2024",
                "NEFT Transfer - Rent Payment",
                "25,000.00",
                "",
                "99,550.00",
            ])],
        };
        let out = table_to_candidates(&table, &BankProfile::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].amount, 25_000.0);
        assert_eq!(out[0].direction, Direction::Expense);
    }

    #[test]
    fn test_boilerplate_and_dateless_rows_skipped() {
        let table = Table {
            rows: vec![
                row(&["Date", "Particulars", "Debit", "Credit", "Balance"]),
                row(&["01/01/2024", "Opening Balance", "", "", "50,000.00"]),
                row(&["", "carried forward", "", "", ""]),
                row(&["Date", "Particulars", "Debit", "Credit", "Balance"]),
                row(&["05/01/2024", "Grocery Store", "800.00", "", "49,200.00"]),
            ],
        };
        let out = table_to_candidates(&table, &BankProfile::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].description, "Grocery Store");
    }

    #[test]
    fn test_row_with_no_parseable_amount_skipped() {
        let table = Table {
            rows: vec![
                row(&["Date", "Particulars", "Debit", "Credit", "Balance"]),
                row(&["05/01/2024", "Reversed entry", "", "", "49,200.00"]),
            ],
        };
        assert!(table_to_candidates(&table, &BankProfile::default()).is_empty());
    }

    #[test]
    fn test_bracketed_credit_cell_is_expense() {
        let table = Table {
            rows: vec![
                row(&["Date", "Particulars", "Withdrawal", "Credit", "Balance"]),
                row(&["05/01/2024", "Adjustment entry", "", "(123.45)", "49,076.55"]),
            ],
        };
        let out = table_to_candidates(&table, &BankProfile::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].amount, 123.45);
        assert_eq!(out[0].direction, Direction::Expense);
    }

    #[test]
    fn test_aligned_columns_preserves_empty_cells() {
        let page = "\
Date         Particulars                        Debit (Rs)      Credit (Rs)     Balance (Rs)
05/01/2024   Salary Credit - ABC Corporation                    75,000.00       1,25,000.00
08/01/2024   UPI-Swiggy Food Order              450.00                          1,24,550.00
";
        let table = detect_aligned_columns(page).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1][2], "");
        assert_eq!(table.rows[1][3], "75,000.00");
        assert_eq!(table.rows[2][2], "450.00");
    }

    #[test]
    fn test_ruled_rows() {
        let page = "\
| Date       | Particulars    | Debit  | Credit    | Balance   |
| 05/01/2024 | Refund - Myntra|        | 1,200.00  | 51,200.00 |
";
        let table = detect_ruled_rows(page).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][1], "Refund - Myntra");
    }

    #[test]
    fn test_strategy_ladder_yields_transactions() {
        let page = "\
Date         Particulars                        Debit (Rs)      Credit (Rs)     Balance (Rs)
08/01/2024   UPI-Swiggy Food Order              450.00                          1,24,550.00
20/01/2024   UPI-Zomato Food Delivery           650.00                          88,300.00
"
        .to_string();
        let out = extract_from_pages(&[page], &BankProfile::default());
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|c| c.direction == Direction::Expense));
    }

    #[test]
    fn test_page_without_table_yields_nothing() {
        let page = "Dear customer, your statement is attached.".to_string();
        assert!(extract_from_pages(&[page], &BankProfile::default()).is_empty());
    }
}
