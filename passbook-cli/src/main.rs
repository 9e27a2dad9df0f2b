use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use passbook_core::{Direction, ExtractionResult};
use passbook_extract::{extract_from_path, ExtractConfig};

#[derive(Parser, Debug)]
#[command(
    name = "passbook",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PASSBOOK_BUILD_SHA"), ")"),
    about = "Bank statement extraction engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract transactions from a statement PDF and print a report
    Extract {
        /// Path to the statement PDF
        file: PathBuf,

        /// Emit the full result as JSON instead of the report
        #[arg(long)]
        json: bool,

        /// Number of sample transactions printed (default: 10)
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract { file, json, limit } => {
            let result = extract_from_path(&file, &ExtractConfig::default());

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                if !result.success {
                    std::process::exit(1);
                }
                return Ok(());
            }

            if !result.success {
                bail!(
                    "extraction failed for {}: {}",
                    file.display(),
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            print_report(&result, limit);
        }
    }
    Ok(())
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Income => "income",
        Direction::Expense => "expense",
    }
}

fn print_report(result: &ExtractionResult, limit: usize) {
    let info = &result.bank_info;
    println!("Bank:           {}", info.bank_name.as_deref().unwrap_or("-"));
    println!("Account:        {}", info.account_number.as_deref().unwrap_or("-"));
    println!("Holder:         {}", info.customer_name.as_deref().unwrap_or("-"));
    if let Some(period) = info.statement_period {
        println!("Period:         {} to {}", period.start, period.end);
    }
    if let Some(opening) = info.opening_balance {
        println!("Opening:        {opening:.2}");
    }
    if let Some(closing) = info.closing_balance {
        println!("Closing:        {closing:.2}");
    }
    println!("File hash:      {}", result.file_hash);

    println!("\nTransactions: {}", result.transactions.len());
    for t in result.transactions.iter().take(limit) {
        println!(
            "  {}  {:<7}  {:>12.2}  {:<18}  {}",
            t.date,
            direction_label(t.direction),
            t.amount,
            t.category,
            t.description
        );
    }
    if result.transactions.len() > limit {
        println!("  ... and {} more", result.transactions.len() - limit);
    }

    // per-category totals, largest first
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
    for t in &result.transactions {
        let entry = totals.entry(t.category.as_str()).or_insert((0.0, 0));
        entry.0 += t.amount;
        entry.1 += 1;
    }
    let mut by_category: Vec<_> = totals.into_iter().collect();
    by_category.sort_by(|a, b| b.1 .0.total_cmp(&a.1 .0));

    println!("\nBy category:");
    for (category, (total, count)) in by_category {
        println!("  {category:<18}  {total:>12.2}  ({count})");
    }

    let income_count = result.transactions.iter().filter(|t| t.is_income()).count();
    let expense_count = result.transactions.len() - income_count;
    println!(
        "\nTotal income:   {:.2} ({income_count} transactions)",
        result.total_income()
    );
    println!(
        "Total expense:  {:.2} ({expense_count} transactions)",
        result.total_expense()
    );

    if let Some(check) = result.balance_check {
        println!("\nExpected change:  {:.2}", check.expected_delta);
        println!("Extracted change: {:.2}", check.actual_delta);
        if check.balanced() {
            println!("Statement reconciles.");
        } else {
            println!("Discrepancy:      {:.2}", check.discrepancy);
        }
    }
}
