//! Compute recast candidate grids for a book of loans
//!
//! Reads LoanID,Balance rows from a CSV, computes every grid candidate in
//! parallel, and writes one output row per candidate.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs::File;
use std::io::Write;

use loan_origination::amort::{grid_candidates, round_display, RecastCandidate};

#[derive(Debug, serde::Deserialize)]
struct BalanceRow {
    #[serde(rename = "LoanID")]
    loan_id: String,
    #[serde(rename = "Balance")]
    balance: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "balances.csv".to_string());
    let output = args.next().unwrap_or_else(|| "recast_candidates.csv".to_string());

    println!("Loading balances from {}...", input);
    let mut reader = csv::Reader::from_path(&input).with_context(|| format!("open {}", input))?;
    let rows: Vec<BalanceRow> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .context("parse balance rows")?;
    println!("Loaded {} loans", rows.len());

    // Grids are independent per loan
    let results: Vec<(String, Vec<RecastCandidate>)> = rows
        .par_iter()
        .map(|row| (row.loan_id.clone(), grid_candidates(row.balance)))
        .collect();

    let mut file = File::create(&output).with_context(|| format!("create {}", output))?;
    writeln!(file, "LoanID,Rate,TermMonths,Payment")?;
    for (loan_id, candidates) in &results {
        for c in candidates {
            writeln!(
                file,
                "{},{},{},{:.2}",
                loan_id,
                c.rate,
                c.term_months,
                round_display(c.payment)
            )?;
        }
    }

    println!("Wrote {} candidate rows to {}", results.len() * 36, output);
    Ok(())
}
