//! Load backfill payment history from CSV

use super::data::{PaymentStatus, PendingPayment};
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Raw CSV row for a payment-history import
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Status")]
    status: String,
}

impl CsvRow {
    fn to_pending_payment(self) -> Result<PendingPayment, Box<dyn Error>> {
        let status = match self.status.as_str() {
            "Paid" => PaymentStatus::Paid,
            "Due" => PaymentStatus::Due,
            "Late" => PaymentStatus::Late,
            other => return Err(format!("Unknown Status: {}", other).into()),
        };

        let date = chrono::NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| format!("Bad Date '{}': {}", self.date, e))?;

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(format!("Bad Amount: {}", self.amount).into());
        }

        Ok(PendingPayment {
            amount: self.amount,
            date,
            status,
        })
    }
}

/// Load payment-history rows from a CSV file, preserving row order
pub fn load_payment_history<P: AsRef<Path>>(path: P) -> Result<Vec<PendingPayment>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut rows = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        rows.push(row.to_pending_payment()?);
    }

    Ok(rows)
}

/// Load payment-history rows from any reader (e.g., string buffer)
pub fn load_payment_history_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<PendingPayment>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        rows.push(row.to_pending_payment()?);
    }

    Ok(rows)
}
