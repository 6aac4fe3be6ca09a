//! Two-phase recast commit
//!
//! Phase one records the recast event; only when that succeeds is the
//! loan's persisted rate/term/payment patched. The recast wizard is
//! dismissed before either call starts, so the outcome reaches the host
//! on the same progress channel origination uses.

use chrono::{Datelike, NaiveDate};
use log::info;

use super::progress::{ProgressEvent, ProgressSender};
use super::stores::{LoanPatch, LoanStore, RecastRequest};
use crate::amort::RecastCandidate;
use crate::draft::{Loan, LoanType, RecastMetadata};
use crate::error::EngineError;

/// Payments per year for a monthly schedule
const MONTHLY_FREQUENCY: u32 = 12;

/// Commit a chosen recast candidate against a persisted loan
///
/// A phase-one failure is terminal: the loan is never patched and a
/// `Failed` event is emitted. On success the patched loan is returned
/// for the caller-owned collection.
pub async fn commit_recast<L: LoanStore>(
    loans: &L,
    loan: &Loan,
    candidate: &RecastCandidate,
    recast_date: NaiveDate,
    outstanding_balance: f64,
    progress: &ProgressSender,
) -> Result<Loan, EngineError> {
    progress.send(ProgressEvent::started("Recasting loan"));

    let request = RecastRequest {
        date: recast_date,
        loan_type: LoanType::AmortizedDueDate,
        payment: candidate.payment,
        balance: outstanding_balance,
        term_months: candidate.term_months,
        frequency: MONTHLY_FREQUENCY,
        rate: candidate.rate,
        day_of_month: recast_date.day(),
    };

    if let Err(err) = loans.recast(&loan.id, &request).await {
        progress.send(ProgressEvent::failed(format!("Recast failed: {}", err)));
        return Err(EngineError::persistence(err));
    }
    progress.send(ProgressEvent::substep("Recast event recorded"));

    let patch = LoanPatch {
        rate: Some(candidate.rate),
        term_months: Some(candidate.term_months),
        monthly_payment: Some(candidate.payment),
        recast: Some(RecastMetadata {
            date: recast_date,
            rate: candidate.rate,
            term_months: candidate.term_months,
            payment: candidate.payment,
        }),
        payment_ids: None,
    };

    match loans.patch(&loan.id, &patch).await {
        Ok(updated) => {
            info!(
                "loan {} recast to {}% over {} months",
                updated.id, candidate.rate, candidate.term_months
            );
            progress.send(ProgressEvent::finished("Loan recast"));
            Ok(updated)
        }
        Err(err) => {
            progress.send(ProgressEvent::failed(format!("Recast patch failed: {}", err)));
            Err(EngineError::persistence(err))
        }
    }
}
