//! Recast candidate math: rate/term grid and manual entry
//!
//! Both variants apply the amortized-due-date formula to the loan's
//! current outstanding balance; nothing here is persisted until a recast
//! is committed.

use serde::{Deserialize, Serialize};

use super::payment::monthly_payment;
use crate::draft::LoanType;

/// Annual rates offered on the recast grid, in percent
pub const GRID_RATES: [f64; 6] = [5.0, 6.0, 7.0, 8.0, 9.0, 10.0];

/// Terms offered on the recast grid, in months
pub const GRID_TERMS: [u32; 6] = [12, 18, 24, 30, 36, 48];

/// A derived rate/term/payment combination for a recast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecastCandidate {
    /// Annual rate in percent
    pub rate: f64,
    pub term_months: u32,
    pub payment: f64,
}

impl RecastCandidate {
    fn over_balance(balance: f64, rate: f64, term_months: u32) -> Self {
        Self {
            rate,
            term_months,
            payment: monthly_payment(balance, rate, term_months, LoanType::AmortizedDueDate),
        }
    }
}

/// All grid candidates over the current outstanding balance, in
/// rate-major order
pub fn grid_candidates(outstanding_balance: f64) -> Vec<RecastCandidate> {
    let mut candidates = Vec::with_capacity(GRID_RATES.len() * GRID_TERMS.len());
    for &rate in &GRID_RATES {
        for &term in &GRID_TERMS {
            candidates.push(RecastCandidate::over_balance(outstanding_balance, rate, term));
        }
    }
    candidates
}

/// Manual-entry candidate for an arbitrary rate and term
///
/// Rate must lie in [0, 100] and the term must be positive; anything else
/// yields no candidate.
pub fn manual_candidate(
    outstanding_balance: f64,
    rate: f64,
    term_months: u32,
) -> Option<RecastCandidate> {
    if !rate.is_finite() || !(0.0..=100.0).contains(&rate) || term_months == 0 {
        return None;
    }
    Some(RecastCandidate::over_balance(
        outstanding_balance,
        rate,
        term_months,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_shape_and_order() {
        let grid = grid_candidates(10_000.0);
        assert_eq!(grid.len(), 36);
        assert_eq!(grid[0].rate, 5.0);
        assert_eq!(grid[0].term_months, 12);
        assert_eq!(grid[5].term_months, 48);
        assert_eq!(grid[6].rate, 6.0);
    }

    #[test]
    fn test_grid_cell_matches_manual_entry() {
        let grid = grid_candidates(10_000.0);
        let cell = &grid[0]; // 5% x 12 months
        let manual = manual_candidate(10_000.0, 5.0, 12).unwrap();
        assert_relative_eq!(cell.payment, manual.payment, max_relative = 1e-12);
        assert_relative_eq!(cell.payment, 856.07, max_relative = 1e-4);
    }

    #[test]
    fn test_manual_entry_bounds() {
        assert!(manual_candidate(10_000.0, -0.5, 12).is_none());
        assert!(manual_candidate(10_000.0, 100.5, 12).is_none());
        assert!(manual_candidate(10_000.0, 5.0, 0).is_none());
        assert!(manual_candidate(10_000.0, f64::NAN, 12).is_none());
        assert!(manual_candidate(10_000.0, 100.0, 12).is_some());
    }

    #[test]
    fn test_longer_term_lowers_payment() {
        let grid = grid_candidates(50_000.0);
        let at_12 = grid.iter().find(|c| c.rate == 7.0 && c.term_months == 12).unwrap();
        let at_48 = grid.iter().find(|c| c.rate == 7.0 && c.term_months == 48).unwrap();
        assert!(at_48.payment < at_12.payment);
    }
}
