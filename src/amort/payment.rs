//! Pure payment math: amortized payment, cash-flow rate, DSCR bands

use crate::draft::LoanType;

/// Minimum monthly payment on a revolving line
const REVOLVING_FLOOR: f64 = 25.0;

/// Revolving minimum-payment percentage of principal
const REVOLVING_PCT: f64 = 0.02;

/// Monthly payment for the given terms
///
/// `annual_rate_percent` is in percent (5.0 = 5%). Degenerate input
/// (non-positive or non-finite principal, rate, or payment count) returns
/// `0.0`; this function never panics and never returns NaN or infinity.
pub fn monthly_payment(
    principal: f64,
    annual_rate_percent: f64,
    number_of_payments: u32,
    loan_type: LoanType,
) -> f64 {
    if !principal.is_finite()
        || !annual_rate_percent.is_finite()
        || principal <= 0.0
        || annual_rate_percent <= 0.0
        || number_of_payments == 0
    {
        // Revolving minimums apply even at zero rate
        if loan_type == LoanType::Revolving && principal.is_finite() && principal > 0.0 {
            return revolving_minimum(principal);
        }
        return 0.0;
    }

    let r = annual_rate_percent / 100.0 / 12.0;

    let payment = match loan_type {
        LoanType::AmortizedDueDate => {
            let growth = (1.0 + r).powi(number_of_payments as i32);
            let denominator = growth - 1.0;
            if denominator <= 0.0 {
                return 0.0;
            }
            principal * (r * growth) / denominator
        }
        LoanType::InterestOnly => principal * r,
        LoanType::Revolving => revolving_minimum(principal),
    };

    if payment.is_finite() {
        payment
    } else {
        0.0
    }
}

fn revolving_minimum(principal: f64) -> f64 {
    (principal * REVOLVING_PCT).max(REVOLVING_FLOOR)
}

/// Monthly payment as a percentage of principal (liquidity-speed metric)
pub fn cash_flow_rate(monthly_payment: f64, principal: f64) -> f64 {
    if principal <= 0.0 || !principal.is_finite() || !monthly_payment.is_finite() {
        0.0
    } else {
        monthly_payment / principal * 100.0
    }
}

/// Three-band DSCR health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DscrClass {
    Bad,
    Mediocre,
    Good,
    /// Cash-vault-funded loans carry no DSCR
    NoDscr,
}

impl DscrClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DscrClass::Bad => "bad",
            DscrClass::Mediocre => "mediocre",
            DscrClass::Good => "good",
            DscrClass::NoDscr => "no-DSCR",
        }
    }
}

/// Classify a debt service coverage ratio
pub fn dscr_class(dscr: Option<f64>) -> DscrClass {
    match dscr {
        None => DscrClass::NoDscr,
        Some(v) if v < 1.0 => DscrClass::Bad,
        Some(v) if v < 1.25 => DscrClass::Mediocre,
        Some(_) => DscrClass::Good,
    }
}

/// Round to 2 decimals for display
///
/// Only applied at display boundaries; chained calculations stay at full
/// precision so recast iterations do not compound rounding error.
pub fn round_display(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
