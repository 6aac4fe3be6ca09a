//! Pure financial math for payments and recasts

mod payment;
mod recast;

pub use payment::{cash_flow_rate, dscr_class, monthly_payment, round_display, DscrClass};
pub use recast::{grid_candidates, manual_candidate, RecastCandidate, GRID_RATES, GRID_TERMS};
