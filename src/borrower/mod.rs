//! Borrower resolution: autocomplete, inline create, Terms gating

mod subflow;

pub use subflow::{BorrowerSubflow, Indicator, ResolveCommand};
