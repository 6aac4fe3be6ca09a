//! Loan Origination - origination and recast orchestration engine for private lending
//!
//! This library provides:
//! - Pure amortization and cash-flow math (monthly payment, DSCR bands)
//! - Date-driven step planning and per-step draft validation
//! - A reducer-owned loan draft with a guided wizard controller
//! - Borrower autocomplete with inline creation
//! - Background commit pipelines for origination and two-phase recasts

pub mod amort;
pub mod borrower;
pub mod draft;
pub mod error;
pub mod flow;
pub mod orchestrate;

// Re-export commonly used types
pub use draft::{Borrower, DraftAction, Loan, LoanDraft, LoanType};
pub use error::{EngineError, StoreError};
pub use flow::{Step, Wizard};
pub use orchestrate::{OriginationContext, OriginationOrchestrator, ProgressEvent};
