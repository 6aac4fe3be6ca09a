//! Loan draft data model, reducer, and history import

mod data;
mod reducer;
pub mod loader;

pub use data::{
    Borrower, FundedFlag, Loan, LoanDraft, LoanStatus, LoanType, NewBorrower, NewPayment,
    OnboardingState, Payment, PaymentStatus, PendingPayment, RecastMetadata,
};
pub use reducer::{apply, DraftAction};
