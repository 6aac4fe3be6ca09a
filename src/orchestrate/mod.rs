//! Background persistence orchestration for origination and recasts

mod origination;
mod progress;
mod recast;
mod stores;

pub use origination::{initial_status, OriginationContext, OriginationOrchestrator, OriginationOutcome};
pub use progress::{progress_channel, ProgressEvent, ProgressSender};
pub use recast::commit_recast;
pub use stores::{
    BorrowerStore, LoanFields, LoanPatch, LoanStore, OnboardingStore, PaymentStore, RecastRequest,
};
