//! Error taxonomy for the origination engine

use thiserror::Error;

/// Errors surfaced by the origination and recast engine
///
/// Field-level validation failures never reach a store; resolution and
/// persistence failures are the terminal state of an async operation and
/// are reported through the progress channel, never by re-opening a
/// dismissed wizard.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A step field failed validation; blocks forward navigation only
    #[error("Validation failed on {step}: {field} — {message}")]
    Validation {
        step: String,
        field: String,
        message: String,
    },

    /// Borrower creation failed; the creation popup stays open
    #[error("Borrower resolution failed: {0}")]
    Resolution(String),

    /// A primary persistence call failed; remaining orchestration is aborted
    #[error("Persistence failed: {0}")]
    Persistence(String),
}

/// Error returned by a store implementation
///
/// Secondary failures (a single backfilled payment row, the onboarding
/// checkpoint) are tolerated at the orchestration layer: logged, counted,
/// and never converted into an `EngineError`.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl EngineError {
    /// Classify a store failure from the primary loan-creation call
    pub fn persistence(err: StoreError) -> Self {
        EngineError::Persistence(err.message)
    }

    /// Classify a store failure from the borrower-creation popup
    pub fn resolution(err: StoreError) -> Self {
        EngineError::Resolution(err.message)
    }
}
