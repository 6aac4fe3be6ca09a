//! Lifecycle progress channel for background persistence work
//!
//! The wizard is dismissed before any commit starts, so outcomes reach
//! the host only through these events. Discrete lifecycle values replace
//! the perception delays the flow would otherwise fake with timers.

use tokio::sync::mpsc;

/// One lifecycle event of an async persistence pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Pipeline started; `message` is the user-visible progress text
    Started { message: String },
    /// A named substep finished (e.g. one backfilled payment row)
    SubstepCompleted { message: String },
    /// Terminal success
    Finished { message: String },
    /// Terminal failure
    Failed { message: String },
}

impl ProgressEvent {
    pub fn started(message: impl Into<String>) -> Self {
        ProgressEvent::Started {
            message: message.into(),
        }
    }

    pub fn substep(message: impl Into<String>) -> Self {
        ProgressEvent::SubstepCompleted {
            message: message.into(),
        }
    }

    pub fn finished(message: impl Into<String>) -> Self {
        ProgressEvent::Finished {
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ProgressEvent::Failed {
            message: message.into(),
        }
    }

    /// Whether this event ends the pipeline
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Finished { .. } | ProgressEvent::Failed { .. })
    }
}

/// Sending half of the progress channel
///
/// Fire-and-forget: a dropped receiver never errors the pipeline.
#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressSender {
    pub fn send(&self, event: ProgressEvent) {
        let _ = self.tx.send(event);
    }
}

/// Create a progress channel pair
pub fn progress_channel() -> (ProgressSender, mpsc::UnboundedReceiver<ProgressEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSender { tx }, rx)
}
