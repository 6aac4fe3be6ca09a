//! Borrower autocomplete and inline-create coordinator
//!
//! Gates progress past the Terms step. The subflow owns its text/match
//! state and the creation popup; the async create call goes through the
//! borrower store, with lifecycle events reported on the progress channel.

use log::{debug, info};

use crate::draft::{Borrower, NewBorrower};
use crate::error::EngineError;
use crate::orchestrate::{BorrowerStore, ProgressEvent, ProgressSender};

/// Tri-state visual indicator next to the borrower field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indicator {
    #[default]
    Off,
    On,
    Filled,
}

/// A follow-up the host must perform after a successful inline create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveCommand {
    /// Re-fetch the borrower list from the system of record; the local
    /// list was already updated for responsiveness
    RefreshBorrowers,
    /// Advance the wizard past Terms once the success state was shown
    AdvanceStep,
}

/// Borrower-resolution state machine
#[derive(Debug, Clone, Default)]
pub struct BorrowerSubflow {
    text: String,
    borrowers: Vec<Borrower>,
    selected: Option<String>,
    indicator: Indicator,
    popup_open: bool,
    creating: bool,
    creation_error: Option<String>,
}

impl BorrowerSubflow {
    pub fn new(borrowers: Vec<Borrower>) -> Self {
        Self {
            borrowers,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    pub fn popup_open(&self) -> bool {
        self.popup_open
    }

    pub fn creating(&self) -> bool {
        self.creating
    }

    pub fn creation_error(&self) -> Option<&str> {
        self.creation_error.as_deref()
    }

    pub fn borrowers(&self) -> &[Borrower] {
        &self.borrowers
    }

    /// Replace the known-borrower list after a store refresh
    pub fn set_borrowers(&mut self, borrowers: Vec<Borrower>) {
        self.borrowers = borrowers;
    }

    /// Case-insensitive substring matches over first + last name
    pub fn matches(&self) -> Vec<&Borrower> {
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.borrowers
            .iter()
            .filter(|b| b.full_name().to_lowercase().contains(&needle))
            .collect()
    }

    /// User typed in the field; editing after a selection clears it
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.selected.is_some() && text != self.text {
            debug!("borrower selection cleared by edit");
            self.selected = None;
            self.indicator = Indicator::Off;
        }
        self.text = text;
    }

    /// Field gained focus
    pub fn focus(&mut self) {
        if self.indicator == Indicator::Off {
            self.indicator = if self.selected.is_some() {
                Indicator::Filled
            } else {
                Indicator::On
            };
        }
    }

    /// Whether a controller may open the creation popup right now
    ///
    /// Eligible when the field holds text that matches nobody; opening is
    /// never automatic.
    pub fn eligible_for_popup(&self) -> bool {
        !self.text.trim().is_empty() && self.matches().is_empty() && self.selected.is_none()
    }

    /// Explicit open command from a controller (Terms guard or host)
    pub fn open_popup(&mut self) {
        self.popup_open = true;
        self.creation_error = None;
    }

    pub fn close_popup(&mut self) {
        if !self.creating {
            self.popup_open = false;
        }
    }

    /// Select an existing match by id; echoes the full name
    ///
    /// Returns false when the id is not in the known list.
    pub fn select(&mut self, borrower_id: &str) -> bool {
        let Some(found) = self.borrowers.iter().find(|b| b.id == borrower_id) else {
            return false;
        };
        let (name, id) = (found.full_name(), found.id.clone());
        self.text = name;
        self.selected = Some(id);
        self.indicator = Indicator::Filled;
        true
    }

    /// Submit the creation popup
    ///
    /// While the create is in flight the popup stays open and a progress
    /// signal is surfaced. On success the new borrower is inserted into
    /// the local list, auto-selected, and the popup closes; the returned
    /// commands tell the host to refresh from the system of record and to
    /// advance the wizard. On failure the popup stays open with the error
    /// and no advance is requested.
    pub async fn submit_creation<B: BorrowerStore>(
        &mut self,
        store: &B,
        bank_id: &str,
        fields: NewBorrower,
        progress: &ProgressSender,
    ) -> Result<Vec<ResolveCommand>, EngineError> {
        self.creating = true;
        self.creation_error = None;
        progress.send(ProgressEvent::started("Creating borrower"));

        let result = store.create(bank_id, &fields).await;
        self.creating = false;

        match result {
            Ok(borrower) => {
                info!("borrower {} created inline", borrower.id);
                self.text = borrower.full_name();
                self.selected = Some(borrower.id.clone());
                self.indicator = Indicator::Filled;
                self.borrowers.push(borrower);
                self.popup_open = false;
                progress.send(ProgressEvent::finished("Borrower created"));
                Ok(vec![ResolveCommand::RefreshBorrowers, ResolveCommand::AdvanceStep])
            }
            Err(err) => {
                let err = EngineError::resolution(err);
                self.creation_error = Some(err.to_string());
                progress.send(ProgressEvent::failed(err.to_string()));
                Err(err)
            }
        }
    }
}
