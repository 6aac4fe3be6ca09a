//! Wizard controller: navigation gating over the draft
//!
//! Owns the draft (via the reducer), the current step plan, and the
//! ephemeral validation errors. Commands for the host (like forcing the
//! borrower popup open) are returned from transitions instead of being
//! looked up in any ambient registry.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;

use super::planner::{plan, Step};
use super::validation::{borrower_guard_error, validate, FieldErrors};
use crate::draft::{apply, DraftAction, LoanDraft};
use crate::error::EngineError;

/// An imperative command the host must carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardCommand {
    /// Open the borrower-creation popup on the Terms step
    OpenBorrowerPopup,
}

/// Outcome of a navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Landed on the given step
    Moved(Step),
    /// Current step's errors block forward movement
    Blocked,
    /// Borrower guard intercepted the move and sent the flow back to Terms
    RedirectedToTerms,
}

/// Step-keyed validation errors, cleared on Back or successful forward
pub type ErrorMap = BTreeMap<Step, FieldErrors>;

/// The guided origination wizard
#[derive(Debug, Clone)]
pub struct Wizard {
    draft: LoanDraft,
    today: NaiveDate,
    steps: [Step; 5],
    index: usize,
    errors: ErrorMap,
}

impl Wizard {
    /// Start a fresh wizard for a new loan
    pub fn new(today: NaiveDate) -> Self {
        let draft = LoanDraft::new();
        let steps = plan(draft.start_date, today);
        Self {
            draft,
            today,
            steps,
            index: 0,
            errors: ErrorMap::new(),
        }
    }

    /// Start a wizard seeded from an existing loan (edit/recast)
    pub fn seeded(draft: LoanDraft, today: NaiveDate) -> Self {
        let steps = plan(draft.start_date, today);
        Self {
            draft,
            today,
            steps,
            index: 0,
            errors: ErrorMap::new(),
        }
    }

    pub fn draft(&self) -> &LoanDraft {
        &self.draft
    }

    pub fn current_step(&self) -> Step {
        self.steps[self.index]
    }

    pub fn steps(&self) -> &[Step; 5] {
        &self.steps
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn is_final_step(&self) -> bool {
        self.index == self.steps.len() - 1
    }

    /// Apply a draft action, re-planning the step sequence when the start
    /// date changes
    ///
    /// Re-planning keeps the user on the step they were viewing (by name
    /// when it survives, by position otherwise) and never touches fields
    /// entered on other steps.
    pub fn dispatch(&mut self, action: DraftAction) {
        let date_before = self.draft.start_date;
        apply(&mut self.draft, action);

        if self.draft.start_date != date_before {
            let current = self.current_step();
            self.steps = plan(self.draft.start_date, self.today);
            if let Some(pos) = self.steps.iter().position(|s| *s == current) {
                self.index = pos;
            } else {
                self.index = self.index.min(self.steps.len() - 1);
            }
            debug!(
                "re-planned steps after date change; now on {}",
                self.current_step().as_str()
            );
        }
    }

    fn terms_index(&self) -> usize {
        // Terms is always present in both plans
        self.steps
            .iter()
            .position(|s| *s == Step::Terms)
            .unwrap_or(1)
    }

    /// Redirect to Terms with a synthetic borrower error
    fn redirect_to_terms(&mut self) -> (Transition, Vec<WizardCommand>) {
        self.index = self.terms_index();
        self.errors.clear();
        self.errors.insert(Step::Terms, borrower_guard_error());
        (
            Transition::RedirectedToTerms,
            vec![WizardCommand::OpenBorrowerPopup],
        )
    }

    /// Attempt to move one step forward
    pub fn next(&mut self) -> (Transition, Vec<WizardCommand>) {
        self.go_to(self.index + 1)
    }

    /// Attempt to jump to an arbitrary step index
    ///
    /// The borrower guard fires on any target beyond Terms while the
    /// borrower is unresolved, regardless of where the user currently is.
    pub fn go_to(&mut self, target: usize) -> (Transition, Vec<WizardCommand>) {
        let target = target.min(self.steps.len() - 1);

        if target > self.terms_index() && self.draft.borrower_id.is_empty() {
            return self.redirect_to_terms();
        }

        if target <= self.index {
            // Backward jumps are never gated
            self.index = target;
            self.errors.clear();
            return (Transition::Moved(self.current_step()), Vec::new());
        }

        let step = self.current_step();
        let field_errors = validate(step, &self.draft);
        if !field_errors.is_empty() {
            let mut commands = Vec::new();
            if step == Step::Terms && field_errors.contains_key("borrower_id") {
                commands.push(WizardCommand::OpenBorrowerPopup);
            }
            self.errors.insert(step, field_errors);
            return (Transition::Blocked, commands);
        }

        self.errors.clear();
        self.index = target;
        (Transition::Moved(self.current_step()), Vec::new())
    }

    /// Move one step back; always allowed, clears errors
    pub fn back(&mut self) -> Option<Step> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.errors.clear();
        Some(self.current_step())
    }

    /// Consume the wizard, yielding the draft for the orchestrator
    ///
    /// Re-checks the cross-step invariants so a draft that skipped
    /// validation can never reach a store.
    pub fn finish(self) -> Result<LoanDraft, EngineError> {
        let terms_errors = validate(Step::Terms, &self.draft);
        if let Some((field, message)) = terms_errors.into_iter().next() {
            return Err(EngineError::Validation {
                step: Step::Terms.as_str().to_string(),
                field: field.to_string(),
                message,
            });
        }
        if self.draft.vault_id.is_empty() {
            return Err(EngineError::Validation {
                step: Step::Funding.as_str().to_string(),
                field: "vault_id".to_string(),
                message: "Choose a funding vault".to_string(),
            });
        }
        Ok(self.draft)
    }
}
