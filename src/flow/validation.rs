//! Per-step field validation over the loan draft

use std::collections::BTreeMap;

use super::planner::Step;
use crate::draft::LoanDraft;

/// Field name to message, for one step
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Validate the fields a step requires
///
/// Purpose, Terms, Context, and Funding each gate specific fields;
/// History and Confirm have no required input. An empty map means the
/// step may be left in the forward direction.
pub fn validate(step: Step, draft: &LoanDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match step {
        Step::Purpose => {
            if draft.nickname.trim().is_empty() {
                errors.insert("nickname", "Give the loan a nickname".to_string());
            }
        }
        Step::Terms => {
            if draft.borrower_id.is_empty() {
                errors.insert("borrower_id", "Choose or create a borrower".to_string());
            }
            if draft.start_date.is_none() {
                errors.insert("start_date", "Pick a start date".to_string());
            }
            if !draft.initial_balance.is_finite() || draft.initial_balance <= 0.0 {
                errors.insert("initial_balance", "Balance must be greater than zero".to_string());
            }
            if draft.initial_number_of_payments == 0 {
                errors.insert(
                    "initial_number_of_payments",
                    "Number of payments must be a positive whole number".to_string(),
                );
            }
            if !draft.initial_annual_rate.is_finite() || draft.initial_annual_rate <= 0.0 {
                errors.insert("initial_annual_rate", "Rate must be greater than zero".to_string());
            }
        }
        Step::Context => {
            if !draft.is_funded.is_set() {
                errors.insert("is_funded", "Answer whether the loan is already funded".to_string());
            }
        }
        Step::Funding => {
            if draft.vault_id.is_empty() {
                errors.insert("vault_id", "Choose a funding vault".to_string());
            }
        }
        Step::History | Step::Confirm => {}
    }

    errors
}

/// The synthetic error raised when the borrower guard intercepts a
/// transition beyond Terms
pub fn borrower_guard_error() -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert("borrower_id", "Choose or create a borrower".to_string());
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{DraftAction, FundedFlag, LoanType};
    use chrono::NaiveDate;

    fn valid_terms_draft() -> LoanDraft {
        let mut draft = LoanDraft::new();
        for action in [
            DraftAction::SetNickname("Shop loan".into()),
            DraftAction::SetBorrower("b-1".into()),
            DraftAction::SetStartDate(Some(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap())),
            DraftAction::SetInitialBalance(10_000.0),
            DraftAction::SetNumberOfPayments(12),
            DraftAction::SetAnnualRate(5.0),
            DraftAction::SetLoanType(LoanType::AmortizedDueDate),
        ] {
            crate::draft::apply(&mut draft, action);
        }
        draft
    }

    #[test]
    fn test_purpose_requires_trimmed_nickname() {
        let mut draft = LoanDraft::new();
        crate::draft::apply(&mut draft, DraftAction::SetNickname("   ".into()));
        assert!(validate(Step::Purpose, &draft).contains_key("nickname"));

        crate::draft::apply(&mut draft, DraftAction::SetNickname("Duplex".into()));
        assert!(validate(Step::Purpose, &draft).is_empty());
    }

    #[test]
    fn test_terms_without_borrower_always_errors() {
        let mut draft = valid_terms_draft();
        crate::draft::apply(&mut draft, DraftAction::ClearBorrower);

        let errors = validate(Step::Terms, &draft);
        assert!(errors.contains_key("borrower_id"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_terms_numeric_fields() {
        let mut draft = valid_terms_draft();
        crate::draft::apply(&mut draft, DraftAction::SetInitialBalance(0.0));
        crate::draft::apply(&mut draft, DraftAction::SetNumberOfPayments(0));
        crate::draft::apply(&mut draft, DraftAction::SetAnnualRate(f64::NAN));

        let errors = validate(Step::Terms, &draft);
        assert!(errors.contains_key("initial_balance"));
        assert!(errors.contains_key("initial_number_of_payments"));
        assert!(errors.contains_key("initial_annual_rate"));
    }

    #[test]
    fn test_context_requires_explicit_answer() {
        let mut draft = valid_terms_draft();
        assert!(validate(Step::Context, &draft).contains_key("is_funded"));

        crate::draft::apply(&mut draft, DraftAction::SetFunded(FundedFlag::No));
        assert!(validate(Step::Context, &draft).is_empty());
    }

    #[test]
    fn test_funding_requires_vault() {
        let mut draft = valid_terms_draft();
        assert!(validate(Step::Funding, &draft).contains_key("vault_id"));

        crate::draft::apply(&mut draft, DraftAction::SetVault("v-1".into()));
        assert!(validate(Step::Funding, &draft).is_empty());
    }

    #[test]
    fn test_history_and_confirm_have_no_requirements() {
        let draft = LoanDraft::new();
        assert!(validate(Step::History, &draft).is_empty());
        assert!(validate(Step::Confirm, &draft).is_empty());
    }
}
