//! Single authoritative owner of the loan draft
//!
//! Every step of the wizard mutates the draft by dispatching a typed
//! action; nothing else writes to it. The step planner and the validator
//! are pure functions over the resulting state.

use chrono::NaiveDate;

use super::data::{FundedFlag, Loan, LoanDraft, LoanType, PendingPayment};

/// A typed mutation of the loan draft
#[derive(Debug, Clone, PartialEq)]
pub enum DraftAction {
    SetNickname(String),
    SetComments(String),
    SetBorrower(String),
    ClearBorrower,
    SetStartDate(Option<NaiveDate>),
    SetInitialBalance(f64),
    SetNumberOfPayments(u32),
    SetAnnualRate(f64),
    SetLoanType(LoanType),
    SetVault(String),
    SetFunded(FundedFlag),
    AddPendingPayment(PendingPayment),
    RemovePendingPayment(usize),
    ReplacePendingPayments(Vec<PendingPayment>),
    SeedFromLoan(Loan),
}

/// Apply one action to the draft
///
/// Changing the start date only changes the start date; fields entered on
/// other steps survive re-planning.
pub fn apply(draft: &mut LoanDraft, action: DraftAction) {
    match action {
        DraftAction::SetNickname(v) => draft.nickname = v,
        DraftAction::SetComments(v) => draft.comments = v,
        DraftAction::SetBorrower(id) => draft.borrower_id = id,
        DraftAction::ClearBorrower => draft.borrower_id.clear(),
        DraftAction::SetStartDate(d) => draft.start_date = d,
        DraftAction::SetInitialBalance(v) => draft.initial_balance = v,
        DraftAction::SetNumberOfPayments(n) => draft.initial_number_of_payments = n,
        DraftAction::SetAnnualRate(v) => draft.initial_annual_rate = v,
        DraftAction::SetLoanType(t) => draft.loan_type = Some(t),
        DraftAction::SetVault(id) => draft.vault_id = id,
        DraftAction::SetFunded(flag) => draft.is_funded = flag,
        DraftAction::AddPendingPayment(row) => draft.pending_payments.push(row),
        DraftAction::RemovePendingPayment(index) => {
            if index < draft.pending_payments.len() {
                draft.pending_payments.remove(index);
            }
        }
        DraftAction::ReplacePendingPayments(rows) => draft.pending_payments = rows,
        DraftAction::SeedFromLoan(loan) => *draft = LoanDraft::from_loan(&loan),
    }
}
