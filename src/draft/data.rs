//! Draft and persisted loan data structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Repayment structure of the loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanType {
    /// Fully amortizing with a fixed due date each period
    AmortizedDueDate,
    /// Interest-only payments, principal due at maturity
    InterestOnly,
    /// Revolving line with a minimum-payment floor
    Revolving,
}

impl LoanType {
    /// String form used in persisted loan records
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::AmortizedDueDate => "amortized_due_date",
            LoanType::InterestOnly => "interest_only",
            LoanType::Revolving => "revolving",
        }
    }
}

/// Tri-state answer to "has this loan already been funded?"
///
/// The Context step requires an explicit Yes or No; Unset means the
/// question has not been answered and blocks forward navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FundedFlag {
    #[default]
    Unset,
    Yes,
    No,
}

impl FundedFlag {
    pub fn is_set(&self) -> bool {
        !matches!(self, FundedFlag::Unset)
    }
}

/// Status of a backfilled payment row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Due,
    Late,
}

/// A payment row entered on the History step, not yet persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPayment {
    pub amount: f64,
    pub date: NaiveDate,
    pub status: PaymentStatus,
}

/// A known borrower from the system of record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrower {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Borrower {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields for a borrower about to be created inline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBorrower {
    pub first_name: String,
    pub last_name: String,
}

/// The single draft record accumulated across wizard steps
///
/// Created empty for a new loan or seeded from an existing loan for
/// edit/recast. Mutated only through the draft reducer, consumed exactly
/// once at Finish by the orchestrator, and discarded afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanDraft {
    pub nickname: String,
    pub comments: String,
    pub borrower_id: String,
    pub start_date: Option<NaiveDate>,
    pub initial_balance: f64,
    pub initial_number_of_payments: u32,
    /// Annual rate in percent (5.0 = 5%)
    pub initial_annual_rate: f64,
    pub loan_type: Option<LoanType>,
    pub vault_id: String,
    pub is_funded: FundedFlag,
    /// Backfill rows in user-entered chronological order
    pub pending_payments: Vec<PendingPayment>,
}

impl LoanDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a draft from an existing persisted loan (edit/recast entry)
    pub fn from_loan(loan: &Loan) -> Self {
        Self {
            nickname: loan.nickname.clone(),
            comments: loan.comments.clone(),
            borrower_id: loan.borrower_id.clone(),
            start_date: Some(loan.start_date),
            initial_balance: loan.initial_balance,
            initial_number_of_payments: loan.initial_number_of_payments,
            initial_annual_rate: loan.initial_annual_rate,
            loan_type: Some(loan.loan_type),
            vault_id: loan.vault_id.clone(),
            is_funded: match loan.status {
                LoanStatus::Funded => FundedFlag::Yes,
                LoanStatus::Funding => FundedFlag::No,
            },
            pending_payments: Vec::new(),
        }
    }

    /// Effective loan type, defaulting to amortized when not chosen yet
    pub fn loan_type_or_default(&self) -> LoanType {
        self.loan_type.unwrap_or(LoanType::AmortizedDueDate)
    }
}

/// Persisted loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Funded,
    Funding,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Funded => "Funded",
            LoanStatus::Funding => "Funding",
        }
    }
}

/// Recast metadata carried on a persisted loan after a recast commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecastMetadata {
    pub date: NaiveDate,
    pub rate: f64,
    pub term_months: u32,
    pub payment: f64,
}

/// A persisted loan as returned by the loan store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub nickname: String,
    pub comments: String,
    pub borrower_id: String,
    pub vault_id: String,
    pub status: LoanStatus,
    pub start_date: NaiveDate,
    pub initial_balance: f64,
    pub initial_number_of_payments: u32,
    pub initial_annual_rate: f64,
    pub loan_type: LoanType,
    pub monthly_payment: f64,
    /// Ids of persisted payments attached to this loan
    pub payment_ids: Vec<String>,
    pub recast: Option<RecastMetadata>,
}

/// A persisted payment row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub balloon: bool,
}

/// Fields for a payment about to be created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub amount: f64,
    pub date: NaiveDate,
    pub balloon: bool,
}

/// Guided-onboarding checkpoint for a bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnboardingState {
    AddVault,
    AddBorrower,
    AddLoan,
    Done,
}
