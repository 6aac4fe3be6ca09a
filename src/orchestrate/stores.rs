//! Collaborator store contracts
//!
//! Interfaces only; the wire shapes stay with the implementations. All
//! methods are async and non-blocking, and the orchestrator is generic
//! over these traits so test doubles dispatch statically.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::draft::{
    Borrower, Loan, LoanStatus, LoanType, NewBorrower, NewPayment, OnboardingState, Payment,
};
use crate::error::StoreError;

/// Fields submitted on loan creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanFields {
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
    /// Fresh v4 token so a retry layer can be added without double-commit
    pub idempotency_token: String,
}

/// Partial update of a persisted loan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanPatch {
    pub rate: Option<f64>,
    pub term_months: Option<u32>,
    pub monthly_payment: Option<f64>,
    pub recast: Option<crate::draft::RecastMetadata>,
    pub payment_ids: Option<Vec<String>>,
}

/// Recast event submitted before the loan patch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecastRequest {
    pub date: NaiveDate,
    pub loan_type: LoanType,
    pub payment: f64,
    pub balance: f64,
    pub term_months: u32,
    /// Payments per year
    pub frequency: u32,
    pub rate: f64,
    pub day_of_month: u32,
}

#[allow(async_fn_in_trait)]
pub trait BorrowerStore {
    async fn fetch_all(&self, bank_id: &str) -> Result<Vec<Borrower>, StoreError>;
    async fn create(&self, bank_id: &str, fields: &NewBorrower) -> Result<Borrower, StoreError>;
}

#[allow(async_fn_in_trait)]
pub trait LoanStore {
    async fn create(&self, bank_id: &str, fields: &LoanFields) -> Result<Loan, StoreError>;
    async fn patch(&self, loan_id: &str, fields: &LoanPatch) -> Result<Loan, StoreError>;
    async fn recast(&self, loan_id: &str, request: &RecastRequest) -> Result<(), StoreError>;
}

#[allow(async_fn_in_trait)]
pub trait PaymentStore {
    async fn create(&self, loan_id: &str, payment: &NewPayment) -> Result<Payment, StoreError>;
}

#[allow(async_fn_in_trait)]
pub trait OnboardingStore {
    async fn patch(&self, bank_id: &str, state: OnboardingState) -> Result<(), StoreError>;
}
