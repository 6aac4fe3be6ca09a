//! Finish-time commit pipeline for a validated draft
//!
//! Takes ownership of the draft after the wizard is dismissed and turns
//! it into persisted entities in the background. The host never awaits
//! this before closing the wizard; once started it runs to completion or
//! terminal failure (no cancellation token).

use chrono::NaiveDate;
use log::{info, warn};
use uuid::Uuid;

use super::progress::{ProgressEvent, ProgressSender};
use super::stores::{LoanFields, LoanStore, OnboardingStore, PaymentStore};
use crate::amort::monthly_payment;
use crate::draft::{FundedFlag, Loan, LoanDraft, LoanStatus, NewPayment, OnboardingState};
use crate::error::EngineError;

/// Host-supplied context for one origination run
#[derive(Debug, Clone)]
pub struct OriginationContext {
    pub bank_id: String,
    pub today: NaiveDate,
    /// The bank's current guided-onboarding checkpoint, if any
    pub onboarding_state: Option<OnboardingState>,
}

/// Result of a completed origination
#[derive(Debug, Clone)]
pub struct OriginationOutcome {
    /// Finalized loan for the caller-owned collection
    pub loan: Loan,
    /// Backfill rows that failed and were skipped (candidates for manual
    /// re-entry by the host)
    pub skipped_payments: u32,
}

/// Initial status of the loan being created
///
/// A loan whose start date has already passed is Funded regardless of the
/// Context answer; otherwise the explicit answer decides.
pub fn initial_status(draft: &LoanDraft, today: NaiveDate) -> LoanStatus {
    match draft.start_date {
        Some(d) if d <= today => LoanStatus::Funded,
        _ if draft.is_funded == FundedFlag::Yes => LoanStatus::Funded,
        _ => LoanStatus::Funding,
    }
}

/// Sequences the side-effecting commit after the wizard is dismissed
pub struct OriginationOrchestrator<'a, L, P, O> {
    loans: &'a L,
    payments: &'a P,
    onboarding: &'a O,
    progress: ProgressSender,
}

impl<'a, L, P, O> OriginationOrchestrator<'a, L, P, O>
where
    L: LoanStore,
    P: PaymentStore,
    O: OnboardingStore,
{
    pub fn new(loans: &'a L, payments: &'a P, onboarding: &'a O, progress: ProgressSender) -> Self {
        Self {
            loans,
            payments,
            onboarding,
            progress,
        }
    }

    /// Run the full commit pipeline
    ///
    /// Failure of the loan-creation call aborts everything with a
    /// terminal failure; payment-row and onboarding failures are
    /// tolerated, logged, and never roll back earlier work.
    pub async fn originate(
        &self,
        ctx: &OriginationContext,
        draft: LoanDraft,
    ) -> Result<OriginationOutcome, EngineError> {
        self.progress.send(ProgressEvent::started("Creating loan"));

        let status = initial_status(&draft, ctx.today);
        let payment = monthly_payment(
            draft.initial_balance,
            draft.initial_annual_rate,
            draft.initial_number_of_payments,
            draft.loan_type_or_default(),
        );

        let start_date = draft.start_date.unwrap_or(ctx.today);
        let fields = LoanFields {
            nickname: draft.nickname.clone(),
            comments: draft.comments.clone(),
            borrower_id: draft.borrower_id.clone(),
            vault_id: draft.vault_id.clone(),
            status,
            start_date,
            initial_balance: draft.initial_balance,
            initial_number_of_payments: draft.initial_number_of_payments,
            initial_annual_rate: draft.initial_annual_rate,
            loan_type: draft.loan_type_or_default(),
            monthly_payment: payment,
            idempotency_token: Uuid::new_v4().to_string(),
        };

        let mut loan = match self.loans.create(&ctx.bank_id, &fields).await {
            Ok(loan) => loan,
            Err(err) => {
                self.progress
                    .send(ProgressEvent::failed(format!("Loan creation failed: {}", err)));
                return Err(EngineError::persistence(err));
            }
        };
        self.progress.send(ProgressEvent::substep("Loan created"));

        // Persisted shapes name the borrower/vault ids inconsistently
        // across store versions; the draft's values win
        if !draft.borrower_id.is_empty() {
            loan.borrower_id = draft.borrower_id.clone();
        }
        if !draft.vault_id.is_empty() {
            loan.vault_id = draft.vault_id.clone();
        }

        let skipped_payments = self.backfill_payments(&mut loan, &draft).await;

        if ctx.onboarding_state == Some(OnboardingState::AddLoan) {
            // Best-effort checkpoint advance; the loan is valid either way
            if let Err(err) = self.onboarding.patch(&ctx.bank_id, OnboardingState::Done).await {
                warn!("onboarding checkpoint advance failed: {}", err);
            }
        }

        info!(
            "loan {} originated ({} payments backfilled, {} skipped)",
            loan.id,
            loan.payment_ids.len(),
            skipped_payments
        );
        self.progress.send(ProgressEvent::finished("Loan created"));

        Ok(OriginationOutcome {
            loan,
            skipped_payments,
        })
    }

    /// Create backfill rows sequentially, in entry order
    ///
    /// One failing row is logged and skipped; it never rolls back the
    /// loan or rows already created.
    async fn backfill_payments(&self, loan: &mut Loan, draft: &LoanDraft) -> u32 {
        let mut skipped = 0;

        for (index, row) in draft.pending_payments.iter().enumerate() {
            let new_payment = NewPayment {
                amount: row.amount,
                date: row.date,
                balloon: false,
            };

            match self.payments.create(&loan.id, &new_payment).await {
                Ok(payment) => {
                    loan.payment_ids.push(payment.id);
                    self.progress.send(ProgressEvent::substep(format!(
                        "Recorded payment {} of {}",
                        index + 1,
                        draft.pending_payments.len()
                    )));
                }
                Err(err) => {
                    warn!(
                        "payment backfill row {} for loan {} failed: {}",
                        index, loan.id, err
                    );
                    skipped += 1;
                }
            }
        }

        skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{LoanType, Payment, PaymentStatus, PendingPayment};
    use crate::error::StoreError;
    use crate::orchestrate::progress_channel;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn funded_draft(start: NaiveDate) -> LoanDraft {
        LoanDraft {
            nickname: "Bridge".into(),
            comments: String::new(),
            borrower_id: "b-1".into(),
            start_date: Some(start),
            initial_balance: 10_000.0,
            initial_number_of_payments: 12,
            initial_annual_rate: 5.0,
            loan_type: Some(LoanType::AmortizedDueDate),
            vault_id: "v-1".into(),
            is_funded: FundedFlag::No,
            pending_payments: Vec::new(),
        }
    }

    #[derive(Default)]
    struct MockLoans {
        fail_create: bool,
        created: Mutex<Vec<LoanFields>>,
    }

    impl LoanStore for MockLoans {
        async fn create(&self, _bank_id: &str, fields: &LoanFields) -> Result<Loan, StoreError> {
            if self.fail_create {
                return Err(StoreError::new("loan store down"));
            }
            self.created.lock().unwrap().push(fields.clone());
            Ok(Loan {
                id: "loan-1".into(),
                nickname: fields.nickname.clone(),
                comments: fields.comments.clone(),
                // Store echoes a legacy empty borrower field
                borrower_id: String::new(),
                vault_id: fields.vault_id.clone(),
                status: fields.status,
                start_date: fields.start_date,
                initial_balance: fields.initial_balance,
                initial_number_of_payments: fields.initial_number_of_payments,
                initial_annual_rate: fields.initial_annual_rate,
                loan_type: fields.loan_type,
                monthly_payment: fields.monthly_payment,
                payment_ids: Vec::new(),
                recast: None,
            })
        }

        async fn patch(
            &self,
            _loan_id: &str,
            _fields: &crate::orchestrate::LoanPatch,
        ) -> Result<Loan, StoreError> {
            unreachable!("origination never patches")
        }

        async fn recast(
            &self,
            _loan_id: &str,
            _request: &crate::orchestrate::RecastRequest,
        ) -> Result<(), StoreError> {
            unreachable!("origination never recasts")
        }
    }

    struct MockPayments {
        /// 0-based indices of create calls that should fail
        fail_at: Vec<usize>,
        calls: Mutex<Vec<NewPayment>>,
    }

    impl MockPayments {
        fn new(fail_at: Vec<usize>) -> Self {
            Self {
                fail_at,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl PaymentStore for MockPayments {
        async fn create(&self, _loan_id: &str, payment: &NewPayment) -> Result<Payment, StoreError> {
            let mut calls = self.calls.lock().unwrap();
            let index = calls.len();
            calls.push(payment.clone());
            if self.fail_at.contains(&index) {
                return Err(StoreError::new("row rejected"));
            }
            Ok(Payment {
                id: format!("p-{}", index),
                amount: payment.amount,
                date: payment.date,
                balloon: payment.balloon,
            })
        }
    }

    #[derive(Default)]
    struct MockOnboarding {
        fail: bool,
        patches: Mutex<Vec<OnboardingState>>,
    }

    impl OnboardingStore for MockOnboarding {
        async fn patch(&self, _bank_id: &str, state: OnboardingState) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::new("onboarding store down"));
            }
            self.patches.lock().unwrap().push(state);
            Ok(())
        }
    }

    fn ctx(today: NaiveDate) -> OriginationContext {
        OriginationContext {
            bank_id: "bank-1".into(),
            today,
            onboarding_state: None,
        }
    }

    #[test]
    fn test_initial_status() {
        let today = date(2026, 8, 30);

        // Past or present start date: funded no matter the flag
        let mut draft = funded_draft(date(2026, 8, 30));
        assert_eq!(initial_status(&draft, today), LoanStatus::Funded);

        // Future start, explicit yes
        draft.start_date = Some(date(2026, 12, 1));
        draft.is_funded = FundedFlag::Yes;
        assert_eq!(initial_status(&draft, today), LoanStatus::Funded);

        // Future start, no or unset
        draft.is_funded = FundedFlag::No;
        assert_eq!(initial_status(&draft, today), LoanStatus::Funding);
        draft.is_funded = FundedFlag::Unset;
        assert_eq!(initial_status(&draft, today), LoanStatus::Funding);
    }

    #[tokio::test]
    async fn test_successful_origination_reconciles_ids() {
        let today = date(2026, 8, 30);
        let loans = MockLoans::default();
        let payments = MockPayments::new(Vec::new());
        let onboarding = MockOnboarding::default();
        let (progress, mut events) = progress_channel();

        let orchestrator = OriginationOrchestrator::new(&loans, &payments, &onboarding, progress);
        let outcome = orchestrator
            .originate(&ctx(today), funded_draft(date(2026, 6, 1)))
            .await
            .unwrap();

        // Store echoed an empty borrower id; the draft value wins
        assert_eq!(outcome.loan.borrower_id, "b-1");
        assert_eq!(outcome.loan.status, LoanStatus::Funded);
        assert_eq!(outcome.skipped_payments, 0);

        let created = loans.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert!(!created[0].idempotency_token.is_empty());
        assert!((created[0].monthly_payment - 856.07).abs() < 0.01);

        // Terminal event is Finished
        let mut last = None;
        while let Ok(event) = events.try_recv() {
            last = Some(event);
        }
        assert!(matches!(last, Some(ProgressEvent::Finished { .. })));
    }

    #[tokio::test]
    async fn test_create_failure_aborts_everything() {
        let today = date(2026, 8, 30);
        let loans = MockLoans {
            fail_create: true,
            ..Default::default()
        };
        let payments = MockPayments::new(Vec::new());
        let onboarding = MockOnboarding::default();
        let (progress, mut events) = progress_channel();

        let mut draft = funded_draft(date(2026, 6, 1));
        draft.pending_payments.push(PendingPayment {
            amount: 500.0,
            date: date(2026, 7, 1),
            status: PaymentStatus::Paid,
        });

        let orchestrator = OriginationOrchestrator::new(&loans, &payments, &onboarding, progress);
        let err = orchestrator.originate(&ctx(today), draft).await.unwrap_err();

        assert!(matches!(err, EngineError::Persistence(_)));
        // Zero payment-creation calls after the primary failure
        assert!(payments.calls.lock().unwrap().is_empty());
        assert!(onboarding.patches.lock().unwrap().is_empty());

        let mut last = None;
        while let Ok(event) = events.try_recv() {
            last = Some(event);
        }
        assert!(matches!(last, Some(ProgressEvent::Failed { .. })));
    }

    #[tokio::test]
    async fn test_backfill_tolerates_failed_row() {
        let today = date(2026, 8, 30);
        let loans = MockLoans::default();
        let payments = MockPayments::new(vec![1]); // second row fails
        let onboarding = MockOnboarding::default();
        let (progress, _events) = progress_channel();

        let mut draft = funded_draft(date(2026, 6, 1));
        for month in [6u32, 7, 8] {
            draft.pending_payments.push(PendingPayment {
                amount: 500.0,
                date: date(2026, month, 1),
                status: PaymentStatus::Paid,
            });
        }

        let orchestrator = OriginationOrchestrator::new(&loans, &payments, &onboarding, progress);
        let outcome = orchestrator.originate(&ctx(today), draft).await.unwrap();

        // All three rows were attempted, in entry order
        let calls = payments.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].date, date(2026, 6, 1));
        assert_eq!(calls[2].date, date(2026, 8, 1));

        // Failed middle row skipped, the others attached
        assert_eq!(outcome.skipped_payments, 1);
        assert_eq!(outcome.loan.payment_ids, vec!["p-0".to_string(), "p-2".to_string()]);
    }

    #[tokio::test]
    async fn test_onboarding_checkpoint_advanced_and_tolerated() {
        let today = date(2026, 8, 30);
        let loans = MockLoans::default();
        let payments = MockPayments::new(Vec::new());
        let (progress, _events) = progress_channel();

        // At the add-loan checkpoint: advanced to Done
        let onboarding = MockOnboarding::default();
        let orchestrator =
            OriginationOrchestrator::new(&loans, &payments, &onboarding, progress.clone());
        let mut context = ctx(today);
        context.onboarding_state = Some(OnboardingState::AddLoan);
        orchestrator
            .originate(&context, funded_draft(date(2026, 6, 1)))
            .await
            .unwrap();
        assert_eq!(*onboarding.patches.lock().unwrap(), vec![OnboardingState::Done]);

        // Checkpoint store failure does not invalidate the loan
        let failing = MockOnboarding {
            fail: true,
            ..Default::default()
        };
        let orchestrator = OriginationOrchestrator::new(&loans, &payments, &failing, progress);
        let outcome = orchestrator
            .originate(&context, funded_draft(date(2026, 6, 1)))
            .await;
        assert!(outcome.is_ok());
    }
}
