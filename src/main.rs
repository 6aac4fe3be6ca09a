//! Loan Origination CLI
//!
//! Command-line interface for payment math, recast grids, and a full
//! origination demo against in-memory stores

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::sync::Mutex;

use loan_origination::amort::{
    cash_flow_rate, grid_candidates, manual_candidate, monthly_payment, round_display, GRID_RATES,
    GRID_TERMS,
};
use loan_origination::borrower::BorrowerSubflow;
use loan_origination::draft::{
    loader::load_payment_history, Borrower, DraftAction, FundedFlag, Loan, LoanType, NewBorrower,
    NewPayment, OnboardingState, Payment,
};
use loan_origination::error::StoreError;
use loan_origination::flow::Wizard;
use loan_origination::orchestrate::{
    commit_recast, progress_channel, BorrowerStore, LoanFields, LoanPatch, LoanStore,
    OnboardingStore, OriginationContext, OriginationOrchestrator, PaymentStore, RecastRequest,
};

#[derive(Parser)]
#[command(name = "loan_origination", about = "Loan origination and recast engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print monthly payment and cash-flow figures for the given terms
    Payment {
        /// Principal balance
        #[arg(long)]
        balance: f64,
        /// Annual rate in percent
        #[arg(long)]
        rate: f64,
        /// Number of monthly payments
        #[arg(long)]
        term: u32,
        /// Loan type: amortized, interest-only, or revolving
        #[arg(long, default_value = "amortized")]
        loan_type: String,
    },
    /// Print the recast candidate grid over an outstanding balance
    Grid {
        #[arg(long)]
        balance: f64,
    },
    /// Run a full origination against in-memory stores
    Demo {
        /// Optional CSV of backfill payment rows (Amount,Date,Status)
        #[arg(long)]
        history: Option<std::path::PathBuf>,
    },
}

fn parse_loan_type(s: &str) -> Result<LoanType> {
    match s {
        "amortized" => Ok(LoanType::AmortizedDueDate),
        "interest-only" => Ok(LoanType::InterestOnly),
        "revolving" => Ok(LoanType::Revolving),
        other => anyhow::bail!("unknown loan type: {}", other),
    }
}

fn run_payment(balance: f64, rate: f64, term: u32, loan_type: &str) -> Result<()> {
    let loan_type = parse_loan_type(loan_type)?;
    let payment = monthly_payment(balance, rate, term, loan_type);

    println!("Loan terms:");
    println!("  Balance:  ${:.2}", balance);
    println!("  Rate:     {:.3}%", rate);
    println!("  Term:     {} months", term);
    println!();
    println!("Monthly payment: ${:.2}", round_display(payment));
    println!(
        "Cash-flow rate:  {:.2}% of principal per month",
        round_display(cash_flow_rate(payment, balance))
    );
    Ok(())
}

fn run_grid(balance: f64) {
    println!("Recast grid over ${:.2} outstanding:", balance);
    print!("{:>8}", "rate");
    for term in GRID_TERMS {
        print!("{:>12}", format!("{}mo", term));
    }
    println!();
    println!("{}", "-".repeat(8 + 12 * GRID_TERMS.len()));

    let grid = grid_candidates(balance);
    for (i, rate) in GRID_RATES.iter().enumerate() {
        print!("{:>7}%", rate);
        for j in 0..GRID_TERMS.len() {
            let cell = &grid[i * GRID_TERMS.len() + j];
            print!("{:>12.2}", round_display(cell.payment));
        }
        println!();
    }
}

/// In-memory stores for the demo run
#[derive(Default)]
struct MemoryStores {
    loans: Mutex<Vec<Loan>>,
    payments: Mutex<Vec<Payment>>,
    borrowers: Mutex<Vec<Borrower>>,
    onboarding: Mutex<Option<OnboardingState>>,
}

impl BorrowerStore for MemoryStores {
    async fn fetch_all(&self, _bank_id: &str) -> Result<Vec<Borrower>, StoreError> {
        Ok(self.borrowers.lock().unwrap().clone())
    }

    async fn create(&self, _bank_id: &str, fields: &NewBorrower) -> Result<Borrower, StoreError> {
        let mut borrowers = self.borrowers.lock().unwrap();
        let borrower = Borrower {
            id: format!("b-{}", borrowers.len() + 1),
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
        };
        borrowers.push(borrower.clone());
        Ok(borrower)
    }
}

impl LoanStore for MemoryStores {
    async fn create(&self, _bank_id: &str, fields: &LoanFields) -> Result<Loan, StoreError> {
        let mut loans = self.loans.lock().unwrap();
        let loan = Loan {
            id: format!("loan-{}", loans.len() + 1),
            nickname: fields.nickname.clone(),
            comments: fields.comments.clone(),
            borrower_id: fields.borrower_id.clone(),
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
        };
        loans.push(loan.clone());
        Ok(loan)
    }

    async fn patch(&self, loan_id: &str, fields: &LoanPatch) -> Result<Loan, StoreError> {
        let mut loans = self.loans.lock().unwrap();
        let loan = loans
            .iter_mut()
            .find(|l| l.id == loan_id)
            .ok_or_else(|| StoreError::new("loan not found"))?;
        if let Some(rate) = fields.rate {
            loan.initial_annual_rate = rate;
        }
        if let Some(payment) = fields.monthly_payment {
            loan.monthly_payment = payment;
        }
        if let Some(recast) = &fields.recast {
            loan.recast = Some(recast.clone());
        }
        if let Some(ids) = &fields.payment_ids {
            loan.payment_ids = ids.clone();
        }
        Ok(loan.clone())
    }

    async fn recast(&self, _loan_id: &str, _request: &RecastRequest) -> Result<(), StoreError> {
        Ok(())
    }
}

impl PaymentStore for MemoryStores {
    async fn create(&self, _loan_id: &str, payment: &NewPayment) -> Result<Payment, StoreError> {
        let mut payments = self.payments.lock().unwrap();
        let row = Payment {
            id: format!("p-{}", payments.len() + 1),
            amount: payment.amount,
            date: payment.date,
            balloon: payment.balloon,
        };
        payments.push(row.clone());
        Ok(row)
    }
}

impl OnboardingStore for MemoryStores {
    async fn patch(&self, _bank_id: &str, state: OnboardingState) -> Result<(), StoreError> {
        *self.onboarding.lock().unwrap() = Some(state);
        Ok(())
    }
}

async fn run_demo(history: Option<std::path::PathBuf>) -> Result<()> {
    let today = Local::now().date_naive();
    let start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap();
    let stores = MemoryStores::default();
    let (progress, mut events) = progress_channel();

    // No borrowers on file yet: resolve one inline through the subflow
    println!("Resolving borrower...");
    let mut subflow = BorrowerSubflow::new(stores.fetch_all("bank-1").await?);
    subflow.set_text("Jordan Meyers");
    anyhow::ensure!(subflow.eligible_for_popup(), "expected no matches on an empty book");
    subflow.open_popup();
    subflow
        .submit_creation(
            &stores,
            "bank-1",
            NewBorrower {
                first_name: "Jordan".into(),
                last_name: "Meyers".into(),
            },
            &progress,
        )
        .await?;
    let borrower_id = subflow.selected().unwrap().to_string();
    println!("  created and selected {}", borrower_id);

    println!("Walking the wizard for a history-path loan...");
    let mut wizard = Wizard::new(today);
    wizard.dispatch(DraftAction::SetNickname("Duplex rehab".into()));
    wizard.dispatch(DraftAction::SetBorrower(borrower_id));
    wizard.dispatch(DraftAction::SetStartDate(Some(start)));
    wizard.dispatch(DraftAction::SetInitialBalance(10_000.0));
    wizard.dispatch(DraftAction::SetNumberOfPayments(12));
    wizard.dispatch(DraftAction::SetAnnualRate(5.0));
    wizard.dispatch(DraftAction::SetLoanType(LoanType::AmortizedDueDate));
    wizard.dispatch(DraftAction::SetFunded(FundedFlag::Yes));
    wizard.dispatch(DraftAction::SetVault("vault-1".into()));

    if let Some(path) = history {
        let rows = load_payment_history(&path)
            .map_err(|e| anyhow::anyhow!("load {}: {}", path.display(), e))?;
        println!("  importing {} backfill rows from {}", rows.len(), path.display());
        wizard.dispatch(DraftAction::ReplacePendingPayments(rows));
    }

    while !wizard.is_final_step() {
        let (transition, _) = wizard.next();
        println!("  -> {:?}", transition);
    }

    let draft = wizard.finish()?;
    println!("Wizard dismissed; committing in the background.\n");

    let orchestrator = OriginationOrchestrator::new(&stores, &stores, &stores, progress.clone());
    let context = OriginationContext {
        bank_id: "bank-1".into(),
        today,
        onboarding_state: Some(OnboardingState::AddLoan),
    };

    let outcome = orchestrator.originate(&context, draft).await?;

    println!("Loan {} committed:", outcome.loan.id);
    println!("  Status:          {}", outcome.loan.status.as_str());
    println!("  Monthly payment: ${:.2}", round_display(outcome.loan.monthly_payment));
    println!("  Onboarding:      {:?}", stores.onboarding.lock().unwrap());
    println!("{}", serde_json::to_string_pretty(&outcome.loan)?);

    // Recast the freshly created loan to a cheaper payment
    let candidate = manual_candidate(outcome.loan.initial_balance, 4.5, 24)
        .expect("manual terms in range");
    let recast_date = today;
    let updated = commit_recast(
        &stores,
        &outcome.loan,
        &candidate,
        recast_date,
        outcome.loan.initial_balance,
        &progress,
    )
    .await?;
    println!(
        "Recast to {:.1}% over {} months: ${:.2}/mo",
        candidate.rate,
        candidate.term_months,
        round_display(updated.monthly_payment)
    );

    println!("\nProgress events observed:");
    while let Ok(event) = events.try_recv() {
        println!("  {:?}", event);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Payment {
            balance,
            rate,
            term,
            loan_type,
        } => run_payment(balance, rate, term, &loan_type)?,
        Command::Grid { balance } => run_grid(balance),
        Command::Demo { history } => run_demo(history).await?,
    }

    Ok(())
}
