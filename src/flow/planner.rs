//! Step-sequence planning as a pure function of the start date

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Step {
    Purpose,
    Terms,
    Context,
    Funding,
    History,
    Confirm,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Purpose => "Purpose",
            Step::Terms => "Terms",
            Step::Context => "Context",
            Step::Funding => "Funding",
            Step::History => "History",
            Step::Confirm => "Confirm",
        }
    }
}

/// Which of the two step sequences a date maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Loan starts after today (or no date yet): ask funding context
    Future,
    /// Loan started today or earlier: collect payment history
    History,
}

/// Ordered steps for a future-dated loan
pub const FUTURE_PLAN: [Step; 5] = [
    Step::Purpose,
    Step::Terms,
    Step::Context,
    Step::Funding,
    Step::Confirm,
];

/// Ordered steps for a loan already in progress
pub const HISTORY_PLAN: [Step; 5] = [
    Step::Purpose,
    Step::Terms,
    Step::Funding,
    Step::History,
    Step::Confirm,
];

/// Classify a start date relative to today (date-only, time ignored)
///
/// An unset date and a strictly future date both take the future path;
/// today itself is inclusive on the history side.
pub fn path_kind(start_date: Option<NaiveDate>, today: NaiveDate) -> PathKind {
    match start_date {
        None => PathKind::Future,
        Some(d) if d > today => PathKind::Future,
        Some(_) => PathKind::History,
    }
}

/// The ordered 5-step plan for a start date
pub fn plan(start_date: Option<NaiveDate>, today: NaiveDate) -> [Step; 5] {
    match path_kind(start_date, today) {
        PathKind::Future => FUTURE_PLAN,
        PathKind::History => HISTORY_PLAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unset_date_is_future_path() {
        let today = date(2026, 8, 30);
        assert_eq!(plan(None, today), FUTURE_PLAN);
    }

    #[test]
    fn test_today_boundary_is_history_inclusive() {
        let today = date(2026, 8, 30);
        assert_eq!(path_kind(Some(today), today), PathKind::History);
        assert_eq!(path_kind(Some(date(2026, 8, 31)), today), PathKind::Future);
        assert_eq!(path_kind(Some(date(2026, 8, 29)), today), PathKind::History);
    }

    #[test]
    fn test_plan_contents() {
        let today = date(2026, 8, 30);
        let future = plan(Some(date(2027, 1, 1)), today);
        assert_eq!(
            future,
            [Step::Purpose, Step::Terms, Step::Context, Step::Funding, Step::Confirm]
        );

        let history = plan(Some(date(2025, 1, 1)), today);
        assert_eq!(
            history,
            [Step::Purpose, Step::Terms, Step::Funding, Step::History, Step::Confirm]
        );
    }
}
