use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, Identifiable};
use crate::domain::transaction::Transaction;

/// The persisted savings target: an amount to reach by a calendar date.
///
/// `monthly_suggestion` is a snapshot from the last write and is never
/// trusted on reads; every read recomputes the derived fields from the
/// live transaction list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavingsPlan {
    pub id: i64,
    pub target_amount: i64,
    pub target_date: NaiveDate,
    pub monthly_suggestion: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived monthly-contribution recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Suggestion {
    pub monthly_suggestion: i64,
    pub remaining_months: i64,
}

/// A plan together with the fields recomputed on every read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanWithSuggestion {
    pub plan: SavingsPlan,
    pub current_savings: i64,
    pub remaining_amount: i64,
    pub remaining_months: i64,
    pub monthly_suggestion: i64,
    pub progress_percentage: u8,
}

/// Number of whole calendar months from `today` until `target`, floored
/// at 1. Only the year and month components participate, so a target
/// earlier in the current month still counts as one month out. The floor
/// tolerates past dates deliberately; rejecting them is the caller's job.
pub fn months_until(today: NaiveDate, target: NaiveDate) -> i64 {
    let year_diff = i64::from(target.year() - today.year());
    let month_diff = i64::from(target.month() as i32 - today.month() as i32);
    (year_diff * 12 + month_diff).max(1)
}

/// Amount still missing toward the target, floored at zero.
pub fn remaining_amount(target_amount: i64, current_savings: i64) -> i64 {
    (target_amount - current_savings).max(0)
}

/// Computes the required monthly contribution to reach `target_amount` by
/// `target_date`, given savings already accumulated.
///
/// Pure and idempotent. Never divides by zero (the month count is floored
/// at 1) and returns a zero suggestion once the target is met.
pub fn suggest(
    target_amount: i64,
    current_savings: i64,
    today: NaiveDate,
    target_date: NaiveDate,
) -> Suggestion {
    let remaining_months = months_until(today, target_date);
    let remaining = remaining_amount(target_amount, current_savings);
    // Ceiling division; remaining >= 0 and remaining_months >= 1, and
    // div_ceil avoids an intermediate sum that could overflow since the
    // target amount carries no upper bound.
    let monthly_suggestion = remaining.div_ceil(remaining_months);
    Suggestion {
        monthly_suggestion,
        remaining_months,
    }
}

/// Sums contribution amounts. Amounts are exact integers throughout, so
/// there is no floating-point accumulation to worry about.
pub fn sum_amounts(transactions: &[Transaction]) -> i64 {
    transactions.iter().map(|tx| tx.amount).sum()
}

/// Share of the target already saved, as a whole percentage clamped to
/// `[0, 100]`. Returns `None` for a non-positive target, which the source
/// schema never rejects but which would otherwise divide by zero.
pub fn progress_percentage(current_savings: i64, target_amount: i64) -> Option<u8> {
    if target_amount <= 0 {
        return None;
    }
    let ratio = current_savings as f64 / target_amount as f64;
    Some((ratio * 100.0).round().clamp(0.0, 100.0) as u8)
}

impl Identifiable for SavingsPlan {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Displayable for SavingsPlan {
    fn display_label(&self) -> String {
        format!("plan:{} [{} by {}]", self.id, self.target_amount, self.target_date)
    }
}
