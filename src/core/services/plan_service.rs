//! Savings-plan reads and writes.
//!
//! The persisted `monthly_suggestion` column is an informational snapshot
//! from the last write; every read recomputes the derived fields from the
//! live transaction list.

use crate::core::services::{ServiceError, ServiceResult};
use crate::core::time::Clock;
use crate::domain::plan::{progress_percentage, remaining_amount, suggest, sum_amounts};
use crate::domain::{PlanWithSuggestion, SavingsPlan};
use crate::storage::{PlanFields, PlanStore, TransactionStore};

use chrono::NaiveDate;

/// Target amount and date as submitted by the plan form.
#[derive(Debug, Clone)]
pub struct PlanInput {
    pub target_amount: i64,
    pub target_date: NaiveDate,
}

pub struct PlanService;

impl PlanService {
    /// Fetches the current plan, if any, with its derived fields computed
    /// fresh from the transaction list.
    pub fn current_plan(
        plans: &dyn PlanStore,
        transactions: &dyn TransactionStore,
        clock: &dyn Clock,
    ) -> ServiceResult<Option<PlanWithSuggestion>> {
        let Some(plan) = plans.most_recent()? else {
            return Ok(None);
        };
        let current_savings = sum_amounts(&transactions.list_all()?);
        let progress = progress_percentage(current_savings, plan.target_amount).ok_or_else(
            || ServiceError::InvalidPlan("target amount must be positive".into()),
        )?;
        let suggestion = suggest(
            plan.target_amount,
            current_savings,
            clock.today(),
            plan.target_date,
        );
        let remaining = remaining_amount(plan.target_amount, current_savings);
        Ok(Some(PlanWithSuggestion {
            current_savings,
            remaining_amount: remaining,
            remaining_months: suggestion.remaining_months,
            monthly_suggestion: suggestion.monthly_suggestion,
            progress_percentage: progress,
            plan,
        }))
    }

    /// Creates or replaces the savings target. Exactly one storage write
    /// per call; the backend's upsert is atomic and always targets the
    /// most-recently-created row.
    pub fn upsert_plan(
        plans: &dyn PlanStore,
        transactions: &dyn TransactionStore,
        clock: &dyn Clock,
        input: PlanInput,
    ) -> ServiceResult<SavingsPlan> {
        if input.target_amount <= 0 {
            return Err(ServiceError::Validation(
                "Target amount must be greater than 0".into(),
            ));
        }
        if input.target_date <= clock.today() {
            return Err(ServiceError::Validation(
                "Target date must be in the future".into(),
            ));
        }
        let current_savings = sum_amounts(&transactions.list_all()?);
        let suggestion = suggest(
            input.target_amount,
            current_savings,
            clock.today(),
            input.target_date,
        );
        let plan = plans.upsert(PlanFields {
            target_amount: input.target_amount,
            target_date: input.target_date,
            monthly_suggestion: suggestion.monthly_suggestion,
        })?;
        tracing::info!(
            id = plan.id,
            target_amount = plan.target_amount,
            monthly_suggestion = plan.monthly_suggestion,
            "savings plan saved"
        );
        Ok(plan)
    }
}
