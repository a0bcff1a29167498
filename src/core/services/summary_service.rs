//! Dashboard view-model assembly: global and per-user totals plus the
//! recent-contributions list.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::core::services::ServiceResult;
use crate::domain::plan::sum_amounts;
use crate::domain::{TransactionWithUser, User};
use crate::storage::{TransactionStore, UserStore};

/// How many contributions the dashboard shows.
pub const RECENT_LIMIT: usize = 10;

/// One user's share of the pot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSavings {
    pub user_id: i64,
    pub name: String,
    pub total: i64,
}

/// Ephemeral dashboard view model, recomputed per request and never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_savings: i64,
    pub user_savings: Vec<UserSavings>,
    pub recent_transactions: Vec<TransactionWithUser>,
}

pub struct SummaryService;

impl SummaryService {
    /// Builds the dashboard summary from roster and transaction snapshots.
    ///
    /// Sorts the transactions newest-first itself rather than trusting the
    /// caller's ordering. Per-user totals follow roster order; the nested
    /// filter-and-sum is O(users × transactions), which is fine at
    /// household scale.
    pub fn build_summary(
        users: &[User],
        transactions: &[TransactionWithUser],
    ) -> DashboardSummary {
        let amounts: Vec<_> = transactions.iter().map(|row| row.transaction.clone()).collect();
        let total_savings = sum_amounts(&amounts);

        let user_savings = users
            .iter()
            .map(|user| UserSavings {
                user_id: user.id,
                name: user.name.clone(),
                total: amounts
                    .iter()
                    .filter(|tx| tx.user_id == user.id)
                    .map(|tx| tx.amount)
                    .sum(),
            })
            .collect();

        let mut recent = transactions.to_vec();
        recent.sort_by_key(|row| Reverse((row.transaction.created_at, row.transaction.id)));
        recent.truncate(RECENT_LIMIT);

        DashboardSummary {
            total_savings,
            user_savings,
            recent_transactions: recent,
        }
    }

    /// Fetches fresh roster and transaction snapshots and summarizes them.
    pub fn dashboard(
        users: &dyn UserStore,
        transactions: &dyn TransactionStore,
    ) -> ServiceResult<DashboardSummary> {
        let roster = users.list_all()?;
        let rows = transactions.list_with_user(None)?;
        Ok(Self::build_summary(&roster, &rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Transaction;
    use chrono::{TimeZone, Utc};

    fn user(id: i64, name: &str) -> User {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        User {
            id,
            username: name.to_lowercase(),
            password: String::new(),
            name: name.into(),
            created_at: at,
            updated_at: at,
        }
    }

    fn row(id: i64, user: &User, amount: i64, minute: u32) -> TransactionWithUser {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 9, minute, 0).unwrap();
        TransactionWithUser {
            transaction: Transaction {
                id,
                user_id: user.id,
                amount,
                image_url: None,
                notes: None,
                created_at: at,
                updated_at: at,
            },
            user: Some(user.clone()),
        }
    }

    #[test]
    fn totals_split_per_user() {
        let rio = user(1, "Rio");
        let zahra = user(2, "Zahra");
        let rows = vec![row(1, &rio, 100, 1), row(2, &zahra, 300, 2), row(3, &rio, 50, 3)];

        let summary = SummaryService::build_summary(&[rio, zahra], &rows);
        assert_eq!(summary.total_savings, 450);
        assert_eq!(
            summary.user_savings,
            vec![
                UserSavings {
                    user_id: 1,
                    name: "Rio".into(),
                    total: 150
                },
                UserSavings {
                    user_id: 2,
                    name: "Zahra".into(),
                    total: 300
                },
            ]
        );
    }

    #[test]
    fn users_without_contributions_show_zero() {
        let rio = user(1, "Rio");
        let zahra = user(2, "Zahra");
        let rows = vec![row(1, &rio, 700, 1)];

        let summary = SummaryService::build_summary(&[rio, zahra], &rows);
        assert_eq!(summary.user_savings[1].total, 0);
    }

    #[test]
    fn recent_list_sorts_and_bounds() {
        let rio = user(1, "Rio");
        // Deliberately out of order; the builder must not trust it.
        let mut rows: Vec<_> = (1..=14).map(|i| row(i, &rio, 10, i as u32)).collect();
        rows.swap(0, 13);

        let summary = SummaryService::build_summary(std::slice::from_ref(&rio), &rows);
        assert_eq!(summary.recent_transactions.len(), RECENT_LIMIT);
        assert_eq!(summary.recent_transactions[0].transaction.id, 14);
        assert_eq!(summary.recent_transactions[9].transaction.id, 5);
        // Bounding the list does not shrink the global total.
        assert_eq!(summary.total_savings, 140);
    }

    #[test]
    fn empty_inputs_produce_empty_summary() {
        let summary = SummaryService::build_summary(&[], &[]);
        assert_eq!(summary.total_savings, 0);
        assert!(summary.user_savings.is_empty());
        assert!(summary.recent_transactions.is_empty());
    }
}
