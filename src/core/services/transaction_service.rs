//! Validated helpers over the contribution store.

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{NewTransaction, Transaction, TransactionWithUser};
use crate::storage::{TransactionStore, UserStore};

/// Contribution form input, prior to validation.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub user_id: i64,
    pub amount: i64,
    pub image_url: Option<String>,
    pub notes: Option<String>,
}

pub struct TransactionService;

impl TransactionService {
    /// Contributions joined with their users, newest first.
    pub fn list(
        store: &dyn TransactionStore,
        limit: Option<usize>,
    ) -> ServiceResult<Vec<TransactionWithUser>> {
        Ok(store.list_with_user(limit)?)
    }

    /// One user's contributions, newest first.
    pub fn list_by_user(
        store: &dyn TransactionStore,
        user_id: i64,
    ) -> ServiceResult<Vec<Transaction>> {
        Ok(store.list_by_user(user_id)?)
    }

    /// Looks up a single contribution by id.
    pub fn get(
        store: &dyn TransactionStore,
        id: i64,
    ) -> ServiceResult<Option<TransactionWithUser>> {
        Ok(store.find_with_user(id)?)
    }

    /// Records a contribution after validating the amount and the
    /// contributor. Contributions are immutable once created.
    pub fn create(
        transactions: &dyn TransactionStore,
        users: &dyn UserStore,
        input: CreateTransactionInput,
    ) -> ServiceResult<Transaction> {
        if input.amount <= 0 {
            return Err(ServiceError::Validation(
                "Amount must be greater than 0".into(),
            ));
        }
        if users.find(input.user_id)?.is_none() {
            return Err(ServiceError::Validation(format!(
                "Unknown user: {}",
                input.user_id
            )));
        }
        let transaction = transactions.insert(NewTransaction {
            user_id: input.user_id,
            amount: input.amount,
            image_url: input.image_url,
            notes: input.notes,
        })?;
        tracing::info!(
            id = transaction.id,
            user_id = transaction.user_id,
            amount = transaction.amount,
            "contribution recorded"
        );
        Ok(transaction)
    }

    /// The full contribution history, newest first, for record export.
    pub fn for_export(store: &dyn TransactionStore) -> ServiceResult<Vec<TransactionWithUser>> {
        Ok(store.list_with_user(None)?)
    }
}
