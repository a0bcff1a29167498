pub mod json_backend;

use chrono::NaiveDate;

use crate::domain::{NewTransaction, SavingsPlan, Transaction, TransactionWithUser, User};
use crate::errors::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Fields written on every plan upsert. Ids and timestamps stay with the
/// backend.
#[derive(Debug, Clone)]
pub struct PlanFields {
    pub target_amount: i64,
    pub target_date: NaiveDate,
    pub monthly_suggestion: i64,
}

/// Read/write access to contribution records.
pub trait TransactionStore: Send + Sync {
    /// Every transaction, in no particular order. Used for aggregation.
    fn list_all(&self) -> Result<Vec<Transaction>>;

    /// Transactions joined with their users, newest first, optionally
    /// bounded.
    fn list_with_user(&self, limit: Option<usize>) -> Result<Vec<TransactionWithUser>>;

    /// Single transaction joined with its user.
    fn find_with_user(&self, id: i64) -> Result<Option<TransactionWithUser>>;

    /// Transactions of one user, newest first.
    fn list_by_user(&self, user_id: i64) -> Result<Vec<Transaction>>;

    fn insert(&self, new: NewTransaction) -> Result<Transaction>;
}

/// Access to the single savings-target record.
///
/// The plan is a logical singleton. `upsert` is atomic at the storage
/// layer (no separate existence check by callers) and both it and
/// `most_recent` target the same row: the most recently created one, ties
/// broken by the highest id.
pub trait PlanStore: Send + Sync {
    fn most_recent(&self) -> Result<Option<SavingsPlan>>;

    /// Updates the current plan row in place, or inserts one if none
    /// exists. Exactly one write either way.
    fn upsert(&self, fields: PlanFields) -> Result<SavingsPlan>;
}

/// Read access to the static household roster.
pub trait UserStore: Send + Sync {
    fn list_all(&self) -> Result<Vec<User>>;
    fn find(&self, id: i64) -> Result<Option<User>>;
}

pub use json_backend::JsonStore;
