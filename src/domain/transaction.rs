use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, Identifiable};
use crate::domain::user::User;

/// A single savings contribution, in minor currency units.
///
/// Transactions are immutable once created; the crate exposes no update or
/// delete path for them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a contribution. Ids and timestamps are assigned by
/// the storage backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub user_id: i64,
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A transaction joined with its contributing user, when the user row
/// still exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionWithUser {
    pub transaction: Transaction,
    pub user: Option<User>,
}

impl TransactionWithUser {
    /// Display name of the contributor, or a placeholder for orphaned rows.
    pub fn user_name(&self) -> &str {
        self.user.as_ref().map(|u| u.name.as_str()).unwrap_or("-")
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("txn:{} [{}]", self.id, self.amount)
    }
}
