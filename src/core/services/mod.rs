pub mod plan_service;
pub mod summary_service;
pub mod transaction_service;
pub mod user_service;

pub use plan_service::{PlanInput, PlanService};
pub use summary_service::{DashboardSummary, SummaryService, UserSavings};
pub use transaction_service::{CreateTransactionInput, TransactionService};
pub use user_service::UserService;

use crate::errors::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure taxonomy at the service boundary. A missing plan is not a
/// failure; it reads as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),
}
