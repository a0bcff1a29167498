pub mod common;
pub mod plan;
pub mod transaction;
pub mod user;

pub use common::{Displayable, Identifiable};
pub use plan::{PlanWithSuggestion, SavingsPlan, Suggestion};
pub use transaction::{NewTransaction, Transaction, TransactionWithUser};
pub use user::{AuthUser, User};
