//! Read-only access to the household roster. The roster is seeded by the
//! storage backend; nothing here creates or edits users, and login lives
//! outside this core.

use crate::core::services::ServiceResult;
use crate::domain::AuthUser;
use crate::storage::UserStore;

pub struct UserService;

impl UserService {
    /// Roster members sorted by display name, without password columns.
    pub fn list(store: &dyn UserStore) -> ServiceResult<Vec<AuthUser>> {
        let mut users: Vec<AuthUser> = store.list_all()?.iter().map(AuthUser::from).collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    /// Single roster member, or `None` when the id is unknown.
    pub fn find(store: &dyn UserStore, id: i64) -> ServiceResult<Option<AuthUser>> {
        Ok(store.find(id)?.as_ref().map(AuthUser::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStore;
    use tempfile::TempDir;

    #[test]
    fn roster_lists_without_passwords() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let users = UserService::list(&store).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "Rio");
        assert_eq!(users[1].name, "Zahra");

        let zahra = UserService::find(&store, 2).unwrap().unwrap();
        assert_eq!(zahra.username, "zahra");
        assert!(UserService::find(&store, 42).unwrap().is_none());
    }
}
