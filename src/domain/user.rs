use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, Identifiable};

/// A member of the static household roster.
///
/// The roster is seeded by the storage backend and never created or edited
/// through this crate. The password column is carried verbatim from the
/// source schema; authentication itself lives outside this core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a [`User`] without the password column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub name: String,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }
}

impl Identifiable for User {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Displayable for User {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn auth_projection_drops_the_password() {
        let now = Utc::now();
        let user = User {
            id: 1,
            username: "rio".into(),
            password: "rio123".into(),
            name: "Rio".into(),
            created_at: now,
            updated_at: now,
        };
        let auth = AuthUser::from(&user);
        assert_eq!(auth.id, Identifiable::id(&user));
        assert_eq!(auth.username, "rio");
        assert_eq!(user.display_label(), "Rio (rio)");
    }
}
