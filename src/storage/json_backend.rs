//! Single-file JSON persistence standing in for the managed database.
//!
//! The whole data set lives in one `database.json` guarded by a mutex, so
//! the plan upsert is an atomic read-modify-write rather than the
//! check-then-act sequence the original service performed against two
//! separate queries.

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Displayable, NewTransaction, SavingsPlan, Transaction, TransactionWithUser, User,
};
use crate::errors::StoreError;
use crate::storage::{PlanFields, PlanStore, Result, TransactionStore, UserStore};

const DATABASE_FILE: &str = "database.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Database {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    savings_plans: Vec<SavingsPlan>,
    #[serde(default)]
    next_transaction_id: i64,
    #[serde(default)]
    next_plan_id: i64,
}

/// Filesystem-backed JSON store for users, transactions, and the savings
/// plan.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    state: Mutex<Database>,
}

impl JsonStore {
    /// Opens the database file under `data_dir`, seeding the two-person
    /// roster on first use.
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(DATABASE_FILE);
        let state = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data).map_err(|err| StoreError::Serde(err.to_string()))?
        } else {
            tracing::info!(path = %path.display(), "seeding new savings database");
            let db = seeded_database();
            persist(&path, &db)?;
            db
        };
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    fn read<T>(&self, f: impl FnOnce(&Database) -> T) -> Result<T> {
        let state = self
            .state
            .lock()
            .map_err(|_| StoreError::Backend("database lock poisoned".into()))?;
        Ok(f(&state))
    }

    /// Applies a mutation to a staged copy and commits it to memory only
    /// once the disk write succeeds, so a failed write leaves no trace
    /// and the caller can simply resubmit.
    fn write<T>(&self, f: impl FnOnce(&mut Database) -> T) -> Result<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| StoreError::Backend("database lock poisoned".into()))?;
        let mut staged = state.clone();
        let value = f(&mut staged);
        persist(&self.path, &staged)?;
        *state = staged;
        Ok(value)
    }
}

impl TransactionStore for JsonStore {
    fn list_all(&self) -> Result<Vec<Transaction>> {
        self.read(|db| db.transactions.clone())
    }

    fn list_with_user(&self, limit: Option<usize>) -> Result<Vec<TransactionWithUser>> {
        self.read(|db| {
            let mut rows = db.transactions.clone();
            rows.sort_by_key(|tx| Reverse((tx.created_at, tx.id)));
            if let Some(limit) = limit {
                rows.truncate(limit);
            }
            rows.into_iter().map(|tx| join_user(db, tx)).collect()
        })
    }

    fn find_with_user(&self, id: i64) -> Result<Option<TransactionWithUser>> {
        self.read(|db| {
            db.transactions
                .iter()
                .find(|tx| tx.id == id)
                .cloned()
                .map(|tx| join_user(db, tx))
        })
    }

    fn list_by_user(&self, user_id: i64) -> Result<Vec<Transaction>> {
        self.read(|db| {
            let mut rows: Vec<Transaction> = db
                .transactions
                .iter()
                .filter(|tx| tx.user_id == user_id)
                .cloned()
                .collect();
            rows.sort_by_key(|tx| Reverse((tx.created_at, tx.id)));
            rows
        })
    }

    fn insert(&self, new: NewTransaction) -> Result<Transaction> {
        self.write(|db| {
            let now = Utc::now();
            db.next_transaction_id += 1;
            let transaction = Transaction {
                id: db.next_transaction_id,
                user_id: new.user_id,
                amount: new.amount,
                image_url: new.image_url,
                notes: new.notes,
                created_at: now,
                updated_at: now,
            };
            db.transactions.push(transaction.clone());
            tracing::debug!("inserted contribution {}", transaction.display_label());
            transaction
        })
    }
}

impl PlanStore for JsonStore {
    fn most_recent(&self) -> Result<Option<SavingsPlan>> {
        self.read(|db| current_plan_index(db).map(|idx| db.savings_plans[idx].clone()))
    }

    fn upsert(&self, fields: PlanFields) -> Result<SavingsPlan> {
        self.write(|db| {
            let now = Utc::now();
            match current_plan_index(db) {
                Some(idx) => {
                    let plan = &mut db.savings_plans[idx];
                    plan.target_amount = fields.target_amount;
                    plan.target_date = fields.target_date;
                    plan.monthly_suggestion = fields.monthly_suggestion;
                    plan.updated_at = now;
                    tracing::debug!("updated {}", plan.display_label());
                    plan.clone()
                }
                None => {
                    db.next_plan_id += 1;
                    let plan = SavingsPlan {
                        id: db.next_plan_id,
                        target_amount: fields.target_amount,
                        target_date: fields.target_date,
                        monthly_suggestion: fields.monthly_suggestion,
                        created_at: now,
                        updated_at: now,
                    };
                    db.savings_plans.push(plan.clone());
                    tracing::debug!("inserted {}", plan.display_label());
                    plan
                }
            }
        })
    }
}

impl UserStore for JsonStore {
    fn list_all(&self) -> Result<Vec<User>> {
        self.read(|db| db.users.clone())
    }

    fn find(&self, id: i64) -> Result<Option<User>> {
        self.read(|db| db.users.iter().find(|user| user.id == id).cloned())
    }
}

/// The canonical plan row: most recently created, ties broken by highest
/// id. Reads and upserts both resolve through this single rule.
fn current_plan_index(db: &Database) -> Option<usize> {
    db.savings_plans
        .iter()
        .enumerate()
        .max_by_key(|(_, plan)| (plan.created_at, plan.id))
        .map(|(idx, _)| idx)
}

fn join_user(db: &Database, transaction: Transaction) -> TransactionWithUser {
    let user = db
        .users
        .iter()
        .find(|user| user.id == transaction.user_id)
        .cloned();
    TransactionWithUser { transaction, user }
}

fn seeded_database() -> Database {
    let now = Utc::now();
    let roster = [(1, "rio", "Rio"), (2, "zahra", "Zahra")];
    Database {
        users: roster
            .iter()
            .map(|(id, username, name)| User {
                id: *id,
                username: (*username).into(),
                password: format!("{username}123"),
                name: (*name).into(),
                created_at: now,
                updated_at: now,
            })
            .collect(),
        transactions: Vec::new(),
        savings_plans: Vec::new(),
        next_transaction_id: 0,
        next_plan_id: 0,
    }
}

fn persist(path: &Path, db: &Database) -> Result<()> {
    let data =
        serde_json::to_string_pretty(db).map_err(|err| StoreError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn fresh_store_seeds_roster() {
        let (_dir, store) = open_store();
        let users = UserStore::list_all(&store).unwrap();
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Rio", "Zahra"]);
    }

    #[test]
    fn inserts_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = JsonStore::open(dir.path()).unwrap();
            store
                .insert(NewTransaction {
                    user_id: 1,
                    amount: 500,
                    image_url: None,
                    notes: Some("first".into()),
                })
                .unwrap();
        }
        let store = JsonStore::open(dir.path()).unwrap();
        let all = TransactionStore::list_all(&store).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount, 500);
        assert_eq!(all[0].id, 1);
    }

    #[test]
    fn listing_joins_users_newest_first() {
        let (_dir, store) = open_store();
        for (user_id, amount) in [(1, 100), (2, 300), (1, 50)] {
            store
                .insert(NewTransaction {
                    user_id,
                    amount,
                    image_url: None,
                    notes: None,
                })
                .unwrap();
        }
        let rows = store.list_with_user(None).unwrap();
        assert_eq!(rows.len(), 3);
        // Same creation instant is possible here; ids break the tie.
        assert_eq!(rows[0].transaction.id, 3);
        assert_eq!(rows[0].user_name(), "Rio");
        assert_eq!(rows[1].user_name(), "Zahra");

        let limited = store.list_with_user(Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn upsert_inserts_then_updates_in_place() {
        let (_dir, store) = open_store();
        let date = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();

        let first = store
            .upsert(PlanFields {
                target_amount: 1_000_000,
                target_date: date,
                monthly_suggestion: 100_000,
            })
            .unwrap();
        let second = store
            .upsert(PlanFields {
                target_amount: 2_000_000,
                target_date: date,
                monthly_suggestion: 200_000,
            })
            .unwrap();

        assert_eq!(first.id, second.id);
        let current = store.most_recent().unwrap().unwrap();
        assert_eq!(current.target_amount, 2_000_000);
        assert_eq!(current.created_at, first.created_at);
    }

    #[test]
    fn failed_write_leaves_no_trace_in_memory() {
        let (dir, store) = open_store();
        // Force the atomic rename to fail by occupying the database path
        // with a non-empty directory.
        let db_path = dir.path().join("database.json");
        fs::remove_file(&db_path).unwrap();
        fs::create_dir(&db_path).unwrap();
        fs::write(db_path.join("occupied"), b"x").unwrap();

        let err = store
            .insert(NewTransaction {
                user_id: 1,
                amount: 500,
                image_url: None,
                notes: None,
            })
            .expect_err("persist onto a directory must fail");
        assert!(matches!(err, StoreError::Io(_)), "got {err:?}");
        // The rejected row must not linger; resubmitting later must not
        // duplicate it.
        assert!(TransactionStore::list_all(&store).unwrap().is_empty());

        let err = store
            .upsert(PlanFields {
                target_amount: 1_000,
                target_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                monthly_suggestion: 100,
            })
            .expect_err("persist onto a directory must fail");
        assert!(matches!(err, StoreError::Io(_)), "got {err:?}");
        assert!(store.most_recent().unwrap().is_none());
    }

    #[test]
    fn missing_plan_reads_as_none() {
        let (_dir, store) = open_store();
        assert!(store.most_recent().unwrap().is_none());
    }

    #[test]
    fn list_by_user_filters_rows() {
        let (_dir, store) = open_store();
        for (user_id, amount) in [(1, 100), (2, 300), (1, 50)] {
            store
                .insert(NewTransaction {
                    user_id,
                    amount,
                    image_url: None,
                    notes: None,
                })
                .unwrap();
        }
        let rio = store.list_by_user(1).unwrap();
        assert_eq!(rio.iter().map(|tx| tx.amount).sum::<i64>(), 150);
        assert!(store.list_by_user(99).unwrap().is_empty());
    }
}
