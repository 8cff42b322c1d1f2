use crate::error::{AuthError, StoreError};
use crate::models::UserRecord;
use crate::password::{hash_cost, PasswordHasher};
use std::collections::HashMap;
use std::path::Path;

pub const DEMO_USERNAME: &str = "user@example.com";
pub const DEMO_PASSWORD: &str = "password";

/// Read-only lookup of accounts by exact, case-sensitive username.
pub trait CredentialStore: Send + Sync {
    fn lookup(&self, username: &str) -> Option<UserRecord>;
}

fn index(records: Vec<UserRecord>) -> Result<HashMap<String, UserRecord>, StoreError> {
    let mut users = HashMap::with_capacity(records.len());
    for record in records {
        if users.contains_key(&record.username) {
            return Err(StoreError::DuplicateUser(record.username));
        }
        users.insert(record.username.clone(), record);
    }
    Ok(users)
}

#[derive(Debug)]
pub struct InMemoryStore {
    users: HashMap<String, UserRecord>,
}

impl InMemoryStore {
    pub fn new(records: Vec<UserRecord>) -> Result<Self, StoreError> {
        Ok(Self {
            users: index(records)?,
        })
    }

    /// Seeds the single demo account, hashing its password with `hasher`.
    pub fn with_demo_user(hasher: &PasswordHasher) -> Result<Self, AuthError> {
        let record = UserRecord {
            username: DEMO_USERNAME.to_string(),
            password_hash: hasher.hash(DEMO_PASSWORD)?,
        };
        Ok(Self {
            users: HashMap::from([(record.username.clone(), record)]),
        })
    }
}

impl CredentialStore for InMemoryStore {
    fn lookup(&self, username: &str) -> Option<UserRecord> {
        self.users.get(username).cloned()
    }
}

/// Accounts loaded once from a JSON file of `{username, password_hash}`
/// records. The file is never written.
#[derive(Debug)]
pub struct FileStore {
    users: HashMap<String, UserRecord>,
}

impl FileStore {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().display().to_string();
        let raw = tokio::fs::read(&path).await.map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let records: Vec<UserRecord> =
            serde_json::from_slice(&raw).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?;

        let users = index(records)?;
        tracing::info!(path = %path, users = users.len(), "loaded user file");
        Ok(Self { users })
    }

    /// Usernames whose stored hash does not use `cost`. Unknown-user logins
    /// are timed against a hash of `cost`, so these accounts make the two
    /// failure paths take different time.
    pub fn users_with_other_cost(&self, cost: u32) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .users
            .values()
            .filter(|user| hash_cost(&user.password_hash) != Some(cost))
            .map(|user| user.username.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl CredentialStore for FileStore {
    fn lookup(&self, username: &str) -> Option<UserRecord> {
        self.users.get(username).cloned()
    }
}
