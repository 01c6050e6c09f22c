use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::User;

/// Errors surfaced by the repository capability.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store's unique constraint on email fired. This is the
    /// authoritative uniqueness guarantee; cache-aside existence checks are
    /// an optimization only.
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persistent store capability consumed by the credential store.
///
/// `save` is an idempotent upsert of an already-identified record with
/// last-write-wins semantics. The core never retries a failed call; faults
/// propagate to the orchestrator.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, RepositoryError>;
    async fn create(&self, user: User) -> Result<User, RepositoryError>;
    async fn save(&self, user: &User) -> Result<(), RepositoryError>;
}

/// In-memory repository backed by a map.
///
/// Enforces the unique email constraint the way a real store would, which
/// makes it suitable as the test double for every integration test.
pub struct MemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored records.
    pub fn user_count(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Backend(anyhow::anyhow!("User map mutex poisoned"))
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().map_err(lock_poisoned)?;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().map_err(lock_poisoned)?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().map_err(lock_poisoned)?;
        Ok(users
            .values()
            .find(|u| u.external_id.as_deref() == Some(external_id))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().map_err(lock_poisoned)?;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::DuplicateEmail(user.email));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().map_err(lock_poisoned)?;
        // Last write wins.
        users.insert(user.id, user.clone());
        Ok(())
    }
}
