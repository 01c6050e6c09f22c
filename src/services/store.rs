use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::models::User;
use crate::services::{RepositoryError, ServiceError, TtlCache, UserRepository};

/// Where a looked-up record came from. A cache-sourced record may be stale
/// relative to the repository, so write-back paths must still round-trip to
/// the repository regardless of the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    Cache,
    Repository,
}

/// A user record together with its source of record.
#[derive(Debug, Clone)]
pub struct UserLookup {
    pub user: User,
    pub source: RecordSource,
}

/// Cache-aside façade over the user repository.
///
/// Exclusively owns cache key construction and invalidation: reads consult
/// the cache first and repopulate the looked-up key from the repository on a
/// miss; every write commits to the repository and then deletes *both*
/// derived keys for the affected user, so the next read of either key
/// repopulates from the authoritative store. Nothing else in the crate
/// touches the cache.
#[derive(Clone)]
pub struct CredentialStore {
    repo: Arc<dyn UserRepository>,
    cache: TtlCache<User>,
    ttl: Duration,
}

fn id_key(id: Uuid) -> String {
    format!("user:id:{}", id)
}

fn email_key(email: &str) -> String {
    format!("user:email:{}", email)
}

impl CredentialStore {
    pub fn new(repo: Arc<dyn UserRepository>, cache: TtlCache<User>, ttl: Duration) -> Self {
        Self { repo, cache, ttl }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserLookup>, ServiceError> {
        let key = id_key(id);
        if let Some(user) = self.cache.get(&key) {
            return Ok(Some(UserLookup {
                user,
                source: RecordSource::Cache,
            }));
        }

        let found = self.repo.find_by_id(id).await.map_err(repo_fault)?;
        Ok(found.map(|user| {
            self.cache.set(key, user.clone(), self.ttl);
            UserLookup {
                user,
                source: RecordSource::Repository,
            }
        }))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserLookup>, ServiceError> {
        let key = email_key(email);
        if let Some(user) = self.cache.get(&key) {
            return Ok(Some(UserLookup {
                user,
                source: RecordSource::Cache,
            }));
        }

        let found = self.repo.find_by_email(email).await.map_err(repo_fault)?;
        Ok(found.map(|user| {
            self.cache.set(key, user.clone(), self.ttl);
            UserLookup {
                user,
                source: RecordSource::Repository,
            }
        }))
    }

    /// External-id lookups have no cache namespace; they always hit the
    /// repository.
    pub async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, ServiceError> {
        self.repo
            .find_by_external_id(external_id)
            .await
            .map_err(repo_fault)
    }

    /// Create a new record. The cache is not primed; the first read
    /// repopulates it. A `DuplicateEmail` from the store's unique constraint
    /// surfaces as `UserExists`.
    pub async fn create(&self, user: User) -> Result<User, ServiceError> {
        let user = self.repo.create(user).await.map_err(|e| match e {
            dup @ RepositoryError::DuplicateEmail(_) => ServiceError::from(dup),
            other => repo_fault(other),
        })?;
        Ok(user)
    }

    /// Commit a mutated record and invalidate both of its cache keys.
    pub async fn update(&self, user: &User) -> Result<(), ServiceError> {
        self.repo.save(user).await.map_err(repo_fault)?;
        self.invalidate(user);
        Ok(())
    }

    /// Delete both derived keys for `user`. Invalidation removes entries
    /// rather than refreshing them, forcing the next read to repopulate from
    /// the repository.
    pub fn invalidate(&self, user: &User) {
        self.cache.delete(&id_key(user.id));
        self.cache.delete(&email_key(&user.email));
    }
}

fn repo_fault(err: RepositoryError) -> ServiceError {
    tracing::error!(error = %err, "Repository call failed");
    ServiceError::from(err)
}
