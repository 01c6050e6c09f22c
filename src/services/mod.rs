//! Services layer for the credential core.
//!
//! Leaf components (cache, token service, repository capability) plus the
//! cache-aside credential store, the permission resolver, and the auth
//! orchestrator that external callers invoke.

mod auth;
mod cache;
pub mod error;
mod jwt;
mod permissions;
mod repository;
mod store;

pub use auth::AuthService;
pub use cache::TtlCache;
pub use error::ServiceError;
pub use jwt::{Claims, JwtService};
pub use permissions::{effective_permissions, RoleSet};
pub use repository::{MemoryUserRepository, RepositoryError, UserRepository};
pub use store::{CredentialStore, RecordSource, UserLookup};
