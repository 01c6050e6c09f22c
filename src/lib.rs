//! Credential and authorization engine.
//!
//! The crate owns three concerns and the orchestrator that composes them:
//!
//! - session tokens: signed, self-contained bearer tokens ([`services::JwtService`])
//! - cache-aside user reads with dual-key invalidation ([`services::CredentialStore`])
//! - effective permission resolution over a role-inheritance graph
//!   ([`services::effective_permissions`])
//!
//! Everything outside those concerns (HTTP routing, request validation, the
//! OAuth handshake, the persistent store itself) is an external collaborator.
//! The persistent store is consumed through the [`services::UserRepository`]
//! trait; external identity providers hand over an already-verified
//! [`dtos::ExternalIdentity`].
//!
//! Services are plain objects wired together at startup:
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use auth_core::config::AuthConfig;
//! use auth_core::services::{
//!     AuthService, CredentialStore, JwtService, MemoryUserRepository, TtlCache,
//! };
//!
//! let config = AuthConfig::from_env().expect("config");
//! let repo = Arc::new(MemoryUserRepository::new());
//! let store = CredentialStore::new(
//!     repo,
//!     TtlCache::new(),
//!     Duration::from_secs(config.cache.user_ttl_seconds),
//! );
//! let jwt = JwtService::new(&config.jwt);
//! let auth = AuthService::new(store, jwt, config.default_role.clone());
//! ```

pub mod config;
pub mod dtos;
pub mod models;
pub mod services;
pub mod utils;

pub use dtos::{
    ChangePasswordRequest, ExternalIdentity, LoginRequest, RegisterRequest, UpdateProfileRequest,
};
pub use models::{AuthResponse, Permission, PermissionAction, Role, User, UserResponse};
pub use services::{
    effective_permissions, AuthService, Claims, CredentialStore, JwtService,
    MemoryUserRepository, RecordSource, RoleSet, ServiceError, TtlCache, UserRepository,
};
