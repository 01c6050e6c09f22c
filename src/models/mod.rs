//! Domain models for the credential core.

pub mod role;
pub mod user;

pub use role::{Permission, PermissionAction, Role};
pub use user::{AuthResponse, User, UserResponse};
