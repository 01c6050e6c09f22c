//! Request value objects crossing the crate boundary.

pub mod auth;

pub use auth::{
    ChangePasswordRequest, ExternalIdentity, LoginRequest, RegisterRequest, UpdateProfileRequest,
};
