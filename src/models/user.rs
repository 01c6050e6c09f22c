//! User model - locally and/or externally authenticated accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dtos::ExternalIdentity;
use crate::utils::{verify_password, Password, PasswordHashString};

/// User entity.
///
/// A record is locally authenticated (has a password hash), externally
/// authenticated (has an external identity id), or both. Records are never
/// hard-deleted; deactivation flips `is_active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 hash of the local credential. `None` for external-identity-only
    /// accounts. Never serialized into responses.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    /// Role name. A reference into the role set, not an embedded object.
    pub role: String,
    /// Identity id vouched for by an external provider, if linked.
    pub external_id: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a locally authenticated user.
    pub fn new(
        email: String,
        password_hash: Option<PasswordHashString>,
        first_name: String,
        last_name: String,
        role: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            first_name,
            last_name,
            password_hash: password_hash.map(PasswordHashString::into_string),
            role,
            external_id: None,
            avatar_url: None,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an active, passwordless user from a verified external identity.
    pub fn from_external(identity: &ExternalIdentity, role: String) -> Self {
        let mut user = Self::new(
            identity.email.clone(),
            None,
            identity.first_name.clone(),
            identity.last_name.clone(),
            role,
        );
        user.external_id = Some(identity.external_id.clone());
        user.avatar_url = identity.avatar_url.clone();
        user
    }

    /// Verify a candidate password against the local credential.
    ///
    /// An account without a local credential rejects every candidate.
    pub fn verify_password(&self, candidate: &str) -> bool {
        match &self.password_hash {
            Some(hash) => verify_password(
                &Password::new(candidate.to_string()),
                &PasswordHashString::new(hash.clone()),
            ),
            None => false,
        }
    }

    /// Replace the local credential.
    pub fn set_password(&mut self, hash: PasswordHashString) {
        self.password_hash = Some(hash.into_string());
        self.updated_at = Utc::now();
    }

    /// Attach an external identity to an existing record. Fills in the avatar
    /// from the provider when the record has none.
    pub fn link_external_identity(&mut self, identity: &ExternalIdentity) {
        self.external_id = Some(identity.external_id.clone());
        if self.avatar_url.is_none() {
            self.avatar_url = identity.avatar_url.clone();
        }
        self.updated_at = Utc::now();
    }

    /// Record a successful authentication.
    pub fn touch_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Convert to a sanitized response (no credential material).
    pub fn sanitized(&self) -> UserResponse {
        UserResponse::from(self)
    }
}

/// User view returned to callers (without sensitive fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub avatar_url: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            role: u.role.clone(),
            avatar_url: u.avatar_url.clone(),
        }
    }
}

/// Successful authentication result: user view plus an issued token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}
