use crate::dtos::{
    ChangePasswordRequest, ExternalIdentity, LoginRequest, RegisterRequest, UpdateProfileRequest,
};
use crate::models::{AuthResponse, User, UserResponse};
use crate::services::{Claims, CredentialStore, JwtService, ServiceError};
use crate::utils::{hash_password, Password};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 8;

/// Auth orchestrator: composes the credential store and the token service
/// into the five business transactions external callers invoke.
///
/// Each transaction is side-effecting only once every guard has passed;
/// business failures are returned, never logged as errors. The orchestrator
/// never touches the cache directly; invalidation belongs to the store.
#[derive(Clone)]
pub struct AuthService {
    store: CredentialStore,
    jwt: JwtService,
    default_role: String,
}

impl AuthService {
    pub fn new(store: CredentialStore, jwt: JwtService, default_role: String) -> Self {
        Self {
            store,
            jwt,
            default_role,
        }
    }

    /// Register a new locally authenticated user and mint a session token.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, ServiceError> {
        validate_email(&req.email)?;
        validate_password(&req.password)?;

        // Cache-aside existence check; an optimization only. The repository's
        // unique constraint is the authority under concurrent registration.
        if self.store.find_by_email(&req.email).await?.is_some() {
            return Err(ServiceError::UserExists);
        }

        let hash = hash_password(&Password::new(req.password))?;
        let user = User::new(
            req.email,
            Some(hash),
            req.first_name,
            req.last_name,
            self.default_role.clone(),
        );

        let user = self.store.create(user).await?;
        tracing::info!(user_id = %user.id, "User registered");

        self.respond_with_token(user)
    }

    /// Authenticate with email and password.
    ///
    /// Unknown email, missing local credential, and password mismatch all
    /// yield the same `InvalidCredentials`, so callers cannot enumerate
    /// accounts. The last-login write-back always round-trips to the
    /// repository, even when the record was served from cache.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, ServiceError> {
        let Some(lookup) = self.store.find_by_email(&req.email).await? else {
            return Err(ServiceError::InvalidCredentials);
        };
        let mut user = lookup.user;

        if !user.verify_password(&req.password) {
            return Err(ServiceError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(ServiceError::AccountDisabled);
        }

        tracing::debug!(user_id = %user.id, source = ?lookup.source, "Credential record resolved");

        user.touch_login();
        self.store.update(&user).await?;
        tracing::info!(user_id = %user.id, "User logged in");

        self.respond_with_token(user)
    }

    /// Authenticate with an identity already verified by an external
    /// provider: match by external id, else link by email, else create a
    /// passwordless active user. Always refreshes last-login.
    pub async fn login_with_external_identity(
        &self,
        identity: ExternalIdentity,
    ) -> Result<AuthResponse, ServiceError> {
        let existing = match self.store.find_by_external_id(&identity.external_id).await? {
            Some(user) => Some(user),
            None => self
                .store
                .find_by_email(&identity.email)
                .await?
                .map(|lookup| {
                    let mut user = lookup.user;
                    user.link_external_identity(&identity);
                    user
                }),
        };

        let user = match existing {
            Some(mut user) => {
                if !user.is_active {
                    return Err(ServiceError::AccountDisabled);
                }
                user.touch_login();
                self.store.update(&user).await?;
                tracing::info!(user_id = %user.id, "User logged in via external identity");
                user
            }
            None => {
                let mut user = User::from_external(&identity, self.default_role.clone());
                user.touch_login();
                let user = self.store.create(user).await?;
                tracing::info!(user_id = %user.id, "User created from external identity");
                user
            }
        };

        self.respond_with_token(user)
    }

    /// Change the local credential. Invalidates the user's cache entries via
    /// the store so stale records cannot satisfy later logins.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        req: ChangePasswordRequest,
    ) -> Result<(), ServiceError> {
        let Some(lookup) = self.store.find_by_id(user_id).await? else {
            return Err(ServiceError::NotFound);
        };
        let mut user = lookup.user;

        if !user.verify_password(&req.current_password) {
            return Err(ServiceError::InvalidCredentials);
        }

        validate_password(&req.new_password)?;

        let hash = hash_password(&Password::new(req.new_password))?;
        user.set_password(hash);
        self.store.update(&user).await?;
        tracing::info!(user_id = %user.id, "Password changed");

        Ok(())
    }

    /// Apply only the supplied profile fields and return the updated view.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<UserResponse, ServiceError> {
        let Some(lookup) = self.store.find_by_id(user_id).await? else {
            return Err(ServiceError::NotFound);
        };
        let mut user = lookup.user;

        if let Some(first_name) = req.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = req.last_name {
            user.last_name = last_name;
        }
        if let Some(avatar_url) = req.avatar_url {
            user.avatar_url = Some(avatar_url);
        }

        self.store.update(&user).await?;
        tracing::info!(user_id = %user.id, "Profile updated");

        Ok(user.sanitized())
    }

    /// Verify a bearer token. Both rejection reasons are terminal for the
    /// current request; they stay distinguishable for logging.
    pub fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        self.jwt.verify(token)
    }

    fn respond_with_token(&self, user: User) -> Result<AuthResponse, ServiceError> {
        let token = self.jwt.issue(&user)?;
        Ok(AuthResponse {
            user: user.sanitized(),
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry_seconds(),
        })
    }
}

fn validate_email(email: &str) -> Result<(), ServiceError> {
    if email.is_empty() || !email.contains('@') {
        return Err(ServiceError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ServiceError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
