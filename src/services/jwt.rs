use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::models::User;
use crate::services::ServiceError;

/// JWT service for session token issuance and verification.
///
/// Tokens are self-contained and stateless: there is no revocation list, so a
/// token stays valid until its encoded expiry.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry_minutes: i64,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl JwtService {
    /// Create a new JWT service from the configured HS256 secret.
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
        }
    }

    /// Issue a session token for `user` with the configured lifetime.
    pub fn issue(&self, user: &User) -> Result<String, ServiceError> {
        self.issue_with_lifetime(user, Duration::minutes(self.access_token_expiry_minutes))
    }

    /// Issue a session token with an explicit lifetime.
    pub fn issue_with_lifetime(
        &self,
        user: &User,
        lifetime: Duration,
    ) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Failed to encode token: {}", e)))
    }

    /// Verify a token and return its claims.
    ///
    /// `TokenExpired` and `InvalidToken` are distinguished so callers can log
    /// them apart; both are terminal for the current request.
    pub fn verify(&self, token: &str) -> Result<Claims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: a token is rejected the moment its expiry passes.
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                Err(ServiceError::TokenExpired)
            }
            Err(_) => Err(ServiceError::InvalidToken),
        }
    }

    /// Configured token lifetime in seconds (for client info).
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }
}
