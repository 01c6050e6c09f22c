use std::env;

use anyhow::{anyhow, Context};

/// Top-level configuration for the credential core.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
    pub cache: CacheConfig,
    /// Role assigned to newly created users.
    pub default_role: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret. Supplied at construction, never persisted.
    pub secret: String,
    pub access_token_expiry_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub user_ttl_seconds: u64,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = AuthConfig {
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET", None)?,
                access_token_expiry_minutes: get_env(
                    "JWT_ACCESS_TOKEN_EXPIRY_MINUTES",
                    Some("15"),
                )?
                .parse()
                .context("JWT_ACCESS_TOKEN_EXPIRY_MINUTES must be an integer")?,
            },
            cache: CacheConfig {
                user_ttl_seconds: get_env("USER_CACHE_TTL_SECONDS", Some("300"))?
                    .parse()
                    .context("USER_CACHE_TTL_SECONDS must be an integer")?,
            },
            default_role: get_env("DEFAULT_ROLE", Some("user"))?,
        };

        Ok(config)
    }
}

/// Read an environment variable, falling back to `default` when unset or empty.
/// Variables without a default are required.
fn get_env(name: &str, default: Option<&str>) -> Result<String, anyhow::Error> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => default
            .map(str::to_string)
            .ok_or_else(|| anyhow!("missing required environment variable: {}", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_prefers_default_when_unset() {
        let value = get_env("AUTH_CORE_TEST_UNSET_VARIABLE", Some("fallback")).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_get_env_required_missing_fails() {
        assert!(get_env("AUTH_CORE_TEST_UNSET_VARIABLE", None).is_err());
    }
}
