use std::sync::Arc;
use std::time::Duration;

use auth_core::config::JwtConfig;
use auth_core::services::{
    AuthService, CredentialStore, JwtService, MemoryUserRepository, TtlCache,
};
use auth_core::RegisterRequest;

/// Fully wired service graph over the in-memory repository, with handles to
/// the store and repository so tests can observe cache and store state.
pub struct TestHarness {
    pub auth: AuthService,
    pub store: CredentialStore,
    pub repo: Arc<MemoryUserRepository>,
}

pub fn setup() -> TestHarness {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter("error")
        .with_test_writer()
        .try_init();

    let repo = Arc::new(MemoryUserRepository::new());
    let store = CredentialStore::new(
        repo.clone() as Arc<dyn auth_core::UserRepository>,
        TtlCache::new(),
        Duration::from_secs(300),
    );
    let jwt = JwtService::new(&JwtConfig {
        secret: "integration-test-secret-0123456789abcdef".to_string(),
        access_token_expiry_minutes: 15,
    });
    let auth = AuthService::new(store.clone(), jwt, "user".to_string());

    TestHarness { auth, store, repo }
}

pub fn register_request(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: password.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
    }
}
