//! In-process auth gateway used until the console backend exists.
//!
//! Accepts exactly one credential pair, signs up anyone, and pretends to
//! send reset emails. Each call sleeps for the configured latency so UI
//! loading states behave as they would against a network.

use std::fmt::Write;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use super::AuthGateway;
use crate::error::AuthError;
use crate::session::persist::SessionPersistence;
use crate::types::{AuthSession, RegisterRequest, ResetNotice, Role, User, UserPatch, now};

/// The one email the mock accepts.
pub const DEMO_EMAIL: &str = "admin@barbershop.com";
/// Password paired with [`DEMO_EMAIL`].
pub const DEMO_PASSWORD: &str = "admin123";

fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate an opaque `mock-token-<hex>` bearer token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    format!("mock-token-{}", bytes_to_hex(&bytes))
}

fn demo_admin() -> User {
    let ts = now();
    User {
        id: "1".to_owned(),
        name: "João Silva".to_owned(),
        email: DEMO_EMAIL.to_owned(),
        phone: "(11) 99999-9999".to_owned(),
        role: Role::Admin,
        avatar: None,
        created_at: ts,
        updated_at: ts,
    }
}

pub struct MockAuthGateway {
    persistence: SessionPersistence,
    latency: Duration,
}

impl MockAuthGateway {
    #[must_use]
    pub fn new(persistence: SessionPersistence, latency: Duration) -> Self {
        Self { persistence, latency }
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn issue_token(&self, user: User) -> Result<AuthSession, AuthError> {
        let token = generate_token();
        self.persistence
            .set_token(&token)
            .map_err(|e| AuthError::Gateway(e.to_string()))?;
        Ok(AuthSession { user, token })
    }
}

#[async_trait::async_trait]
impl AuthGateway for MockAuthGateway {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.round_trip().await;
        if email != DEMO_EMAIL || password != DEMO_PASSWORD {
            debug!(%email, "mock login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        self.issue_token(demo_admin())
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, AuthError> {
        self.round_trip().await;
        let ts = now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            role: request.role.unwrap_or_default(),
            avatar: None,
            created_at: ts,
            updated_at: ts,
        };
        self.issue_token(user)
    }

    async fn forgot_password(&self, email: &str) -> Result<ResetNotice, AuthError> {
        self.round_trip().await;
        info!(%email, "mock password reset email sent");
        Ok(ResetNotice { message: "Password reset email sent".to_owned() })
    }

    async fn update_profile(&self, current: &User, patch: &UserPatch) -> Result<User, AuthError> {
        self.round_trip().await;
        if self.persistence.token().is_none() {
            return Err(AuthError::Unauthorized);
        }
        let mut user = current.clone();
        user.apply_patch(patch);
        Ok(user)
    }

    fn logout(&self) {
        self.persistence.clear_token();
    }
}

#[cfg(test)]
#[path = "mock_test.rs"]
mod tests;
