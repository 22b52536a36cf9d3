//! Auth gateway: the session store's only collaborator.
//!
//! DESIGN
//! ======
//! The store talks to a `dyn AuthGateway` so the mock used during
//! development and the HTTP client for the real backend are swappable at
//! the composition root. Gateways own the bearer token: they write it on a
//! successful credential exchange and remove it on logout.

pub mod http;
pub mod mock;

use crate::error::AuthError;
use crate::types::{AuthSession, RegisterRequest, ResetNotice, User, UserPatch};

pub use http::{ApiClient, HttpAuthGateway, UnauthorizedSignal};
pub use mock::MockAuthGateway;

/// Provider-neutral credential and profile operations. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange an email/password pair for a user and token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for a rejected pair, or
    /// [`AuthError::Gateway`] for transport and backend failures.
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Create an identity and sign it in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Gateway`] if the backend refuses the sign-up.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, AuthError>;

    /// Trigger an out-of-band password reset message.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Gateway`] if the request cannot be delivered.
    async fn forgot_password(&self, email: &str) -> Result<ResetNotice, AuthError>;

    /// Apply `patch` to the signed-in user's profile and return the merged user.
    ///
    /// `current` is the store's view of the user; a remote backend may ignore
    /// it and resolve identity from the bearer token instead.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] if the token was rejected, or
    /// [`AuthError::Gateway`] for other failures.
    async fn update_profile(&self, current: &User, patch: &UserPatch) -> Result<User, AuthError>;

    /// Invalidate the locally stored token. Never fails.
    fn logout(&self);
}
