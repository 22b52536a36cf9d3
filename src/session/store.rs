//! Session store: single source of truth for who is signed in.
//!
//! DESIGN
//! ======
//! State lives in a `tokio::sync::watch` channel: readers subscribe or take
//! a snapshot, and only the store writes. Each operation applies one
//! `begin` transition, awaits the gateway, then applies one settling
//! transition. Both happen inside `send_modify`, so no reader ever sees a
//! partially updated state.
//!
//! Whenever the `{user, isAuthenticated}` pair changes, the snapshot is
//! captured inside `send_modify` and written once the watch lock is
//! released. A separate write lock spans both steps so snapshot writes land
//! in the same order as the transitions that produced them.
//!
//! TRADE-OFFS
//! ==========
//! Overlapping operations are not queued. Whichever resolves last decides
//! `user`/`error`; `loading` is counted so it only drops once every
//! in-flight operation has settled.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use super::notify::{Notification, Notifier};
use super::persist::SessionPersistence;
use super::state::SessionState;
use crate::error::{AuthError, ValidationError};
use crate::gateway::AuthGateway;
use crate::types::{RegisterRequest, UserPatch};
use crate::validate;

const LOGIN_OK: &str = "Signed in successfully";
const LOGIN_FAILED: &str = "Login failed";
const REGISTER_OK: &str = "Account created successfully";
const REGISTER_FAILED: &str = "Registration failed";
const LOGOUT_OK: &str = "Signed out successfully";
const RESET_OK: &str = "Password reset email sent";
const RESET_FAILED: &str = "Failed to send reset email";
const PROFILE_OK: &str = "Profile updated successfully";
const PROFILE_FAILED: &str = "Profile update failed";
const SESSION_EXPIRED: &str = "Session expired, please sign in again";

struct Inner {
    state: watch::Sender<SessionState>,
    gateway: Arc<dyn AuthGateway>,
    persistence: SessionPersistence,
    notifier: Notifier,
    write_lock: Mutex<()>,
}

/// Subscribable authentication state container. Cheap to clone; clones share
/// one state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

fn failure_message(err: &AuthError, default: &str) -> String {
    err.user_message()
        .unwrap_or_else(|| default.to_owned())
}

impl SessionStore {
    /// Build a store seeded from whatever `persistence` has saved.
    #[must_use]
    pub fn new(gateway: Arc<dyn AuthGateway>, persistence: SessionPersistence) -> Self {
        let initial = SessionState::restore(persistence.load());
        info!(authenticated = initial.is_authenticated, "session restored");
        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                state,
                gateway,
                persistence,
                notifier: Notifier::new(),
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every applied transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Receiver for success/failure toasts.
    #[must_use]
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.inner.notifier.subscribe()
    }

    fn apply(&self, transition: impl FnOnce(&mut SessionState)) {
        let _write = self
            .inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut changed = None;
        self.inner.state.send_modify(|state| {
            let before = state.snapshot();
            transition(state);
            let after = state.snapshot();
            if after != before {
                changed = Some(after);
            }
        });
        if let Some(snapshot) = changed {
            self.inner.persistence.save_logged(&snapshot);
        }
    }

    fn succeed(&self, op: &'static str, message: &str) {
        info!(op, "session operation succeeded");
        self.inner.notifier.emit(Notification::success(message));
    }

    fn fail(&self, op: &'static str, err: &AuthError, message: &str) {
        warn!(op, code = err.code(), error = %err, "session operation failed");
        self.inner.notifier.emit(Notification::error(message));
    }

    /// Sign in with an email/password pair.
    pub async fn login(&self, email: &str, password: &str) {
        self.apply(SessionState::begin);
        let result = match validate::login(email, password) {
            Ok(email) => self.inner.gateway.login(&email, password).await,
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(session) => {
                self.apply(|s| s.signed_in(session.user));
                self.succeed("login", LOGIN_OK);
            }
            Err(e) => {
                let message = failure_message(&e, LOGIN_FAILED);
                self.apply(|s| s.sign_in_failed(message.clone()));
                self.fail("login", &e, &message);
            }
        }
    }

    /// Create an account and sign it in immediately.
    pub async fn register(&self, request: RegisterRequest) {
        self.apply(SessionState::begin);
        let result = match validate::register(&request) {
            Ok(request) => self.inner.gateway.register(&request).await,
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(session) => {
                self.apply(|s| s.signed_in(session.user));
                self.succeed("register", REGISTER_OK);
            }
            Err(e) => {
                let message = failure_message(&e, REGISTER_FAILED);
                self.apply(|s| s.sign_in_failed(message.clone()));
                self.fail("register", &e, &message);
            }
        }
    }

    /// Sign out. Never fails.
    pub fn logout(&self) {
        self.inner.gateway.logout();
        self.apply(SessionState::signed_out);
        self.succeed("logout", LOGOUT_OK);
    }

    /// Reset after the gateway rejected our token. The HTTP adapter has
    /// already cleared the medium; this brings in-memory state in line.
    /// A profile update rejected as unauthorized lands here too.
    pub fn expire(&self) {
        self.inner.persistence.clear_token();
        self.apply(SessionState::signed_out);
        warn!("session expired");
        self.inner.notifier.emit(Notification::error(SESSION_EXPIRED));
    }

    /// Ask for a password reset email. Identity is never touched.
    pub async fn forgot_password(&self, email: &str) {
        self.apply(SessionState::begin);
        let result = match validate::forgot_password(email) {
            Ok(email) => self.inner.gateway.forgot_password(&email).await,
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(notice) => {
                info!(detail = %notice.message, "password reset requested");
                self.apply(SessionState::completed);
                self.succeed("forgot_password", RESET_OK);
            }
            Err(e) => {
                let message = failure_message(&e, RESET_FAILED);
                self.apply(|s| s.failed(message.clone()));
                self.fail("forgot_password", &e, &message);
            }
        }
    }

    /// Merge `patch` into the signed-in user's profile.
    pub async fn update_profile(&self, patch: UserPatch) {
        self.apply(SessionState::begin);
        let current = self.inner.state.borrow().user.clone();
        let result = match (current, validate::profile_patch(&patch)) {
            (None, _) => Err(AuthError::from(ValidationError::NoActiveSession)),
            (Some(_), Err(e)) => Err(e.into()),
            (Some(user), Ok(patch)) => {
                self.inner
                    .gateway
                    .update_profile(&user, &patch)
                    .await
            }
        };
        match result {
            Ok(user) => {
                self.apply(|s| s.profile_updated(user));
                self.succeed("update_profile", PROFILE_OK);
            }
            Err(AuthError::Unauthorized) => {
                self.apply(SessionState::completed);
                self.expire();
            }
            Err(e) => {
                let message = failure_message(&e, PROFILE_FAILED);
                self.apply(|s| s.failed(message.clone()));
                self.fail("update_profile", &e, &message);
            }
        }
    }

    /// Drop the last error message.
    pub fn clear_error(&self) {
        self.apply(SessionState::clear_error);
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
