//! Session state and its transitions.
//!
//! Every transition keeps `is_authenticated` and `user` in lockstep; the store
//! applies exactly one of these per settled operation.

use serde::{Deserialize, Serialize};

use crate::types::User;

/// Authentication state for the current console user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
    #[serde(skip)]
    in_flight: u32,
}

/// The subset of [`SessionState`] that survives a restart.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

impl PersistedSession {
    /// Drop any half-authenticated pairing. A user without the flag, or the
    /// flag without a user, both load as signed out.
    #[must_use]
    pub fn normalized(self) -> Self {
        match (self.user, self.is_authenticated) {
            (Some(user), true) => Self { user: Some(user), is_authenticated: true },
            _ => Self::default(),
        }
    }
}

impl SessionState {
    /// Seed a fresh state from a persisted snapshot. `loading` and `error`
    /// always start cleared.
    #[must_use]
    pub fn restore(snapshot: PersistedSession) -> Self {
        let snapshot = snapshot.normalized();
        Self { user: snapshot.user, is_authenticated: snapshot.is_authenticated, ..Self::default() }
    }

    #[must_use]
    pub fn snapshot(&self) -> PersistedSession {
        PersistedSession { user: self.user.clone(), is_authenticated: self.is_authenticated }
    }

    #[must_use]
    pub fn role(&self) -> Option<crate::types::Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Operation started.
    pub(crate) fn begin(&mut self) {
        self.in_flight = self.in_flight.saturating_add(1);
        self.loading = true;
        self.error = None;
    }

    fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
    }

    /// Login or register succeeded.
    pub(crate) fn signed_in(&mut self, user: User) {
        self.settle();
        self.user = Some(user);
        self.is_authenticated = true;
        self.error = None;
    }

    /// Login or register failed. Whoever was signed in is no longer trusted.
    pub(crate) fn sign_in_failed(&mut self, message: String) {
        self.settle();
        self.user = None;
        self.is_authenticated = false;
        self.error = Some(message);
    }

    /// Profile update accepted by the gateway.
    pub(crate) fn profile_updated(&mut self, user: User) {
        self.settle();
        if self.is_authenticated {
            self.user = Some(user);
        }
    }

    /// Operation finished without touching identity.
    pub(crate) fn completed(&mut self) {
        self.settle();
    }

    /// Operation failed without touching identity.
    pub(crate) fn failed(&mut self, message: String) {
        self.settle();
        self.error = Some(message);
    }

    /// Logout or expired session. In-flight bookkeeping is left alone so a
    /// pending operation still settles `loading` correctly.
    pub(crate) fn signed_out(&mut self) {
        self.user = None;
        self.is_authenticated = false;
        self.error = None;
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
