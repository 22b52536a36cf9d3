//! Route guard decisions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected view applies the same rule: wait while the session is
//! loading, send anonymous visitors to the login view, and send users
//! lacking the required role back to the dashboard.

use serde::Serialize;
use tokio::sync::watch;

use crate::session::SessionState;
use crate::types::Role;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// What a protected route should do for the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "to", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Session still resolving; show a spinner.
    Wait,
    /// Render the protected content.
    Allow,
    /// Navigate elsewhere, replacing the current history entry.
    Redirect(&'static str),
}

/// Decide whether `state` may see a route that optionally requires `role`.
#[must_use]
pub fn evaluate(state: &SessionState, required_role: Option<Role>) -> GuardDecision {
    if state.loading {
        return GuardDecision::Wait;
    }
    if !state.is_authenticated {
        return GuardDecision::Redirect(LOGIN_PATH);
    }
    match required_role {
        Some(role) if state.role() != Some(role) => GuardDecision::Redirect(DASHBOARD_PATH),
        _ => GuardDecision::Allow,
    }
}

/// Wait until the session settles, then decide.
///
/// Returns [`GuardDecision::Redirect`] to the login view if the store is
/// dropped before it settles.
pub async fn settle(rx: &mut watch::Receiver<SessionState>, required_role: Option<Role>) -> GuardDecision {
    match rx.wait_for(|s| !s.loading).await {
        Ok(state) => evaluate(&state, required_role),
        Err(_) => GuardDecision::Redirect(LOGIN_PATH),
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
