use super::*;
use crate::types::{Role, now};

fn make_user(role: Role) -> User {
    let ts = now();
    User {
        id: "u1".into(),
        name: "Carlos".into(),
        email: "carlos@example.com".into(),
        phone: "11999990000".into(),
        role,
        avatar: None,
        created_at: ts,
        updated_at: ts,
    }
}

fn assert_consistent(state: &SessionState) {
    assert_eq!(state.is_authenticated, state.user.is_some(), "auth flag out of sync: {state:?}");
}

// =============================================================================
// restore / snapshot
// =============================================================================

#[test]
fn default_is_signed_out_and_idle() {
    let state = SessionState::default();
    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[test]
fn restore_keeps_consistent_snapshot() {
    let user = make_user(Role::Barber);
    let state = SessionState::restore(PersistedSession { user: Some(user.clone()), is_authenticated: true });
    assert_eq!(state.user, Some(user));
    assert!(state.is_authenticated);
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[test]
fn restore_drops_user_without_flag() {
    let state = SessionState::restore(PersistedSession { user: Some(make_user(Role::Admin)), is_authenticated: false });
    assert_consistent(&state);
    assert!(state.user.is_none());
}

#[test]
fn restore_drops_flag_without_user() {
    let state = SessionState::restore(PersistedSession { user: None, is_authenticated: true });
    assert_consistent(&state);
    assert!(!state.is_authenticated);
}

#[test]
fn snapshot_excludes_transient_fields() {
    let mut state = SessionState::default();
    state.begin();
    state.sign_in_failed("nope".into());
    let value = serde_json::to_value(state.snapshot()).unwrap();
    assert_eq!(value, serde_json::json!({ "user": null, "isAuthenticated": false }));
}

// =============================================================================
// transitions
// =============================================================================

#[test]
fn begin_sets_loading_and_clears_error() {
    let mut state = SessionState { error: Some("old".into()), ..SessionState::default() };
    state.begin();
    assert!(state.loading);
    assert!(state.error.is_none());
}

#[test]
fn signed_in_settles_authenticated() {
    let mut state = SessionState::default();
    state.begin();
    state.signed_in(make_user(Role::Admin));
    assert!(!state.loading);
    assert!(state.is_authenticated);
    assert_eq!(state.role(), Some(Role::Admin));
    assert_consistent(&state);
}

#[test]
fn sign_in_failed_clears_previous_user() {
    let mut state = SessionState::restore(PersistedSession { user: Some(make_user(Role::Admin)), is_authenticated: true });
    state.begin();
    state.sign_in_failed("Invalid credentials".into());
    assert!(!state.loading);
    assert!(state.user.is_none());
    assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
    assert_consistent(&state);
}

#[test]
fn failed_keeps_identity() {
    let user = make_user(Role::Client);
    let mut state = SessionState::restore(PersistedSession { user: Some(user.clone()), is_authenticated: true });
    state.begin();
    state.failed("Profile update failed".into());
    assert_eq!(state.user, Some(user));
    assert!(state.is_authenticated);
    assert_eq!(state.error.as_deref(), Some("Profile update failed"));
}

#[test]
fn profile_update_after_sign_out_does_not_resurrect_user() {
    let mut state = SessionState::restore(PersistedSession { user: Some(make_user(Role::Client)), is_authenticated: true });
    state.begin();
    state.signed_out();
    state.profile_updated(make_user(Role::Client));
    assert!(state.user.is_none());
    assert_consistent(&state);
}

#[test]
fn loading_stays_true_until_every_operation_settles() {
    let mut state = SessionState::default();
    state.begin();
    state.begin();
    state.completed();
    assert!(state.loading);
    state.signed_in(make_user(Role::Admin));
    assert!(!state.loading);
}

#[test]
fn signed_out_keeps_pending_operation_loading() {
    let mut state = SessionState::default();
    state.begin();
    state.signed_out();
    assert!(state.loading);
    state.completed();
    assert!(!state.loading);
}

#[test]
fn clear_error_touches_nothing_else() {
    let user = make_user(Role::Admin);
    let mut state = SessionState::restore(PersistedSession { user: Some(user.clone()), is_authenticated: true });
    state.begin();
    state.failed("boom".into());
    state.clear_error();
    assert!(state.error.is_none());
    assert_eq!(state.user, Some(user));
    assert!(state.is_authenticated);
}
