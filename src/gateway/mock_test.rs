use std::sync::Arc;

use super::*;
use crate::storage::MemoryStore;

fn gateway() -> (SessionPersistence, MockAuthGateway) {
    let persistence = SessionPersistence::new(Arc::new(MemoryStore::new()));
    let gateway = MockAuthGateway::new(persistence.clone(), Duration::ZERO);
    (persistence, gateway)
}

fn signup(email: &str, role: Option<Role>) -> RegisterRequest {
    RegisterRequest {
        name: "Bruno Lima".into(),
        email: email.into(),
        phone: "11977776666".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        role,
    }
}

// =============================================================================
// generate_token
// =============================================================================

#[test]
fn token_has_prefix_and_hex_body() {
    let token = generate_token();
    let body = token.strip_prefix("mock-token-").unwrap();
    assert_eq!(body.len(), 32);
    assert!(body.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn tokens_are_unique() {
    assert_ne!(generate_token(), generate_token());
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_with_demo_pair_returns_admin_and_stores_token() {
    let (persistence, gw) = gateway();
    let session = gw.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
    assert_eq!(session.user.role, Role::Admin);
    assert_eq!(persistence.token().as_deref(), Some(session.token.as_str()));
}

#[tokio::test]
async fn login_with_wrong_password_is_invalid_credentials() {
    let (persistence, gw) = gateway();
    let err = gw.login(DEMO_EMAIL, "admin124").await.unwrap_err();
    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(persistence.token(), None);
}

#[tokio::test]
async fn login_with_unknown_email_is_invalid_credentials() {
    let (_, gw) = gateway();
    assert_eq!(gw.login("x@x.com", "wrong").await.unwrap_err(), AuthError::InvalidCredentials);
}

// =============================================================================
// register
// =============================================================================

#[tokio::test]
async fn register_echoes_email_and_defaults_role() {
    let (persistence, gw) = gateway();
    let session = gw.register(&signup("bruno@example.com", None)).await.unwrap();
    assert_eq!(session.user.email, "bruno@example.com");
    assert_eq!(session.user.role, Role::Client);
    assert!(uuid::Uuid::parse_str(&session.user.id).is_ok());
    assert!(persistence.token().is_some());
}

#[tokio::test]
async fn register_keeps_requested_role() {
    let (_, gw) = gateway();
    let session = gw.register(&signup("b@example.com", Some(Role::Barber))).await.unwrap();
    assert_eq!(session.user.role, Role::Barber);
}

// =============================================================================
// update_profile / logout / forgot_password
// =============================================================================

#[tokio::test]
async fn update_profile_merges_onto_current_user() {
    let (_, gw) = gateway();
    let session = gw.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
    let patch = UserPatch { name: Some("João S.".into()), ..UserPatch::default() };
    let user = gw.update_profile(&session.user, &patch).await.unwrap();
    assert_eq!(user.name, "João S.");
    assert_eq!(user.id, session.user.id);
    assert_eq!(user.email, DEMO_EMAIL);
}

#[tokio::test]
async fn update_profile_without_token_is_unauthorized() {
    let (_, gw) = gateway();
    let session = gw.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
    gw.logout();
    let err = gw.update_profile(&session.user, &UserPatch::default()).await.unwrap_err();
    assert_eq!(err, AuthError::Unauthorized);
}

#[tokio::test]
async fn logout_clears_token() {
    let (persistence, gw) = gateway();
    gw.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
    gw.logout();
    assert_eq!(persistence.token(), None);
}

#[tokio::test]
async fn forgot_password_always_succeeds() {
    let (_, gw) = gateway();
    let notice = gw.forgot_password("anyone@example.com").await.unwrap();
    assert!(!notice.message.is_empty());
}

#[tokio::test(start_paused = true)]
async fn calls_wait_for_configured_latency() {
    let persistence = SessionPersistence::new(Arc::new(MemoryStore::new()));
    let gw = MockAuthGateway::new(persistence, Duration::from_millis(300));
    let started = tokio::time::Instant::now();
    gw.forgot_password("a@b.com").await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(300));
}
