use super::*;

// =============================================================
// Helpers
// =============================================================

fn make_user() -> User {
    let ts = now();
    User {
        id: "1".to_owned(),
        name: "João Silva".to_owned(),
        email: "joao@example.com".to_owned(),
        phone: "(11) 99999-9999".to_owned(),
        role: Role::Admin,
        avatar: None,
        created_at: ts,
        updated_at: ts,
    }
}

// =============================================================
// Role
// =============================================================

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Barber).unwrap(), "\"barber\"");
    let role: Role = serde_json::from_str("\"admin\"").unwrap();
    assert_eq!(role, Role::Admin);
}

#[test]
fn role_parses_case_insensitive() {
    assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
    assert_eq!(" client ".parse::<Role>().unwrap(), Role::Client);
    assert!("owner".parse::<Role>().is_err());
}

#[test]
fn role_defaults_to_client() {
    assert_eq!(Role::default(), Role::Client);
}

// =============================================================
// User
// =============================================================

#[test]
fn user_serializes_camel_case_fields() {
    let value = serde_json::to_value(make_user()).unwrap();
    assert!(value.get("createdAt").is_some());
    assert!(value.get("updatedAt").is_some());
    assert!(value.get("created_at").is_none());
    assert!(value.get("avatar").is_none());
    assert_eq!(value["role"], "admin");
}

#[test]
fn user_json_round_trip_is_exact() {
    let user = make_user();
    let raw = serde_json::to_string(&user).unwrap();
    let restored: User = serde_json::from_str(&raw).unwrap();
    assert_eq!(restored, user);
}

#[test]
fn apply_patch_merges_only_present_fields() {
    let mut user = make_user();
    let patch = UserPatch { name: Some("João S.".into()), phone: Some("11988887777".into()), ..UserPatch::default() };
    user.apply_patch(&patch);
    assert_eq!(user.name, "João S.");
    assert_eq!(user.phone, "11988887777");
    assert_eq!(user.email, "joao@example.com");
    assert_eq!(user.role, Role::Admin);
    assert!(user.updated_at >= user.created_at);
}

#[test]
fn empty_patch_reports_empty() {
    assert!(UserPatch::default().is_empty());
    assert!(!UserPatch { avatar: Some("a.png".into()), ..UserPatch::default() }.is_empty());
}

#[test]
fn register_request_never_serializes_confirmation() {
    let req = RegisterRequest {
        name: "Ana".into(),
        email: "ana@example.com".into(),
        phone: "11999998888".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        role: None,
    };
    let value = serde_json::to_value(&req).unwrap();
    assert!(value.get("confirmPassword").is_none());
    assert!(value.get("role").is_none());
    assert_eq!(value["email"], "ana@example.com");
}

#[test]
fn now_has_no_subsecond_part() {
    assert_eq!(now().nanosecond(), 0);
}
