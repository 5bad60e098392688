//! Tests for the bearer-token authentication service.

use std::sync::Arc;

use chrono::Duration;
use serde_json::json;

use super::*;
use crate::domain::ports::{PrincipalStore, RevocationStore};
use crate::domain::principal::{hash_password, PrincipalId, Role};
use crate::domain::ErrorCode;
use crate::outbound::memory::{InMemoryPrincipalStore, InMemoryRevocationStore};

const SECRET: &[u8] = b"unit-test-signing-secret";

struct Harness {
    service: TokenAuthService<InMemoryPrincipalStore, InMemoryRevocationStore>,
    principals: Arc<InMemoryPrincipalStore>,
    revocations: Arc<InMemoryRevocationStore>,
    codec: Arc<TokenCodec>,
}

fn harness() -> Harness {
    let principals = Arc::new(InMemoryPrincipalStore::new());
    let revocations = Arc::new(InMemoryRevocationStore::new());
    let codec = Arc::new(TokenCodec::new(SECRET));
    let service = TokenAuthService::new(
        Arc::clone(&principals),
        Arc::clone(&revocations),
        Arc::clone(&codec),
    );
    Harness {
        service,
        principals,
        revocations,
        codec,
    }
}

async fn insert_principal(
    store: &InMemoryPrincipalStore,
    email: &str,
    password: &str,
    role: Role,
    active: bool,
) -> Principal {
    let principal = Principal {
        id: PrincipalId::random(),
        email: Email::parse(email).expect("valid email"),
        name: "Fixture".to_owned(),
        role,
        active,
        password_hash: hash_password(password).expect("hash"),
    };
    store.insert(principal.clone()).await.expect("insert");
    principal
}

#[tokio::test]
async fn login_with_correct_credentials_issues_token() {
    let h = harness();
    let principal = insert_principal(
        &h.principals,
        "user@example.com",
        "password123",
        Role::User,
        true,
    )
    .await;

    let success = h
        .service
        .login(json!({"email": "user@example.com", "password": "password123"}))
        .await
        .expect("login succeeds");

    assert_eq!(success.principal.id, principal.id);
    assert_eq!(success.principal.email.as_str(), "user@example.com");

    // The issued token passes the gate.
    let header = format!("Bearer {}", success.token);
    let session = h
        .service
        .authenticate(Some(&header))
        .await
        .expect("token authenticates");
    assert_eq!(session.principal.id, principal.id);
}

#[tokio::test]
async fn login_normalizes_email_case() {
    let h = harness();
    insert_principal(
        &h.principals,
        "user@example.com",
        "password123",
        Role::User,
        true,
    )
    .await;

    let out = h
        .service
        .login(json!({"email": "  USER@Example.com ", "password": "password123"}))
        .await;
    assert!(out.is_ok());
}

#[tokio::test]
async fn wrong_password_and_inactive_account_fail_identically() {
    let h = harness();
    insert_principal(
        &h.principals,
        "active@example.com",
        "password123",
        Role::User,
        true,
    )
    .await;
    insert_principal(
        &h.principals,
        "inactive@example.com",
        "password123",
        Role::User,
        false,
    )
    .await;

    let wrong_password = h
        .service
        .login(json!({"email": "active@example.com", "password": "wrongpassword"}))
        .await
        .expect_err("wrong password");
    let inactive = h
        .service
        .login(json!({"email": "inactive@example.com", "password": "password123"}))
        .await
        .expect_err("inactive principal");
    let unknown = h
        .service
        .login(json!({"email": "nobody@example.com", "password": "password123"}))
        .await
        .expect_err("unknown email");

    assert_eq!(wrong_password, inactive);
    assert_eq!(inactive, unknown);
    assert_eq!(unknown.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn malformed_login_payload_reports_fields() {
    let h = harness();
    let err = h
        .service
        .login(json!({"email": "bad", "password": "123"}))
        .await
        .expect_err("validation fails");
    assert_eq!(err.code(), ErrorCode::Validation);
    let fields = err.field_errors().expect("field map");
    assert!(fields.contains_key("email"));
    assert!(fields.contains_key("password"));
}

#[tokio::test]
async fn gate_rejects_missing_and_malformed_headers() {
    let h = harness();
    for header in [
        None,
        Some(""),
        Some("Bearer "),
        Some("Token abc"),
        Some("Bearer not-a-jwt"),
    ] {
        let err = h
            .service
            .authenticate(header)
            .await
            .expect_err("gate rejects");
        assert_eq!(err, Error::unauthorized());
    }
}

#[tokio::test]
async fn gate_rejects_revoked_token_before_natural_expiry() {
    let h = harness();
    insert_principal(
        &h.principals,
        "user@example.com",
        "password123",
        Role::User,
        true,
    )
    .await;

    let success = h
        .service
        .login(json!({"email": "user@example.com", "password": "password123"}))
        .await
        .expect("login");
    let header = format!("Bearer {}", success.token);

    let session = h
        .service
        .authenticate(Some(&header))
        .await
        .expect("valid before logout");
    h.service.revoke(&session.claims).await.expect("logout");

    let err = h
        .service
        .authenticate(Some(&header))
        .await
        .expect_err("revoked token rejected");
    assert_eq!(err, Error::unauthorized());
}

#[tokio::test]
async fn revoke_is_idempotent() {
    let h = harness();
    insert_principal(
        &h.principals,
        "user@example.com",
        "password123",
        Role::User,
        true,
    )
    .await;
    let success = h
        .service
        .login(json!({"email": "user@example.com", "password": "password123"}))
        .await
        .expect("login");
    let claims = h.codec.decode(&success.token).expect("decode");

    h.service.revoke(&claims).await.expect("first revoke");
    h.service.revoke(&claims).await.expect("second revoke is a no-op");
    assert!(h
        .revocations
        .is_revoked(&claims.fingerprint())
        .await
        .expect("check"));
}

#[tokio::test]
async fn gate_rejects_principal_deactivated_after_issuance() {
    let h = harness();
    let principal = insert_principal(
        &h.principals,
        "user@example.com",
        "password123",
        Role::User,
        true,
    )
    .await;
    let token = h
        .codec
        .encode(&principal, Duration::hours(1))
        .expect("encode");

    // A token minted for an id the store no longer returns as active
    // must not pass the gate.
    let ghost = Principal {
        id: PrincipalId::random(),
        ..principal
    };
    let ghost_token = h.codec.encode(&ghost, Duration::hours(1)).expect("encode");

    assert!(h
        .service
        .authenticate(Some(&format!("Bearer {token}")))
        .await
        .is_ok());
    let err = h
        .service
        .authenticate(Some(&format!("Bearer {ghost_token}")))
        .await
        .expect_err("unknown principal rejected");
    assert_eq!(err, Error::unauthorized());
}

#[tokio::test]
async fn expired_entries_are_swept_on_revoke() {
    let h = harness();
    let principal = insert_principal(
        &h.principals,
        "user@example.com",
        "password123",
        Role::User,
        true,
    )
    .await;

    // Claims for a token that already expired; its revocation entry is
    // stale the moment it lands.
    let stale_claims =
        Claims::for_principal(&principal, Duration::hours(1), Utc::now() - Duration::hours(2));
    h.service.revoke(&stale_claims).await.expect("revoke stale");

    let fresh = h
        .service
        .login(json!({"email": "user@example.com", "password": "password123"}))
        .await
        .expect("login");
    let fresh_claims = h.codec.decode(&fresh.token).expect("decode");
    h.service.revoke(&fresh_claims).await.expect("revoke fresh sweeps");

    assert!(!h
        .revocations
        .is_revoked(&stale_claims.fingerprint())
        .await
        .expect("stale entry swept"));
    assert!(h
        .revocations
        .is_revoked(&fresh_claims.fingerprint())
        .await
        .expect("fresh entry kept"));
}
