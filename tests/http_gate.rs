//! HTTP-level tests for the authentication gate.
//!
//! The gate never rejects a request; handlers that need an identity do.
//! `/api/v1/session` always answers 200 and reports what the gate decided,
//! `/api/v1/me` answers 401 when no identity was established.
mod common;

use auth_gate::services::auth::RevocationStore;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{Directory, TestApp, read_json, token, token_signed_with};
use tower::ServiceExt;

fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).expect("request")
}

fn alice() -> Directory {
    Directory::default().with_user(1, "alice@example.com", "CUSTOMER")
}

#[tokio::test]
async fn valid_token_establishes_identity() {
    let app = TestApp::new(alice());
    let bearer = format!("Bearer {}", token("alice@example.com"));

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/me", Some(&bearer)))
        .await
        .expect("me");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["userId"], 1);
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["authorities"][0], "ROLE_CUSTOMER");
}

#[tokio::test]
async fn missing_header_is_forwarded_anonymously() {
    let app = TestApp::new(alice());

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/session", None))
        .await
        .expect("session");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["authenticated"], false);
    assert!(body.get("subject").is_none());
    assert_eq!(app.directory.lookups(), 0);
}

#[tokio::test]
async fn foreign_scheme_is_ignored() {
    let app = TestApp::new(alice());
    let basic = format!("Basic {}", token("alice@example.com"));

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/session", Some(&basic)))
        .await
        .expect("session");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["authenticated"], false);
    assert_eq!(app.directory.lookups(), 0);
}

#[tokio::test]
async fn invalid_signature_is_forwarded_anonymously() {
    let app = TestApp::new(alice());
    let bearer = format!(
        "Bearer {}",
        token_signed_with("alice@example.com", "not-the-secret")
    );

    let session = app
        .router
        .clone()
        .oneshot(get("/api/v1/session", Some(&bearer)))
        .await
        .expect("session");
    assert_eq!(session.status(), StatusCode::OK);
    assert_eq!(read_json(session).await["authenticated"], false);

    let me = app
        .router
        .clone()
        .oneshot(get("/api/v1/me", Some(&bearer)))
        .await
        .expect("me");
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        me.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    assert_eq!(read_json(me).await["error"]["code"], "UNAUTHORIZED");
    assert_eq!(app.directory.lookups(), 0);
}

#[tokio::test]
async fn revoked_token_is_forwarded_anonymously() {
    let app = TestApp::new(alice());
    let raw = token("alice@example.com");
    app.revocations
        .revoke(&raw, std::time::Duration::from_secs(600))
        .await
        .expect("revoke");
    let bearer = format!("Bearer {raw}");

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/session", Some(&bearer)))
        .await
        .expect("session");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["authenticated"], false);
    assert_eq!(app.directory.lookups(), 0);
}

#[tokio::test]
async fn unknown_subject_is_forwarded_anonymously() {
    let app = TestApp::new(alice());
    let bearer = format!("Bearer {}", token("ghost@example.com"));

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/session", Some(&bearer)))
        .await
        .expect("session");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["authenticated"], false);
    assert_eq!(app.directory.lookups(), 1);
}

#[tokio::test]
async fn logout_revokes_the_presented_token() {
    let app = TestApp::new(alice());
    let bearer = format!("Bearer {}", token("alice@example.com"));

    let logout = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/logout")
        .header(header::AUTHORIZATION, &bearer)
        .body(Body::empty())
        .expect("request");
    let response = app.router.clone().oneshot(logout).await.expect("logout");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let me = app
        .router
        .clone()
        .oneshot(get("/api/v1/me", Some(&bearer)))
        .await
        .expect("me");
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_requires_identity() {
    let app = TestApp::new(alice());

    let logout = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/logout")
        .body(Body::empty())
        .expect("request");
    let response = app.router.clone().oneshot(logout).await.expect("logout");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_outside_the_gate() {
    let app = TestApp::new(alice());

    let response = app
        .router
        .clone()
        .oneshot(get("/health", Some("Bearer garbage")))
        .await
        .expect("health");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status"], "ok");
}

#[tokio::test]
async fn request_id_is_propagated() {
    let app = TestApp::new(alice());

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/session", None))
        .await
        .expect("session");

    assert!(response.headers().get("x-request-id").is_some());
}
