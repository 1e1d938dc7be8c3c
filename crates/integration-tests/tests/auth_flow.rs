//! Sign-in, role gating, language and health endpoints.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use schoolcom_integration_tests::TestContext;
use serde_json::{Value, json};

#[tokio::test]
async fn test_health_endpoints() {
    let mut ctx = TestContext::new();

    let resp = ctx.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");

    let resp = ctx.get("/api/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    let json: Value = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let mut ctx = TestContext::new();
    let resp = ctx.get("/").await;

    assert!(resp.headers.contains_key("x-request-id"));
    assert_eq!(resp.headers["x-frame-options"], "DENY");
    assert!(resp.headers.contains_key("content-security-policy"));
}

#[tokio::test]
async fn test_anonymous_visitor_is_sent_to_sign_in() {
    let mut ctx = TestContext::new();

    let resp = ctx.get("/teacher").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/"));

    let resp = ctx.get("/").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("name=\"identifier\""));
}

#[tokio::test]
async fn test_api_rejects_anonymous_with_401() {
    let mut ctx = TestContext::new();
    let resp = ctx
        .post_json("/api/notifications/generate", &json!({"eventTitle": "Exam"}))
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_each_demo_identifier_lands_on_its_role_page() {
    for (identifier, landing) in [
        ("system.admin", "/system-admin"),
        ("school.admin", "/school-admin"),
        ("teacher", "/teacher"),
        ("parent@example.com", "/parent"),
    ] {
        let mut ctx = TestContext::new();
        assert_eq!(ctx.login(identifier).await, landing);

        let resp = ctx.get(landing).await;
        assert_eq!(resp.status, StatusCode::OK, "{identifier}");
        assert!(resp.body.contains("toast-success"), "{identifier}");
    }
}

#[tokio::test]
async fn test_signed_in_visitor_skips_sign_in_page() {
    let mut ctx = TestContext::new();
    ctx.login("teacher.emily").await;

    let resp = ctx.get("/").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/teacher"));
}

#[tokio::test]
async fn test_wrong_role_is_redirected() {
    let mut ctx = TestContext::new();
    ctx.login("parent@example.com").await;

    let resp = ctx.get("/system-admin/schools").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/"));
}

#[tokio::test]
async fn test_blank_identifier_is_unprocessable() {
    let mut ctx = TestContext::new();
    let resp = ctx.post_form("/login", &[("identifier", "   ")]).await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.body.contains("Enter your username or email."));
}

#[tokio::test]
async fn test_unknown_identifier_is_unauthorized() {
    let mut ctx = TestContext::new();
    let resp = ctx.post_form("/login", &[("identifier", "visitor")]).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert!(resp.body.contains("value=\"visitor\""));
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let mut ctx = TestContext::new();
    ctx.login("school.admin").await;

    let resp = ctx.post_form("/logout", &[]).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/"));

    let resp = ctx.get("/school-admin").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/"));
}

#[tokio::test]
async fn test_language_toggle_returns_to_page() {
    let mut ctx = TestContext::new();
    ctx.login("teacher").await;

    let resp = ctx.post_form("/language", &[("next", "/teacher/calendar")]).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/teacher/calendar"));

    let resp = ctx.get("/teacher/calendar").await;
    assert!(resp.body.contains("lang=\"es\""));
    assert!(resp.body.contains("Calendario"));

    ctx.post_form("/language", &[("next", "/teacher")]).await;
    let resp = ctx.get("/teacher").await;
    assert!(resp.body.contains("lang=\"en\""));
}

#[tokio::test]
async fn test_language_toggle_ignores_offsite_return() {
    let mut ctx = TestContext::new();
    let resp = ctx
        .post_form("/language", &[("next", "https://evil.example/")])
        .await;
    assert_eq!(resp.location(), Some("/"));
}

#[tokio::test]
async fn test_language_toggle_ignores_control_characters_in_return() {
    let mut ctx = TestContext::new();

    let resp = ctx
        .post_form("/language", &[("next", "/\t/evil.example/")])
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/"));

    let resp = ctx.post_form("/language", &[("next", "/a\nb")]).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/"));
}
