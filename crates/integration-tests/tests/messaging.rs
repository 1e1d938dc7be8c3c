//! Notifications from compose to the parent inbox, plus the parent views.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use schoolcom_integration_tests::{TestContext, find_form_action, find_link};

#[tokio::test]
async fn test_teacher_sends_and_sees_history() {
    let mut ctx = TestContext::new();
    ctx.login("teacher").await;

    let compose = ctx.get("/teacher/notifications").await;
    assert_eq!(compose.status, StatusCode::OK);
    // No API key configured
    assert!(!compose.body.contains("value=\"generate\""));

    let resp = ctx
        .post_form(
            "/teacher/notifications",
            &[
                ("title", "Quiz on Friday"),
                ("kind", "exam"),
                ("recipients", "Algebra I"),
                ("content", "Chapters 3 and 4."),
                ("action", "send"),
            ],
        )
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER, "{}", resp.body);

    let resp = ctx.get("/teacher/notifications").await;
    assert!(resp.body.contains("Quiz on Friday"));
}

#[tokio::test]
async fn test_send_without_content_is_rejected() {
    let mut ctx = TestContext::new();
    ctx.login("school.admin").await;

    let resp = ctx
        .post_form(
            "/school-admin/notifications",
            &[("title", "Snow day"), ("action", "send")],
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.body.contains("value=\"Snow day\""));
}

#[tokio::test]
async fn test_draft_needs_only_a_title() {
    let mut ctx = TestContext::new();
    ctx.login("school.admin").await;

    let resp = ctx
        .post_form(
            "/school-admin/notifications",
            &[("title", "Spring fair"), ("action", "draft")],
        )
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);

    let resp = ctx.get("/school-admin/notifications").await;
    assert!(resp.body.contains("saved as draft"));
}

#[tokio::test]
async fn test_ai_draft_without_key_is_reported() {
    let mut ctx = TestContext::new();
    ctx.login("teacher").await;

    let resp = ctx
        .post_form(
            "/teacher/notifications",
            &[
                ("title", "Quiz"),
                ("kind", "exam"),
                ("recipients", "Algebra I"),
                ("action", "generate"),
            ],
        )
        .await;
    assert!(resp.status.is_client_error() || resp.status.is_server_error());
    assert!(resp.body.contains("notice-error"));
}

#[tokio::test]
async fn test_parent_opens_notification_and_replies() {
    let mut ctx = TestContext::new();
    ctx.login("parent@example.com").await;

    let inbox = ctx.get("/parent/notifications").await;
    assert_eq!(inbox.status, StatusCode::OK);
    let detail = find_link(&inbox.body, "/parent/notifications/", "").unwrap().to_owned();

    let resp = ctx.get(&detail).await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = ctx
        .post_form(&format!("{detail}/reply"), &[("text", "Thanks, we will be there.")])
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some(detail.as_str()));

    let resp = ctx.get(&detail).await;
    assert!(resp.body.contains("Reply sent."));
    assert!(resp.body.contains("Thanks, we will be there."));

    let resp = ctx.post_form(&format!("{detail}/reply"), &[("text", "  ")]).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    let resp = ctx.get(&detail).await;
    assert!(resp.body.contains("Write a reply before sending."));
}

#[tokio::test]
async fn test_parent_calendar_and_documents() {
    let mut ctx = TestContext::new();
    ctx.login("parent@example.com").await;

    let resp = ctx.get("/parent/calendar").await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = ctx.get("/parent/documents").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("class=\"document"));

    let resp = ctx.get("/parent/documents?q=zzz-nothing").await;
    assert!(resp.body.contains("No documents match."));

    let resp = ctx.get("/parent/profile").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Parent"));
}

#[tokio::test]
async fn test_system_admin_stats() {
    let mut ctx = TestContext::new();
    ctx.login("system.admin").await;
    let resp = ctx.get("/system-admin/stats").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Enrolled students"));
}

#[tokio::test]
async fn test_teacher_cannot_delete_a_colleagues_draft() {
    let mut ctx = TestContext::new();
    ctx.login("teacher").await;
    let resp = ctx
        .post_form(
            "/teacher/notifications",
            &[("title", "Spring quiz"), ("action", "draft")],
        )
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);

    let page = ctx.get("/teacher/notifications").await;
    let delete = find_form_action(&page.body, "/teacher/notifications/", "/delete")
        .unwrap()
        .to_owned();
    ctx.post_form("/logout", &[]).await;

    ctx.login("teacher.emily").await;
    let page = ctx.get("/teacher/notifications").await;
    assert!(page.body.contains("Spring quiz"));
    assert_eq!(find_form_action(&page.body, &delete, ""), None);

    let resp = ctx.post_form(&delete, &[]).await;
    assert_eq!(resp.location(), Some("/teacher/notifications"));
    let page = ctx.get("/teacher/notifications").await;
    assert!(page.body.contains("Spring quiz"));
    assert!(page.body.contains("toast-error"));
    ctx.post_form("/logout", &[]).await;

    ctx.login("teacher").await;
    let resp = ctx.post_form(&delete, &[]).await;
    assert_eq!(resp.location(), Some("/teacher/notifications"));
    let page = ctx.get("/teacher/notifications").await;
    assert!(page.body.contains("Spring quiz deleted."));
    assert_eq!(find_form_action(&page.body, &delete, ""), None);
}
