mod common;

use std::sync::Arc;
use std::time::Duration;

use http::{Method, StatusCode};

use client::views::{AssignmentsView, LoginView, RegisterView, SubmissionsView};
use client::{MemoryStore, Route, Router, SessionStore};
use common::*;

const ASSIGNMENTS_JSON: &str = r#"[
    {"id": 1, "title": "Essay", "description": "Rivers", "dueDate": "2026-05-01"},
    {"id": 2, "title": "Lab", "description": "Erosion", "dueDate": "2026-05-02T23:59:00"}
]"#;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn teacher_login_lands_on_teacher_dashboard() {
    let store = Arc::new(MemoryStore::new());
    let (api, transport) = fake_client(store.clone());
    let mut router = Router::new(store.clone(), "/login");

    transport.respond(
        StatusCode::OK,
        &format!(r#"{{"token":"{}"}}"#, teacher_token()),
    );

    let mut view = LoginView::new();
    view.form.user_name = "tina".into();
    view.form.password = "pw".into();

    assert_eq!(view.login(&api, &mut router).await, Some(Route::Teacher));
    assert_eq!(router.current(), Route::Teacher);
    assert_eq!(store.credential(), Some(teacher_token()));
    assert!(view.form.user_name.is_empty());
}

#[tokio::test]
async fn student_login_lands_on_submissions() {
    let store = Arc::new(MemoryStore::new());
    let (api, transport) = fake_client(store.clone());
    let mut router = Router::new(store.clone(), "/login");

    transport.respond(
        StatusCode::OK,
        &format!(r#"{{"token":"{}"}}"#, student_token()),
    );

    let mut view = LoginView::new();
    view.form.user_name = "sam".into();
    view.form.password = "pw".into();

    assert_eq!(
        view.login(&api, &mut router).await,
        Some(Route::StudentSubmissions)
    );
}

#[tokio::test]
async fn empty_login_form_sends_nothing() {
    let store = Arc::new(MemoryStore::new());
    let (api, transport) = fake_client(store.clone());
    let mut router = Router::new(store, "/login");

    let mut view = LoginView::new();
    view.form.password = "pw".into();

    assert_eq!(view.login(&api, &mut router).await, None);
    assert_eq!(transport.call_count(), 0);
    assert_eq!(view.state.error.as_deref(), Some("Please fill in your username"));
}

#[tokio::test]
async fn rejected_login_shows_generic_text() {
    let store = Arc::new(MemoryStore::new());
    let (api, transport) = fake_client(store.clone());
    let mut router = Router::new(store.clone(), "/login");
    transport.respond(StatusCode::UNAUTHORIZED, r#"{"message":"bad password"}"#);

    let mut view = LoginView::new();
    view.form.user_name = "tina".into();
    view.form.password = "wrong".into();

    assert_eq!(view.login(&api, &mut router).await, None);
    assert_eq!(
        view.state.error.as_deref(),
        Some("Invalid credentials. Please try again!")
    );
    assert!(!view.state.loading);
    assert_eq!(store.credential(), None);
    assert_eq!(router.current(), Route::Login);
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_success_shows_message() {
    let (api, transport) = fake_client(Arc::new(MemoryStore::new()));
    transport.respond(StatusCode::OK, r#"{"id": 3}"#);

    let mut view = RegisterView::new(Duration::from_millis(2000));
    view.form.user_name = "newbie".into();
    view.form.password = "pw".into();

    assert!(view.register(&api).await);
    assert_eq!(
        view.state.success.as_deref(),
        Some("Your account has been created successfully!")
    );
    assert_eq!(transport.calls()[0].json()["role"], "STUDENT");
}

// ---------------------------------------------------------------------------
// Teacher assignments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_reloads_the_list() {
    let (api, transport) = fake_client(Arc::new(MemoryStore::with_credential(teacher_token())));
    transport
        .respond(StatusCode::OK, "[]")
        .respond(StatusCode::CREATED, "")
        .respond(StatusCode::OK, ASSIGNMENTS_JSON);

    let mut view = AssignmentsView::new();
    view.load(&api).await;
    assert!(view.assignments.is_empty());

    view.show_form = true;
    view.form.title = "Essay".into();
    view.form.description = "Rivers".into();
    view.form.due_date = "2026-05-01".into();

    assert!(view.create(&api).await);
    assert_eq!(view.assignments.len(), 2);
    assert!(!view.show_form);

    let calls = transport.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1].method, Method::POST);
    assert_eq!(calls[1].json()["dueDate"], "2026-05-01");
    assert_eq!(calls[2].method, Method::GET);
}

#[tokio::test]
async fn rejected_create_does_not_reload() {
    let (api, transport) = fake_client(Arc::new(MemoryStore::with_credential(student_token())));
    transport.respond(StatusCode::FORBIDDEN, "");

    let mut view = AssignmentsView::new();
    view.form.title = "Essay".into();
    view.form.description = "Rivers".into();
    view.form.due_date = "2026-05-01".into();

    assert!(!view.create(&api).await);
    assert_eq!(transport.call_count(), 1);
    assert_eq!(view.state.error.as_deref(), Some("Failed to create assignment"));
}

// ---------------------------------------------------------------------------
// Student submissions
// ---------------------------------------------------------------------------

async fn loaded_submissions(
    transport: &FakeTransport,
    api: &client::ApiClient<FakeTransport>,
) -> SubmissionsView {
    transport.respond(StatusCode::OK, ASSIGNMENTS_JSON);
    let mut view = SubmissionsView::new(Duration::from_millis(3000));
    view.load(api).await;
    assert_eq!(view.assignments.len(), 2);
    view
}

#[tokio::test]
async fn missing_file_url_makes_zero_requests() {
    let (api, transport) = fake_client(Arc::new(MemoryStore::with_credential(student_token())));
    let mut view = loaded_submissions(&transport, &api).await;
    let before = transport.call_count();

    assert!(!view.submit(&api, 1).await);
    view.set_draft(1, "  \t ");
    assert!(!view.submit(&api, 1).await);

    assert_eq!(transport.call_count(), before);
    assert_eq!(
        view.state.error.as_deref(),
        Some("Please provide a file URL before submitting!")
    );
    assert_eq!(view.state.success, None);
}

#[tokio::test]
async fn rejected_submission_keeps_the_entered_url() {
    let (api, transport) = fake_client(Arc::new(MemoryStore::with_credential(student_token())));
    let mut view = loaded_submissions(&transport, &api).await;

    for status in [StatusCode::CONFLICT, StatusCode::BAD_REQUEST] {
        transport.respond(status, "");
        view.set_draft(2, "https://files/lab.pdf");

        assert!(!view.submit(&api, 2).await);
        assert_eq!(view.draft(2), "https://files/lab.pdf");
        assert_eq!(view.state.success, None);
        assert!(view.state.error.is_some());
        assert!(!view.is_submitting(2));
    }
}

#[tokio::test]
async fn accepted_submission_sends_trimmed_url_and_clears_draft() {
    let (api, transport) = fake_client(Arc::new(MemoryStore::with_credential(student_token())));
    let mut view = loaded_submissions(&transport, &api).await;
    transport.respond(StatusCode::OK, "{}");

    view.set_draft(1, "  https://files/essay.pdf  ");
    assert!(view.submit(&api, 1).await);

    let last = transport.calls().pop().unwrap();
    assert_eq!(last.json()["fileUrl"], "https://files/essay.pdf");
    assert_eq!(last.authorization, Some(format!("Bearer {}", student_token())));
    assert_eq!(view.draft(1), "");
    assert_eq!(
        view.state.success.as_deref(),
        Some("Successfully submitted \"Essay\"!")
    );
}
