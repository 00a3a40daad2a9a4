//! Tests for the REST API routes.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use strictly_ascend::rest::{self, ActionResponse, SESSION_HEADER};
use strictly_ascend::{Catalog, SessionStore, ShuffleMode};
use tower::ServiceExt;

fn store() -> SessionStore {
    SessionStore::new(Catalog::standard(), ShuffleMode::Seeded(11))
}

fn app() -> Router {
    rest::api_router(store())
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>, session: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = session {
        builder = builder.header(SESSION_HEADER, id);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}

async fn submit_raw(app: &Router, body: &'static str, content_type: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri("/api/submit-quiz");
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body)).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

async fn start_first_quiz(app: &Router) {
    post(app, "/api/checkin").await;
    post(app, "/api/start-workshop").await;
    post(app, "/api/complete-task").await;
}

async fn post(app: &Router, uri: &str) -> ActionResponse {
    let (status, value) = call(app, "POST", uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_value(value).expect("action response")
}

async fn answer_quiz(app: &Router, right: bool) -> Vec<ActionResponse> {
    let mut responses = Vec::new();
    loop {
        let (_, quiz) = call(app, "GET", "/api/current-quiz", None, None).await;
        if quiz.is_null() {
            return responses;
        }
        let correct = quiz["correct"].as_i64().expect("correct index");
        let answer = if right { correct } else { correct + 1 };
        let (_, value) = call(app, "POST", "/api/submit-quiz", Some(json!({ "answer": answer })), None).await;
        responses.push(serde_json::from_value(value).expect("action response"));
    }
}

#[tokio::test]
async fn test_initial_game_state() {
    let app = app();
    let (status, state) = call(&app, "GET", "/api/game-state", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        state,
        json!({"phase": 0, "score": 0, "currentWorkshop": 0, "quizIndex": 0, "shuffledQuizzes": null})
    );
}

#[tokio::test]
async fn test_checkin_twice() {
    let app = app();
    let first = post(&app, "/api/checkin").await;
    assert!(first.success);
    assert_eq!(first.message.as_deref(), Some("Welcome to AWS Ascend! +10 points"));
    assert_eq!(first.game_state.as_ref().map(|s| s.score), Some(10));

    let (status, second) = call(&app, "POST", "/api/checkin", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second, json!({"success": false, "message": "Already checked in"}));
}

#[tokio::test]
async fn test_out_of_order_calls_fail_with_200() {
    let app = app();
    for (uri, message) in [
        ("/api/start-workshop", "Cannot start workshop now"),
        ("/api/complete-task", "No tasks available"),
        ("/api/exit", "Cannot exit yet"),
    ] {
        let (status, value) = call(&app, "POST", uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, json!({"success": false, "message": message}), "{uri}");
    }
    let (status, value) = call(&app, "POST", "/api/submit-quiz", Some(json!({"answer": 1})), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"success": false, "message": "No quizzes available"}));
}

#[tokio::test]
async fn test_projections_follow_phase() {
    let app = app();
    let (_, task) = call(&app, "GET", "/api/current-task", None, None).await;
    assert!(task.is_null());

    post(&app, "/api/checkin").await;
    let (_, workshop) = call(&app, "GET", "/api/current-workshop", None, None).await;
    assert_eq!(workshop, json!({"name": "Building a Data Lake with AWS"}));

    post(&app, "/api/start-workshop").await;
    let (_, workshop) = call(&app, "GET", "/api/current-workshop", None, None).await;
    assert!(workshop.is_null());
    let (_, task) = call(&app, "GET", "/api/current-task", None, None).await;
    assert_eq!(task["workshop"], json!(0));
    assert_eq!(task["points"], json!(5));

    let (_, quiz) = call(&app, "GET", "/api/current-quiz", None, None).await;
    assert!(quiz.is_null());
}

#[tokio::test]
async fn test_full_playthrough() {
    let app = app();
    post(&app, "/api/checkin").await;
    post(&app, "/api/start-workshop").await;
    let task = post(&app, "/api/complete-task").await;
    assert_eq!(task.message.as_deref(), Some("Task completed! +5 points"));
    assert_eq!(task.game_state.as_ref().map(|s| s.score), Some(15));

    let (_, quiz) = call(&app, "GET", "/api/current-quiz", None, None).await;
    assert_eq!(quiz["progress"], json!({"current": 1, "total": 5}));
    assert_eq!(quiz["options"].as_array().map(Vec::len), Some(3));

    let answers = answer_quiz(&app, true).await;
    assert_eq!(answers.len(), 5);
    assert!(answers.iter().all(|a| a.correct == Some(true)));
    let state = answers.last().and_then(|a| a.game_state.clone()).expect("state");
    assert_eq!(u8::from(state.phase), 4);
    assert_eq!(state.score, 30);

    let started = post(&app, "/api/start-workshop").await;
    assert_eq!(started.message.as_deref(), Some("Started Building an app with AWS Q CLI"));
    post(&app, "/api/complete-task").await;

    let answers = answer_quiz(&app, false).await;
    assert!(answers.iter().all(|a| a.correct == Some(false)));
    assert_eq!(answers[0].message.as_deref(), Some("Wrong! -1 point"));

    let (_, value) = call(&app, "POST", "/api/exit", None, None).await;
    assert_eq!(value["success"], json!(true));
    assert_eq!(value["won"], json!(false));
    assert_eq!(value["message"], json!("Workshop completed! +10 points. Final Score: 40"));
    assert_eq!(value["gameState"]["phase"], json!(8));
}

#[tokio::test]
async fn test_missing_answer_counts_wrong() {
    let app = app();
    post(&app, "/api/checkin").await;
    post(&app, "/api/start-workshop").await;
    post(&app, "/api/complete-task").await;

    let (status, value) = call(&app, "POST", "/api/submit-quiz", Some(json!({})), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["correct"], json!(false));
    assert_eq!(value["gameState"]["score"], json!(14));
    assert_eq!(value["gameState"]["quizIndex"], json!(1));
}

#[tokio::test]
async fn test_reset_returns_initial_state() {
    let app = app();
    post(&app, "/api/checkin").await;
    post(&app, "/api/start-workshop").await;
    post(&app, "/api/complete-task").await;

    let (_, value) = call(&app, "POST", "/api/reset", None, None).await;
    assert_eq!(
        value,
        json!({
            "success": true,
            "gameState": {"phase": 0, "score": 0, "currentWorkshop": 0, "quizIndex": 0, "shuffledQuizzes": null}
        })
    );
}

#[tokio::test]
async fn test_sessions_are_isolated_by_header() {
    let app = app();
    let (_, value) = call(&app, "POST", "/api/checkin", None, Some("alice")).await;
    assert_eq!(value["success"], json!(true));

    let (_, bob) = call(&app, "GET", "/api/game-state", None, Some("bob")).await;
    assert_eq!(bob["phase"], json!(0));
    let (_, default) = call(&app, "GET", "/api/game-state", None, None).await;
    assert_eq!(default["phase"], json!(0));
    let (_, alice) = call(&app, "GET", "/api/game-state", None, Some("alice")).await;
    assert_eq!(alice["phase"], json!(1));
}

#[tokio::test]
async fn test_static_front_end_is_served() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("index.html"), "<h1>AWS Ascend</h1>").expect("write index");
    let app = rest::app(SessionStore::default(), dir.path());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    assert_eq!(&bytes[..], b"<h1>AWS Ascend</h1>");
}

#[tokio::test]
async fn test_submit_without_body_on_fresh_session() {
    let app = app();
    let (status, value) = submit_raw(&app, "", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"success": false, "message": "No quizzes available"}));
}

#[tokio::test]
async fn test_submit_without_body_counts_wrong() {
    let app = app();
    start_first_quiz(&app).await;

    let (status, value) = submit_raw(&app, "", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["success"], json!(true));
    assert_eq!(value["correct"], json!(false));
    assert_eq!(value["gameState"]["score"], json!(14));
}

#[tokio::test]
async fn test_malformed_answers_count_wrong() {
    let app = app();
    start_first_quiz(&app).await;

    for (body, content_type) in [
        (r#"{"answer":"1"}"#, Some("application/json")),
        (r#"{"answer":null}"#, Some("application/json")),
        (r#"{"answer":0.5}"#, Some("application/json")),
        ("not json", Some("application/json")),
        ("{}", None),
    ] {
        let (status, value) = submit_raw(&app, body, content_type).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(value["success"], json!(true), "{body}");
        assert_eq!(value["correct"], json!(false), "{body}");
    }
    let (_, state) = call(&app, "GET", "/api/game-state", None, None).await;
    assert_eq!(state["phase"], json!(4));
    assert_eq!(state["quizIndex"], json!(0));
    assert_eq!(state["score"], json!(10));
}

#[tokio::test]
async fn test_integral_float_answer_matches() {
    let app = app();
    start_first_quiz(&app).await;

    let (_, quiz) = call(&app, "GET", "/api/current-quiz", None, None).await;
    let correct = quiz["correct"].as_i64().expect("correct index");
    let (status, value) = call(
        &app,
        "POST",
        "/api/submit-quiz",
        Some(json!({ "answer": correct as f64 })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["correct"], json!(true));
    assert_eq!(value["gameState"]["score"], json!(18));
}

#[test]
fn test_parse_answer_is_lenient() {
    assert_eq!(rest::parse_answer(br#"{"answer":2}"#), 2);
    assert_eq!(rest::parse_answer(br#"{"answer":2.0}"#), 2);
    assert_eq!(rest::parse_answer(br#"{"answer":-3}"#), -3);
    assert_eq!(rest::parse_answer(br#"{"answer":2.5}"#), -1);
    assert_eq!(rest::parse_answer(br#"{"answer":"2"}"#), -1);
    assert_eq!(rest::parse_answer(br#"[2]"#), -1);
    assert_eq!(rest::parse_answer(b""), -1);
}

#[tokio::test]
async fn test_read_only_routes_do_not_create_sessions() {
    let store = store();
    let app = rest::api_router(store.clone());

    for i in 0..50 {
        let id = format!("visitor-{i}");
        for uri in ["/api/game-state", "/api/current-task", "/api/current-workshop", "/api/current-quiz"] {
            let (status, _) = call(&app, "GET", uri, None, Some(&id)).await;
            assert_eq!(status, StatusCode::OK);
        }
    }
    assert!(store.is_empty());

    let (_, state) = call(&app, "GET", "/api/game-state", None, Some("visitor-1")).await;
    assert_eq!(state["phase"], json!(0));

    call(&app, "POST", "/api/checkin", None, Some("visitor-1")).await;
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_store_evicts_least_recently_used() {
    let store = store().with_capacity(2);
    let app = rest::api_router(store.clone());

    for id in ["alice", "bob"] {
        call(&app, "POST", "/api/checkin", None, Some(id)).await;
    }
    // touching alice leaves bob as the oldest
    call(&app, "POST", "/api/start-workshop", None, Some("alice")).await;
    call(&app, "POST", "/api/checkin", None, Some("carol")).await;
    assert_eq!(store.len(), 2);

    let (_, bob) = call(&app, "GET", "/api/game-state", None, Some("bob")).await;
    assert_eq!(bob["phase"], json!(0));
    let (_, alice) = call(&app, "GET", "/api/game-state", None, Some("alice")).await;
    assert_eq!(alice["phase"], json!(2));
    let (_, carol) = call(&app, "GET", "/api/game-state", None, Some("carol")).await;
    assert_eq!(carol["phase"], json!(1));
}
