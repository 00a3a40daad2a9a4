//! Tests for the MCP tool surface.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use strictly_ascend::{
    AscendConfig, Catalog, DEFAULT_SESSION, GameServer, SessionStore, ShuffleMode, StartServerRequest,
    SubmitAnswerRequest,
};

fn server() -> (SessionStore, GameServer) {
    let store = SessionStore::new(Catalog::standard(), ShuffleMode::Seeded(3));
    let server = GameServer::with_store(store.clone(), &AscendConfig::default());
    (store, server)
}

fn text_of(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| c.as_text().map(|t| t.text.clone()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_error(result: &CallToolResult) -> bool {
    result.is_error == Some(true)
}

#[tokio::test]
async fn test_status_reports_fresh_session() {
    let (_, server) = server();
    let status = server.get_game_status().await.expect("status");
    let text = text_of(&status);
    assert!(text.contains("Phase: Check-in"), "{text}");
    assert!(text.contains("Score: 0/100"), "{text}");
    assert!(text.contains("Current Workshop: 1"), "{text}");
    assert!(text.contains("Quiz Progress: 0/5"), "{text}");
    assert!(text.contains("Active Sessions: 0"), "{text}");
}

#[tokio::test]
async fn test_status_counts_live_sessions() {
    let (store, server) = server();
    server.check_in().await.expect("check in");
    store.with_session("browser", |s| s.check_in()).expect("browser check in");

    let text = text_of(&server.get_game_status().await.expect("status"));
    assert!(text.contains("Score: 10/100"), "{text}");
    assert!(text.contains("Active Sessions: 2"), "{text}");
}

#[tokio::test]
async fn test_tools_share_store_with_rest() {
    let (store, server) = server();
    let result = server.check_in().await.expect("check in");
    assert!(!is_error(&result));
    assert_eq!(store.snapshot(DEFAULT_SESSION).score, 10);

    let again = server.check_in().await.expect("check in");
    assert!(is_error(&again));
    assert_eq!(text_of(&again), "Already checked in");
}

#[tokio::test]
async fn test_quiz_tools_walk_first_workshop() {
    let (store, server) = server();
    server.check_in().await.unwrap();
    server.start_workshop().await.unwrap();
    let task = server.complete_task().await.unwrap();
    assert!(text_of(&task).starts_with("Task completed! +5 points"));

    for _ in 0..5 {
        let quiz = server.get_current_quiz().await.unwrap();
        assert!(text_of(&quiz).starts_with("Question "));
        let correct = store
            .with_session(DEFAULT_SESSION, |s| s.current_quiz())
            .expect("quiz running")
            .quiz
            .correct_index as i64;
        let answer = server
            .submit_quiz_answer(Parameters(SubmitAnswerRequest { answer: correct }))
            .await
            .unwrap();
        assert_eq!(text_of(&answer), "Correct! +3 points");
    }

    let quiz = server.get_current_quiz().await.unwrap();
    assert!(is_error(&quiz));
    let status = text_of(&server.get_game_status().await.unwrap());
    assert!(status.contains("Phase: Workshop 2: AWS Q CLI"), "{status}");
    assert!(status.contains("Score: 30/100"), "{status}");
    assert!(status.contains("Current Workshop: 2"), "{status}");
}

#[tokio::test]
async fn test_exit_too_early_is_tool_error() {
    let (_, server) = server();
    let result = server.exit_workshop().await.expect("exit");
    assert!(is_error(&result));
    assert_eq!(text_of(&result), "Cannot exit yet");
}

#[tokio::test]
async fn test_reset_game() {
    let (store, server) = server();
    server.check_in().await.unwrap();
    let result = server.reset_game().await.unwrap();
    assert!(text_of(&result).contains("reset to initial state"));
    assert_eq!(store.snapshot(DEFAULT_SESSION).score, 0);
}

#[tokio::test]
async fn test_start_game_server_once() {
    let (_, server) = server();
    // Port 0 lets the OS pick a free port
    let result = server
        .start_game_server(Parameters(StartServerRequest { port: 0 }))
        .await
        .expect("start");
    let port = server.http_port().await.expect("running");
    assert!(text_of(&result).contains(&format!("http://127.0.0.1:{}", port)));

    let again = server
        .start_game_server(Parameters(StartServerRequest { port: 0 }))
        .await
        .expect("start again");
    assert!(text_of(&again).contains("already running"));
    assert_eq!(server.http_port().await, Some(port));
}

#[tokio::test]
async fn test_start_game_server_uses_configured_host() {
    let store = SessionStore::new(Catalog::standard(), ShuffleMode::Seeded(3));
    let config = AscendConfig::default().with_host("localhost");
    let server = GameServer::with_store(store, &config);

    let result = server
        .start_game_server(Parameters(StartServerRequest { port: 0 }))
        .await
        .expect("start");
    let port = server.http_port().await.expect("running");
    assert!(text_of(&result).contains(&format!("http://localhost:{}", port)));

    let again = server
        .start_game_server(Parameters(StartServerRequest { port: 0 }))
        .await
        .expect("start again");
    assert!(text_of(&again).contains(&format!("running on http://localhost:{}", port)));
}
