//! MCP server setup and configuration.

use crate::config::AscendConfig;
use crate::rest;
use crate::store::{DEFAULT_SESSION, SessionStore};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use strictly_workshop::SessionError;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

/// Request for starting the browser game server.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StartServerRequest {
    /// Port to run the server on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

/// Request for answering the current quiz question.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubmitAnswerRequest {
    /// Index of the chosen option (0-based).
    pub answer: i64,
}

/// Main server handler.
pub struct GameServer {
    store: SessionStore,
    host: String,
    static_dir: PathBuf,
    http_port: Arc<Mutex<Option<u16>>>,
    tool_router: ToolRouter<Self>,
}

fn rejected(err: SessionError) -> CallToolResult {
    warn!(code = err.code(), "Tool call rejected by session");
    CallToolResult::error(vec![Content::text(err.to_string())])
}

fn text(message: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(message.into())])
}

#[tool_router]
impl GameServer {
    /// Creates a game server over a shared session store.
    ///
    /// The in-process REST server binds the configured host and serves the
    /// configured static directory.
    #[instrument(skip(store, config), fields(host = %config.host()))]
    pub fn with_store(store: SessionStore, config: &AscendConfig) -> Self {
        info!("Creating game server with shared session store");
        Self {
            store,
            host: config.host().clone(),
            static_dir: config.static_dir().clone(),
            http_port: Arc::new(Mutex::new(None)),
            tool_router: Self::tool_router(),
        }
    }

    /// Creates a game server with built-in content and random quiz order.
    pub fn new() -> Self {
        Self::with_store(SessionStore::default(), &AscendConfig::default())
    }

    /// Port of the in-process REST server, if one was started.
    pub async fn http_port(&self) -> Option<u16> {
        *self.http_port.lock().await
    }

    /// Starts the REST server and browser front-end in this process.
    #[instrument(skip(self, req), fields(port = req.port))]
    #[tool(description = "Start the AWS Ascend workshop game server")]
    pub async fn start_game_server(
        &self,
        Parameters(req): Parameters<StartServerRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut running = self.http_port.lock().await;
        if let Some(port) = *running {
            info!(port, "Game server already running");
            return Ok(text(format!(
                "Game server is already running on http://{}:{}",
                self.host, port
            )));
        }

        let listener = tokio::net::TcpListener::bind((self.host.as_str(), req.port))
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to bind game server");
                McpError::internal_error(format!("Failed to bind port {}: {}", req.port, e), None)
            })?;
        let port = listener
            .local_addr()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?
            .port();

        let app = rest::app(self.store.clone(), &self.static_dir);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!(error = %e, "Game server stopped");
            }
        });
        *running = Some(port);
        info!(host = %self.host, port, "Game server started");

        Ok(text(format!(
            "🚀 AWS Ascend Workshop Game server started on http://{}:{}\n\n\
             Game Features:\n\
             - Interactive AWS workshop experience\n\
             - 2 workshops: Data Lake & AWS Q CLI\n\
             - Scoring system with 100 point maximum\n\
             - Shuffled quiz questions\n\
             - Beautiful Amazon-themed UI\n\n\
             Open the URL in your browser to start playing!",
            self.host, port
        )))
    }

    /// Reports phase, score and quiz progress.
    #[instrument(skip(self))]
    #[tool(description = "Get current game state and statistics")]
    pub async fn get_game_status(&self) -> Result<CallToolResult, McpError> {
        let summary = self.store.peek(DEFAULT_SESSION, |s| s.status_summary());
        Ok(text(format!("{}\n- Active Sessions: {}", summary, self.store.len())))
    }

    /// Starts over from check-in.
    #[instrument(skip(self))]
    #[tool(description = "Reset the game to initial state")]
    pub async fn reset_game(&self) -> Result<CallToolResult, McpError> {
        self.store.reset(DEFAULT_SESSION);
        Ok(text(
            "🔄 Game has been reset to initial state. Ready for a new workshop experience!",
        ))
    }

    /// Checks the player in.
    #[instrument(skip(self))]
    #[tool(description = "Check in to the event. Only possible once, at the very start.")]
    pub async fn check_in(&self) -> Result<CallToolResult, McpError> {
        Ok(match self.store.with_session(DEFAULT_SESSION, |s| s.check_in()) {
            Ok(outcome) => text(outcome.message),
            Err(e) => rejected(e),
        })
    }

    /// Starts the pending workshop.
    #[instrument(skip(self))]
    #[tool(description = "Start the next workshop after checking in or finishing the previous quiz")]
    pub async fn start_workshop(&self) -> Result<CallToolResult, McpError> {
        Ok(match self.store.with_session(DEFAULT_SESSION, |s| s.start_workshop()) {
            Ok(outcome) => text(outcome.message),
            Err(e) => rejected(e),
        })
    }

    /// Completes the open task.
    #[instrument(skip(self))]
    #[tool(description = "Mark the current workshop's hands-on task as completed")]
    pub async fn complete_task(&self) -> Result<CallToolResult, McpError> {
        let result = self.store.with_session(DEFAULT_SESSION, |s| {
            let task = s.current_task().cloned();
            s.complete_task().map(|outcome| (task, outcome))
        });
        Ok(match result {
            Ok((Some(task), outcome)) => text(format!("{}\n{}: {}", outcome.message, task.name, task.link)),
            Ok((None, outcome)) => text(outcome.message),
            Err(e) => rejected(e),
        })
    }

    /// Shows the question awaiting an answer.
    #[instrument(skip(self))]
    #[tool(description = "Show the current quiz question with numbered options")]
    pub async fn get_current_quiz(&self) -> Result<CallToolResult, McpError> {
        let Some(current) = self.store.peek(DEFAULT_SESSION, |s| s.current_quiz()) else {
            return Ok(rejected(SessionError::NoQuizAvailable));
        };
        let mut message = format!(
            "Question {}/{}: {}\n",
            current.progress.current, current.progress.total, current.quiz.question
        );
        for (i, option) in current.quiz.options.iter().enumerate() {
            message.push_str(&format!("  {}. {}\n", i, option));
        }
        Ok(text(message))
    }

    /// Answers the current quiz question.
    #[instrument(skip(self, req), fields(answer = req.answer))]
    #[tool(description = "Answer the current quiz question with the 0-based option index")]
    pub async fn submit_quiz_answer(
        &self,
        Parameters(req): Parameters<SubmitAnswerRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(
            match self.store.with_session(DEFAULT_SESSION, |s| s.submit_answer(req.answer)) {
                Ok(answer) => text(answer.message),
                Err(e) => rejected(e),
            },
        )
    }

    /// Leaves the event and reports the final score.
    #[instrument(skip(self))]
    #[tool(description = "Exit the event after both workshops and collect the final score")]
    pub async fn exit_workshop(&self) -> Result<CallToolResult, McpError> {
        Ok(match self.store.with_session(DEFAULT_SESSION, |s| s.exit()) {
            Ok(exit) if exit.won => text(format!("{}\n🏆 You won!", exit.message)),
            Ok(exit) => text(format!("{}\nBetter luck next time.", exit.message)),
            Err(e) => rejected(e),
        })
    }
}

impl Default for GameServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for GameServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "AWS Ascend workshop game: check in, complete two workshops with tasks and quizzes, then exit"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
