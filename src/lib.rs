//! Strictly Ascend - workshop quest server
//!
//! Wraps the [`strictly_workshop`] state machine in two transports that
//! share one [`SessionStore`]:
//!
//! - **REST**: the `/api/*` routes plus the static browser front-end
//! - **MCP**: a tool server for LLM agents, which can also start the REST
//!   server in-process
//!
//! # Example
//!
//! ```no_run
//! use strictly_ascend::{AscendConfig, rest};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AscendConfig::default();
//! let store = config.session_store()?;
//! let app = rest::app(store, config.static_dir());
//! let listener = tokio::net::TcpListener::bind(("127.0.0.1", *config.port())).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
pub mod rest;
mod server;
mod store;

// Crate-level exports - Configuration
pub use config::{AscendConfig, ConfigError, QUIZ_SEED_ENV, load_catalog_file};

// Crate-level exports - Server types
pub use server::{GameServer, StartServerRequest, SubmitAnswerRequest};

// Crate-level exports - Session ownership
pub use store::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION, SessionId, SessionStore};

// Crate-level exports - Game types
pub use strictly_workshop::{
    Catalog, CurrentQuiz, GameSession, GameSnapshot, Phase, SessionError, ShuffleMode, WorkshopSlot,
};
