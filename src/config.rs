//! Server configuration and catalog loading.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::store::{DEFAULT_MAX_SESSIONS, SessionStore};
use strictly_workshop::{Catalog, Quiz, ShuffleMode, Task, Workshop};
use tracing::{debug, info, instrument, warn};

/// Environment variable that overrides the configured quiz seed.
pub const QUIZ_SEED_ENV: &str = "ASCEND_QUIZ_SEED";

/// Configuration for the quest servers.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct AscendConfig {
    /// Host the REST server binds to.
    #[serde(default = "default_host")]
    host: String,

    /// Port the REST server binds to.
    #[serde(default = "default_port")]
    port: u16,

    /// Directory holding the browser front-end.
    #[serde(default = "default_static_dir")]
    static_dir: PathBuf,

    /// Fixed seed for quiz order. Random when absent.
    #[serde(default)]
    quiz_seed: Option<u64>,

    /// TOML file with custom workshop content. Built-in content when absent.
    #[serde(default)]
    catalog_path: Option<PathBuf>,

    /// Live sessions kept before the least recently used is evicted.
    #[serde(default = "default_max_sessions")]
    max_sessions: usize,
}

#[instrument]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_port() -> u16 {
    3000
}

#[instrument]
fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

impl Default for AscendConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            quiz_seed: None,
            catalog_path: None,
            max_sessions: default_max_sessions(),
        }
    }
}

impl AscendConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, falls back to defaults, then applies
    /// environment overrides.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = if path.as_ref().exists() {
            Self::from_file(path.as_ref())?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        if let Ok(raw) = std::env::var(QUIZ_SEED_ENV) {
            let seed = raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::new(format!("{} must be an unsigned integer: {}", QUIZ_SEED_ENV, e))
            })?;
            debug!(seed, "Quiz seed taken from environment");
            config.quiz_seed = Some(seed);
        }

        Ok(config)
    }

    /// Overrides the bind host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Overrides the bind port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Overrides the quiz seed.
    pub fn with_quiz_seed(mut self, seed: Option<u64>) -> Self {
        self.quiz_seed = seed;
        self
    }

    /// How new sessions order their quizzes.
    pub fn shuffle_mode(&self) -> ShuffleMode {
        match self.quiz_seed {
            Some(seed) => ShuffleMode::Seeded(seed),
            None => ShuffleMode::Random,
        }
    }

    /// Builds the session store both front-ends share.
    pub fn session_store(&self) -> Result<SessionStore, ConfigError> {
        Ok(SessionStore::new(self.load_catalog()?, self.shuffle_mode()).with_capacity(self.max_sessions))
    }

    /// Loads the configured catalog, or the built-in one.
    #[instrument(skip(self), fields(catalog_path = ?self.catalog_path))]
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => load_catalog_file(path),
            None => Ok(Catalog::standard()),
        }
    }
}

/// On-disk catalog layout: one `[[workshops]]` table per workshop.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    workshops: Vec<WorkshopEntry>,
}

#[derive(Debug, Deserialize)]
struct WorkshopEntry {
    name: String,
    task: TaskEntry,
    quizzes: Vec<Quiz>,
}

#[derive(Debug, Deserialize)]
struct TaskEntry {
    name: String,
    #[serde(default = "default_task_points")]
    points: i64,
    link: String,
}

fn default_task_points() -> i64 {
    5
}

/// Reads and validates a catalog TOML file.
#[instrument(fields(path = %path.display()))]
pub fn load_catalog_file(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::new(format!("Failed to read catalog file: {}", e)))?;
    let file: CatalogFile = toml::from_str(&content)
        .map_err(|e| ConfigError::new(format!("Failed to parse catalog: {}", e)))?;

    let [first, second]: [WorkshopEntry; 2] = file.workshops.try_into().map_err(|w: Vec<_>| {
        warn!(count = w.len(), "Catalog must describe exactly two workshops");
        ConfigError::new(format!("Catalog must describe exactly two workshops, found {}", w.len()))
    })?;

    let split = |index: usize, entry: WorkshopEntry| {
        (
            Workshop { name: entry.name },
            Task {
                name: entry.task.name,
                workshop_index: index,
                points: entry.task.points,
                link: entry.task.link,
            },
            entry.quizzes,
        )
    };
    let (w1, t1, q1) = split(0, first);
    let (w2, t2, q2) = split(1, second);

    let catalog = Catalog::new([w1, w2], [t1, t2], [q1, q2])
        .map_err(|e| ConfigError::new(format!("Invalid catalog: {}", e)))?;
    info!("Catalog loaded");
    Ok(catalog)
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
