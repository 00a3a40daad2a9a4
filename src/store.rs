//! Session ownership shared by the REST and MCP front-ends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use strictly_workshop::{Catalog, GameSession, GameSnapshot, ShuffleMode};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a player's session.
pub type SessionId = String;

/// Session used when a client does not name one.
pub const DEFAULT_SESSION: &str = "default";

/// Live sessions kept before the least recently used one is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

#[derive(Debug)]
struct Entry {
    session: GameSession,
    touched: Instant,
}

/// Owns every live session, keyed by client session id.
///
/// Each operation runs under the store lock, so the multi-step field
/// updates inside a session are never interleaved. Sessions are created
/// only by mutating operations; read-only lookups of an unknown id see a
/// fresh session that is not stored.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, Entry>>>,
    catalog: Arc<Catalog>,
    shuffle: ShuffleMode,
    capacity: usize,
}

impl SessionStore {
    /// Creates an empty store whose sessions play `catalog`.
    #[instrument(skip(catalog))]
    pub fn new(catalog: Catalog, shuffle: ShuffleMode) -> Self {
        info!("Creating session store");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            catalog: Arc::new(catalog),
            shuffle,
            capacity: DEFAULT_MAX_SESSIONS,
        }
    }

    /// Caps the number of live sessions. A cap of zero is treated as one.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    fn fresh_session(&self) -> GameSession {
        GameSession::new(Arc::clone(&self.catalog), self.shuffle)
    }

    fn insert(&self, sessions: &mut HashMap<SessionId, Entry>, id: &str, session: GameSession) {
        if !sessions.contains_key(id) {
            while sessions.len() >= self.capacity {
                let Some(oldest) = sessions
                    .iter()
                    .min_by_key(|(_, entry)| entry.touched)
                    .map(|(key, _)| key.clone())
                else {
                    break;
                };
                warn!(session_id = %oldest, "Session store full, evicting least recently used");
                sessions.remove(&oldest);
            }
        }
        sessions.insert(
            id.to_string(),
            Entry {
                session,
                touched: Instant::now(),
            },
        );
    }

    /// Runs `f` against the session `id`, creating it on first use.
    #[instrument(skip(self, f))]
    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut GameSession) -> R) -> R {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        if !sessions.contains_key(id) {
            debug!(session_id = id, "Creating session on first use");
            let session = self.fresh_session();
            self.insert(&mut sessions, id, session);
        }
        match sessions.get_mut(id) {
            Some(entry) => {
                entry.touched = Instant::now();
                f(&mut entry.session)
            }
            // capacity is at least one, so the entry just inserted is present
            None => f(&mut self.fresh_session()),
        }
    }

    /// Runs `f` against session `id` without creating it.
    ///
    /// An unknown id is served from a throwaway fresh session, which reads
    /// exactly like a session nobody has played yet.
    #[instrument(skip(self, f))]
    pub fn peek<R>(&self, id: &str, f: impl FnOnce(&mut GameSession) -> R) -> R {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        match sessions.get_mut(id) {
            Some(entry) => f(&mut entry.session),
            None => f(&mut self.fresh_session()),
        }
    }

    /// Current snapshot of session `id`.
    pub fn snapshot(&self, id: &str) -> GameSnapshot {
        self.peek(id, |s| s.snapshot())
    }

    /// Replaces session `id` with a brand-new one and returns its snapshot.
    #[instrument(skip(self))]
    pub fn reset(&self, id: &str) -> GameSnapshot {
        let session = self.fresh_session();
        let snapshot = session.snapshot();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        self.insert(&mut sessions, id, session);
        info!(session_id = id, "Session reset");
        snapshot
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when no session has been created yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Catalog::standard(), ShuffleMode::Random)
    }
}
