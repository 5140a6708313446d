use std::{collections::HashMap, sync::Arc};

use derive_more::Display;
use parking_lot::Mutex;
use rand::{distributions::Alphanumeric, Rng};
use tracing::info;

use crate::{GameConfig, GameSession, SessionError};

const ID_LENGTH: usize = 32;

/// Opaque handle a client uses to find its game again
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// A fresh random alphanumeric id
    pub fn generate() -> Self {
        let id = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(ID_LENGTH)
            .map(char::from)
            .collect();

        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A session that can be handed to another thread while the registry stays available
pub type SharedSession = Arc<Mutex<GameSession>>;

/// Every live game, keyed by [SessionId]
///
/// The registry only hands out [SharedSession]s so a long search holds that one session's lock,
/// never the registry itself.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, SharedSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new game under a new id
    ///
    /// Passing the id of a running game discards that game first
    pub fn start(
        &mut self,
        previous: Option<&SessionId>,
        config: GameConfig,
    ) -> (SessionId, SharedSession) {
        if let Some(previous) = previous {
            if self.sessions.remove(previous).is_some() {
                info!(session = %previous, "replacing running game");
            }
        }

        let id = SessionId::generate();
        let session = Arc::new(Mutex::new(GameSession::new(config)));
        self.sessions.insert(id.clone(), session.clone());
        info!(session = %id, live = self.sessions.len(), "started game");

        (id, session)
    }

    pub fn get(&self, id: &SessionId) -> Result<SharedSession, SessionError> {
        self.sessions
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownSession { id: id.clone() })
    }

    /// Drop a game, returns whether it existed
    pub fn end(&mut self, id: &SessionId) -> bool {
        let existed = self.sessions.remove(id).is_some();
        if existed {
            info!(session = %id, "ended game");
        }

        existed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
