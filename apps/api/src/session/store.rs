//! In-memory session registry. Sessions live for the process lifetime only;
//! there is no persistence layer.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::session::models::SessionContext;

/// Shared map of live sessions. Handlers take short lock windows around the
/// pure state transitions; the lock is never held across an LLM call.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionContext>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, ctx: SessionContext) {
        self.sessions.write().await.insert(ctx.id, ctx);
    }

    /// Snapshot of a session, if it exists.
    pub async fn get(&self, id: Uuid) -> Option<SessionContext> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Applies `f` to the session under the write lock. Returns `None` when
    /// the session does not exist.
    pub async fn update<F, R>(&self, id: Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut SessionContext) -> R,
    {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(&id).map(f)
    }
}
