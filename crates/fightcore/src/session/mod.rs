//! Per-chat conversation state
//!
//! A [`Session`] holds whether the chat is logged in, the username typed
//! during login and the form in progress. Stores are keyed by chat id and
//! shared by every handler, so all of them take `&self`.

mod memory;
mod redis_store;

pub use memory::MemorySessionStore;
pub use redis_store::RedisSessionStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversation::flow::Flow;
use crate::error::AppResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Set by a successful login, cleared only by logout
    pub authenticated: bool,
    /// Username typed at the first login step, waiting for the password
    pub pending_username: Option<String>,
    /// Form in progress, at most one per chat
    pub flow: Option<Flow>,
    /// Last time this chat sent a message
    pub touched_at: Option<DateTime<Utc>>,
}

impl Session {
    /// True when the session carries nothing worth storing.
    pub fn is_blank(&self) -> bool {
        !self.authenticated && self.pending_username.is_none() && self.flow.is_none()
    }

    /// Drops the form if the chat has been idle longer than `timeout`.
    ///
    /// # Returns
    ///
    /// `true` when a form was discarded.
    pub fn expire_flow(&mut self, now: DateTime<Utc>, timeout: Option<std::time::Duration>) -> bool {
        let (Some(timeout), Some(touched), Some(_)) = (timeout, self.touched_at, self.flow.as_ref()) else {
            return false;
        };
        let idle = now.signed_duration_since(touched);
        match chrono::Duration::from_std(timeout) {
            Ok(limit) if idle > limit => {
                self.flow = None;
                self.pending_username = None;
                true
            }
            _ => false,
        }
    }
}

/// Storage for sessions keyed by chat id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored session, or a fresh one for unknown chats.
    async fn load(&self, chat_id: i64) -> AppResult<Session>;

    async fn save(&self, chat_id: i64, session: &Session) -> AppResult<()>;

    /// Forgets the chat entirely (logout).
    async fn remove(&self, chat_id: i64) -> AppResult<()>;
}
