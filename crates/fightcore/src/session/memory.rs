use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Session, SessionStore};
use crate::error::AppResult;

/// In-process session store. Everything is lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<i64, Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chats with stored state
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, chat_id: i64) -> AppResult<Session> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(&chat_id).cloned().unwrap_or_default())
    }

    async fn save(&self, chat_id: i64, session: &Session) -> AppResult<()> {
        let mut sessions = self.sessions.lock().await;
        if session.is_blank() {
            sessions.remove(&chat_id);
        } else {
            sessions.insert(chat_id, session.clone());
        }
        Ok(())
    }

    async fn remove(&self, chat_id: i64) -> AppResult<()> {
        self.sessions.lock().await.remove(&chat_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sessions_are_isolated_per_chat() {
        let store = MemorySessionStore::new();
        let session = Session {
            authenticated: true,
            ..Default::default()
        };
        store.save(1, &session).await.unwrap();

        assert!(store.load(1).await.unwrap().authenticated);
        assert!(!store.load(2).await.unwrap().authenticated);
    }

    #[tokio::test]
    async fn test_blank_session_is_not_kept() {
        let store = MemorySessionStore::new();
        store.save(7, &Session::default()).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_forgets_chat() {
        let store = MemorySessionStore::new();
        let session = Session {
            authenticated: true,
            pending_username: Some("admin".to_string()),
            ..Default::default()
        };
        store.save(3, &session).await.unwrap();
        assert_eq!(store.len().await, 1);

        store.remove(3).await.unwrap();
        assert_eq!(store.load(3).await.unwrap(), Session::default());
    }
}
