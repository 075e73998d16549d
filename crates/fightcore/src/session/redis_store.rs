use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use super::{Session, SessionStore};
use crate::config::session::REDIS_KEY_PREFIX;
use crate::error::AppResult;

/// Session store backed by Redis; sessions survive bot restarts.
///
/// Each chat is one JSON string under `fightbot:session:<chat_id>`.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
}

impl RedisSessionStore {
    /// Connects to `redis_url` (e.g. `redis://127.0.0.1:6379/0`).
    pub async fn connect(redis_url: &str) -> AppResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        log::info!("Connected to Redis session store");
        Ok(Self { conn })
    }

    fn key(chat_id: i64) -> String {
        format!("{}{}", REDIS_KEY_PREFIX, chat_id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, chat_id: i64) -> AppResult<Session> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(Self::key(chat_id)).await?;
        match raw {
            Some(json) => match serde_json::from_str(&json) {
                Ok(session) => Ok(session),
                Err(e) => {
                    // Stale layout from an older build; start over rather than lock the chat out.
                    log::warn!("Discarding unreadable session for chat {}: {}", chat_id, e);
                    Ok(Session::default())
                }
            },
            None => Ok(Session::default()),
        }
    }

    async fn save(&self, chat_id: i64, session: &Session) -> AppResult<()> {
        if session.is_blank() {
            return self.remove(chat_id).await;
        }
        let json = serde_json::to_string(session)?;
        let mut conn = self.conn.clone();
        let _: () = conn.set(Self::key(chat_id), json).await?;
        Ok(())
    }

    async fn remove(&self, chat_id: i64) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(Self::key(chat_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(RedisSessionStore::key(42), "fightbot:session:42");
        assert_eq!(RedisSessionStore::key(-1001), "fightbot:session:-1001");
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        assert!(RedisSessionStore::connect("not a url").await.is_err());
    }
}
