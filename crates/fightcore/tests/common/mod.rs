//! Shared fixture: a fresh SQLite file, an in-memory session store and an
//! engine wired to both.

#![allow(dead_code)]

use std::sync::Arc;

use fightcore::conversation::MenuAction;
use fightcore::models::{NewFighter, NewGym, NewTrainer};
use fightcore::storage::{fighters, gyms, trainers};
use fightcore::{create_pool, Credentials, DbConnection, DbPool, Engine, MemorySessionStore, Reply};
use secrecy::SecretString;
use tempfile::TempDir;

pub const CHAT_ID: i64 = 123456789;
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "hunter2";

pub struct TestBot {
    pub engine: Engine,
    pub pool: Arc<DbPool>,
    pub sessions: MemorySessionStore,
    _dir: TempDir,
}

impl TestBot {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fightclub.sqlite");
        let pool = Arc::new(create_pool(path.to_str().unwrap()).unwrap());
        let sessions = MemorySessionStore::new();
        let credentials = Credentials::new(ADMIN_USERNAME, SecretString::from(ADMIN_PASSWORD));
        let engine = Engine::new(pool.clone(), Arc::new(sessions.clone()), credentials).with_idle_timeout(None);
        Self {
            engine,
            pool,
            sessions,
            _dir: dir,
        }
    }

    /// Sends `text` from the default chat.
    pub async fn send(&self, text: &str) -> Vec<Reply> {
        self.send_from(CHAT_ID, text).await
    }

    pub async fn send_from(&self, chat_id: i64, text: &str) -> Vec<Reply> {
        let replies = self.engine.handle_text(chat_id, text).await.unwrap();
        assert!(!replies.is_empty(), "no reply to {:?}", text);
        replies
    }

    /// Sends `text` and returns the text of the last reply.
    pub async fn say(&self, text: &str) -> String {
        self.send(text).await.pop().unwrap().text
    }

    pub async fn press(&self, action: MenuAction) -> String {
        self.say(action.label()).await
    }

    /// Runs several messages, returning the text of the last reply.
    pub async fn script(&self, lines: &[&str]) -> String {
        let mut last = String::new();
        for line in lines {
            last = self.say(line).await;
        }
        last
    }

    pub async fn login(&self) {
        self.login_from(CHAT_ID).await;
    }

    pub async fn login_from(&self, chat_id: i64) {
        self.send_from(chat_id, MenuAction::Login.label()).await;
        self.send_from(chat_id, ADMIN_USERNAME).await;
        let reply = self.send_from(chat_id, ADMIN_PASSWORD).await;
        assert!(reply[0].text.contains("Login successful"), "login failed: {:?}", reply);
    }

    pub fn conn(&self) -> DbConnection {
        self.pool.get().unwrap()
    }

    pub fn count(&self, table: &str) -> i64 {
        self.conn()
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap()
    }

    pub fn add_gym(&self, name: &str) -> i64 {
        gyms::create_gym(
            &self.conn(),
            &NewGym {
                name: name.to_string(),
                location: "Tehran".to_string(),
                owner: "Reza Karimi".to_string(),
            },
        )
        .unwrap()
    }

    pub fn add_fighter(&self, name: &str) -> i64 {
        fighters::create_fighter(&self.conn(), &new_fighter(name, None)).unwrap()
    }

    pub fn add_trainer(&self, name: &str) -> i64 {
        trainers::create_trainer(
            &self.conn(),
            &NewTrainer {
                name: name.to_string(),
                specialty: "Boxing".to_string(),
                gym_id: None,
            },
        )
        .unwrap()
    }
}

pub fn new_fighter(name: &str, gym_id: Option<i64>) -> NewFighter {
    NewFighter {
        name: name.to_string(),
        nickname: None,
        weight_class: "Lightweight".to_string(),
        age: 25,
        nationality: None,
        gym_id,
    }
}
