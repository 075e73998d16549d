//! Fightcore - fight-club registry behind the fightbot Telegram bot
//!
//! This library holds everything except the Telegram transport: the SQLite
//! schema and queries, per-chat sessions and the menu/form conversation
//! engine that turns incoming text into replies.
//!
//! # Module Structure
//!
//! - `config`, `error`, `logging`: ambient configuration, error types and logger setup
//! - `models`, `validation`: records and input parsing
//! - `storage`: connection pool, migrations and queries
//! - `session`: per-chat state (memory or Redis)
//! - `conversation`: menus, forms and the message engine

pub mod config;
pub mod conversation;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod storage;
pub mod validation;

// Re-export commonly used types for convenience
pub use conversation::{Credentials, Engine, Keyboard, Reply};
pub use error::{AppError, AppResult};
pub use session::{MemorySessionStore, RedisSessionStore, Session, SessionStore};
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
