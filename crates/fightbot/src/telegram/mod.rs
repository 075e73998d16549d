//! Telegram integration
//!
//! - `bot`: command list and bot construction
//! - `schema`: dispatcher handler tree
//! - `keyboard`: engine replies to Telegram messages

mod bot;
mod keyboard;
mod schema;
mod types;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use keyboard::{reply_markup, send_replies};
pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
