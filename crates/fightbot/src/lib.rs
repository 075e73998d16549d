//! Fightbot - Telegram front-end of the fight-club registry
//!
//! The conversation itself lives in `fightcore`; this crate turns Telegram
//! updates into engine calls and engine replies into Telegram messages.

pub mod cli;
pub mod telegram;

pub use telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};
