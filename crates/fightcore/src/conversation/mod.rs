//! Chat conversation logic, independent of the messaging transport
//!
//! The transport hands every incoming text to [`Engine`] and sends back the
//! [`Reply`] values it returns.

pub mod engine;
pub mod flow;
mod forms;
pub mod menu;
pub mod render;
pub mod reply;

pub use engine::Engine;
pub use forms::auth::Credentials;
pub use menu::{MenuAction, SlashCommand};
pub use reply::{Keyboard, Reply};
