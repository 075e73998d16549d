//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::bot::Command;
use super::keyboard::send_replies;
use super::types::{HandlerDeps, HandlerError};

const FAILURE_TEXT: &str = "⚠️ Something went wrong, please try again.";
const TEXT_ONLY: &str = "Please send text or use the menu buttons.";

/// Creates the main dispatcher schema for the Telegram bot.
///
/// # Arguments
/// * `deps` - Handler dependencies (conversation engine)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_messages = deps;

    dptree::entry()
        // Command handler
        .branch(command_handler(deps_commands))
        // Everything else with text goes to the conversation engine
        .branch(message_handler(deps_messages))
        .branch(non_text_handler())
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);

                match deps.engine.handle_command(msg.chat.id.0, cmd.into()).await {
                    Ok(replies) => send_replies(&bot, msg.chat.id, replies).await?,
                    Err(e) => {
                        log::error!("❌ Command {:?} failed for chat {}: {}", cmd, msg.chat.id, e);
                        bot.send_message(msg.chat.id, FAILURE_TEXT).await?;
                    }
                }
                Ok(())
            }
        },
    ))
}

fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let text = msg.text().unwrap_or_default();
                match deps.engine.handle_text(msg.chat.id.0, text).await {
                    Ok(replies) => send_replies(&bot, msg.chat.id, replies).await?,
                    Err(e) => {
                        log::error!("❌ Message from chat {} failed: {}", msg.chat.id, e);
                        bot.send_message(msg.chat.id, FAILURE_TEXT).await?;
                    }
                }
                Ok(())
            }
        })
}

fn non_text_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message().endpoint(|bot: Bot, msg: Message| async move {
        bot.send_message(msg.chat.id, TEXT_ONLY).await?;
        Ok(())
    })
}
