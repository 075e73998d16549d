//! Engine replies to Telegram messages

use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ParseMode, ReplyMarkup};

use fightcore::{Keyboard, Reply};

/// Converts an engine keyboard to a Telegram reply keyboard.
pub fn reply_markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Buttons(rows) => {
            let rows: Vec<Vec<KeyboardButton>> = rows
                .iter()
                .map(|row| row.iter().map(|label| KeyboardButton::new(label.as_str())).collect())
                .collect();
            ReplyMarkup::Keyboard(KeyboardMarkup::new(rows).resize_keyboard())
        }
        Keyboard::Remove => ReplyMarkup::KeyboardRemove(KeyboardRemove::new()),
    }
}

/// Sends the replies in order.
pub async fn send_replies(bot: &Bot, chat_id: ChatId, replies: Vec<Reply>) -> Result<(), teloxide::RequestError> {
    for reply in replies {
        let mut request = bot.send_message(chat_id, reply.text);
        if reply.html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(keyboard) = &reply.keyboard {
            request = request.reply_markup(reply_markup(keyboard));
        }
        request.await?;
    }
    Ok(())
}
