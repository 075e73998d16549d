//! Form steps
//!
//! Every form module exposes a `start` that returns the first prompt and an
//! `advance` that consumes one message. A step that rejects its input keeps
//! the form where it is; the engine stores whatever [`Step::Next`] holds.

pub(crate) mod auth;
pub(crate) mod edit;
pub(crate) mod events;
pub(crate) mod fighters;
pub(crate) mod gyms;
pub(crate) mod listing;
pub(crate) mod search;
pub(crate) mod trainers;
pub(crate) mod training;

use std::fmt::Display;

use rusqlite::Connection;

use crate::config::listing::MAX_MESSAGE_LENGTH;
use crate::conversation::flow::Flow;
use crate::conversation::menu::{cancel_keyboard, main_keyboard, training_keyboard};
use crate::conversation::render;
use crate::conversation::reply::{Keyboard, Reply};
use crate::error::AppResult;
use crate::models::NamedRef;
use crate::storage::{fighters as fighter_store, gyms as gym_store, trainers as trainer_store};
use crate::validation;

/// What a form step decided.
#[derive(Debug)]
pub(crate) enum Step {
    /// Keep the form open in this state and send the prompt
    Next(Flow, Reply),
    /// The form is over; back to a menu
    Done(Vec<Reply>),
}

impl Step {
    pub(crate) fn ask(flow: Flow, prompt: impl Into<String>) -> Self {
        Self::ask_with(flow, prompt, cancel_keyboard())
    }

    pub(crate) fn ask_with(flow: Flow, prompt: impl Into<String>, keyboard: Keyboard) -> Self {
        Step::Next(flow, Reply::text(prompt).with_keyboard(keyboard))
    }

    /// Rejected input: error first, then the same prompt again.
    pub(crate) fn retry(flow: Flow, error: impl Display, prompt: &str) -> Self {
        Self::retry_with(flow, error, prompt, cancel_keyboard())
    }

    pub(crate) fn retry_with(flow: Flow, error: impl Display, prompt: &str, keyboard: Keyboard) -> Self {
        Self::ask_with(flow, format!("❌ {}\n\n{}", error, prompt), keyboard)
    }

    /// Back to the main menu.
    pub(crate) fn done(text: impl Into<String>) -> Self {
        Step::Done(vec![Reply::text(text).with_keyboard(main_keyboard())])
    }

    pub(crate) fn done_html(html: impl Into<String>) -> Self {
        Step::Done(html_pages(&html.into(), main_keyboard()))
    }

    /// Back to the training submenu.
    pub(crate) fn done_training(text: impl Into<String>) -> Self {
        Step::Done(vec![Reply::text(text).with_keyboard(training_keyboard())])
    }

    pub(crate) fn done_training_html(html: impl Into<String>) -> Self {
        Step::Done(html_pages(&html.into(), training_keyboard()))
    }
}

/// HTML split into Telegram-sized messages; the keyboard goes on the last one.
pub(crate) fn html_pages(html: &str, keyboard: Keyboard) -> Vec<Reply> {
    let mut replies: Vec<Reply> = render::split_message(html, MAX_MESSAGE_LENGTH)
        .into_iter()
        .map(Reply::html)
        .collect();
    if let Some(last) = replies.pop() {
        replies.push(last.with_keyboard(keyboard));
    }
    replies
}

/// Outcome of resolving typed text to an existing record.
pub(crate) enum Lookup {
    Found(NamedRef),
    /// Text to show before re-prompting
    Rejected(String),
}

pub(crate) fn fighter_by_name(conn: &Connection, input: &str) -> AppResult<Lookup> {
    let name = input.trim();
    let fighter = match fighter_store::find_fighter_id_by_name(conn, name)? {
        Some(id) => fighter_store::get_fighter(conn, id)?,
        None => None,
    };
    Ok(match fighter {
        Some(f) => Lookup::Found(NamedRef { id: f.id, name: f.name }),
        None => Lookup::Rejected(format!("Fighter \"{}\" not found.", name)),
    })
}

pub(crate) fn fighter_by_id(conn: &Connection, input: &str) -> AppResult<Lookup> {
    let id = match validation::parse_id(input) {
        Ok(id) => id,
        Err(e) => return Ok(Lookup::Rejected(e.to_string())),
    };
    Ok(match fighter_store::get_fighter(conn, id)? {
        Some(f) => Lookup::Found(NamedRef { id: f.id, name: f.name }),
        None => Lookup::Rejected(format!("No fighter with ID {}.", id)),
    })
}

pub(crate) fn trainer_by_id(conn: &Connection, input: &str) -> AppResult<Lookup> {
    let id = match validation::parse_id(input) {
        Ok(id) => id,
        Err(e) => return Ok(Lookup::Rejected(e.to_string())),
    };
    Ok(match trainer_store::get_trainer(conn, id)? {
        Some(t) => Lookup::Found(NamedRef { id: t.id, name: t.name }),
        None => Lookup::Rejected(format!("No trainer with ID {}.", id)),
    })
}

/// Optional gym reference typed by name; skip words mean "no gym".
pub(crate) fn optional_gym(conn: &Connection, input: &str) -> AppResult<Result<Option<NamedRef>, String>> {
    if validation::is_skip(input) {
        return Ok(Ok(None));
    }
    let name = input.trim();
    let gym = match gym_store::find_gym_id_by_name(conn, name)? {
        Some(id) => gym_store::get_gym(conn, id)?,
        None => None,
    };
    Ok(match gym {
        Some(g) => Ok(Some(NamedRef { id: g.id, name: g.name })),
        None => Err(format!("Gym \"{}\" not found. Check the name or type \"-\" for no gym.", name)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::flow::GymForm;

    #[test]
    fn test_retry_repeats_prompt_after_error() {
        let Step::Next(flow, reply) = Step::retry(Flow::AddGym(GymForm::Name), "Too short.", "Enter the gym name:")
        else {
            panic!("retry must keep the form open");
        };
        assert_eq!(flow, Flow::AddGym(GymForm::Name));
        assert_eq!(reply.text, "❌ Too short.\n\nEnter the gym name:");
        assert_eq!(reply.keyboard, Some(cancel_keyboard()));
    }
}
