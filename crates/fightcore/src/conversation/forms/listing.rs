//! "Show ..." menu entries
//!
//! Long listings come back as several messages.

use crate::config::listing::{LIMIT, MAX_MESSAGE_LENGTH};
use crate::conversation::render;
use crate::conversation::reply::Reply;
use crate::error::AppResult;
use crate::storage::{events, fighters, get_connection, gyms, trainers, DbPool};

fn pages(html: String) -> Vec<Reply> {
    render::split_message(&html, MAX_MESSAGE_LENGTH)
        .into_iter()
        .map(Reply::html)
        .collect()
}

pub(crate) fn show_fighters(pool: &DbPool) -> AppResult<Vec<Reply>> {
    let conn = get_connection(pool)?;
    Ok(pages(render::fighters("Fighters", &fighters::list_fighters(&conn, LIMIT)?)))
}

pub(crate) fn show_gyms(pool: &DbPool) -> AppResult<Vec<Reply>> {
    let conn = get_connection(pool)?;
    Ok(pages(render::gyms("Gyms by reputation", &gyms::list_gyms(&conn, LIMIT)?)))
}

pub(crate) fn show_trainers(pool: &DbPool) -> AppResult<Vec<Reply>> {
    let conn = get_connection(pool)?;
    Ok(pages(render::trainers("Trainers", &trainers::list_trainers(&conn, LIMIT)?)))
}

pub(crate) fn show_events(pool: &DbPool) -> AppResult<Vec<Reply>> {
    let conn = get_connection(pool)?;
    Ok(pages(render::match_events("Latest events", &events::list_matches(&conn, LIMIT)?)))
}
