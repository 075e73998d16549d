use crate::config::listing::LIMIT;
use crate::conversation::flow::{Flow, SearchTarget};
use crate::conversation::forms::Step;
use crate::conversation::render;
use crate::error::AppResult;
use crate::storage::{fighters, get_connection, gyms, trainers, DbPool};
use crate::validation::parse_required;

fn prompt(target: SearchTarget) -> &'static str {
    match target {
        SearchTarget::Fighter => "Enter part of the fighter's name or nickname:",
        SearchTarget::Gym => "Enter part of the gym's name, location or owner:",
        SearchTarget::Trainer => "Enter part of the trainer's name or specialty:",
    }
}

pub(crate) fn start(target: SearchTarget) -> Step {
    Step::ask(Flow::Search(target), prompt(target))
}

pub(crate) fn advance(target: SearchTarget, input: &str, pool: &DbPool) -> AppResult<Step> {
    let term = match parse_required(input, "search term") {
        Ok(term) => term,
        Err(e) => return Ok(Step::retry(Flow::Search(target), e, prompt(target))),
    };
    let conn = get_connection(pool)?;
    let title = format!("Results for \"{}\"", term);
    let html = match target {
        SearchTarget::Fighter => render::fighters(&title, &fighters::search_fighters(&conn, &term, LIMIT)?),
        SearchTarget::Gym => render::gyms(&title, &gyms::search_gyms(&conn, &term, LIMIT)?),
        SearchTarget::Trainer => render::trainers(&title, &trainers::search_trainers(&conn, &term, LIMIT)?),
    };
    Ok(Step::done_html(html))
}
