use crate::conversation::flow::{EventForm, Flow};
use crate::conversation::forms::{fighter_by_name, Lookup, Step};
use crate::conversation::menu::{outcome_from_label, outcome_keyboard};
use crate::error::AppResult;
use crate::models::NewMatch;
use crate::storage::{events, get_connection, DbPool};
use crate::validation::{ensure_end_after_start, parse_datetime, parse_optional_datetime, parse_required};

const START_PROMPT: &str = "Enter the start date and time (YYYY-MM-DD HH:MM):";
const END_PROMPT: &str = "Enter the end date and time (YYYY-MM-DD HH:MM) or \"unknown\":";
const LOCATION_PROMPT: &str = "Enter the event location:";
const FIRST_PROMPT: &str = "Enter the first fighter's name:";
const SECOND_PROMPT: &str = "Enter the second fighter's name:";
const OUTCOME_PROMPT: &str = "Choose the outcome:";

pub(crate) fn start() -> Step {
    Step::ask(Flow::AddEvent(EventForm::Start), START_PROMPT)
}

pub(crate) fn advance(form: EventForm, input: &str, pool: &DbPool) -> AppResult<Step> {
    let step = match form {
        EventForm::Start => match parse_datetime(input) {
            Ok(start) => Step::ask(Flow::AddEvent(EventForm::End { start }), END_PROMPT),
            Err(e) => Step::retry(Flow::AddEvent(EventForm::Start), e, START_PROMPT),
        },
        EventForm::End { start } => {
            match parse_optional_datetime(input).and_then(|end| ensure_end_after_start(start, end).map(|_| end)) {
                Ok(end) => Step::ask(Flow::AddEvent(EventForm::Location { start, end }), LOCATION_PROMPT),
                Err(e) => Step::retry(Flow::AddEvent(EventForm::End { start }), e, END_PROMPT),
            }
        }
        EventForm::Location { start, end } => match parse_required(input, "location") {
            Ok(location) => Step::ask(
                Flow::AddEvent(EventForm::FirstFighter { start, end, location }),
                FIRST_PROMPT,
            ),
            Err(e) => Step::retry(Flow::AddEvent(EventForm::Location { start, end }), e, LOCATION_PROMPT),
        },
        EventForm::FirstFighter { start, end, location } => {
            let conn = get_connection(pool)?;
            match fighter_by_name(&conn, input)? {
                Lookup::Found(first) => Step::ask(
                    Flow::AddEvent(EventForm::SecondFighter {
                        start,
                        end,
                        location,
                        first,
                    }),
                    SECOND_PROMPT,
                ),
                Lookup::Rejected(message) => Step::retry(
                    Flow::AddEvent(EventForm::FirstFighter { start, end, location }),
                    message,
                    FIRST_PROMPT,
                ),
            }
        }
        EventForm::SecondFighter {
            start,
            end,
            location,
            first,
        } => {
            let conn = get_connection(pool)?;
            let rejection = match fighter_by_name(&conn, input)? {
                Lookup::Found(second) if second.id != first.id => {
                    return Ok(Step::ask_with(
                        Flow::AddEvent(EventForm::Outcome {
                            start,
                            end,
                            location,
                            first,
                            second,
                        }),
                        OUTCOME_PROMPT,
                        outcome_keyboard(),
                    ));
                }
                Lookup::Found(_) => "A fighter cannot fight themselves. Choose a different opponent.".to_string(),
                Lookup::Rejected(message) => message,
            };
            Step::retry(
                Flow::AddEvent(EventForm::SecondFighter {
                    start,
                    end,
                    location,
                    first,
                }),
                rejection,
                SECOND_PROMPT,
            )
        }
        EventForm::Outcome {
            start,
            end,
            location,
            first,
            second,
        } => match outcome_from_label(input) {
            Some(outcome) => {
                let new_match = NewMatch {
                    start,
                    end,
                    location,
                    first,
                    second,
                    outcome,
                };
                let mut conn = get_connection(pool)?;
                let id = events::create_match(&mut conn, &new_match)?;
                Step::done(format!(
                    "✅ Event #{} added: {} vs {}.",
                    id, new_match.first.name, new_match.second.name
                ))
            }
            None => Step::retry_with(
                Flow::AddEvent(EventForm::Outcome {
                    start,
                    end,
                    location,
                    first,
                    second,
                }),
                "Unknown outcome.",
                OUTCOME_PROMPT,
                outcome_keyboard(),
            ),
        },
    };
    Ok(step)
}
