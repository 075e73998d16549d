//! Edit forms: pick a record by id, pick a field, type the new value,
//! confirm.
//!
//! The update only runs on an explicit "Yes, apply". "No, cancel" and any
//! other answer at the confirmation step leave the record untouched.

use rusqlite::Connection;
use strum::IntoEnumIterator;

use crate::conversation::flow::{EditForm, Flow};
use crate::conversation::forms::{optional_gym, Step};
use crate::conversation::menu::{
    cancel_keyboard, choices_keyboard, confirm_keyboard, outcome_from_label, outcome_keyboard, status_keyboard,
    CONFIRM_NO, CONFIRM_YES,
};
use crate::conversation::render;
use crate::conversation::reply::{Keyboard, Reply};
use crate::error::AppResult;
use crate::models::{FieldValue, FighterField, GymField, MatchField, TrainerField};
use crate::storage::{events, fighters, get_connection, gyms, trainers, DbPool};
use crate::validation::{self, ensure_end_after_start};

/// A record type that can go through the edit form.
pub(crate) trait EditTarget {
    type Field: Copy + PartialEq + IntoEnumIterator + std::fmt::Debug;

    /// Lowercase record name used in prompts
    const ENTITY: &'static str;

    fn flow(form: EditForm<Self::Field>) -> Flow;

    fn label(field: Self::Field) -> &'static str;

    /// Current record as HTML, `None` when the id is unknown.
    fn describe(conn: &Connection, id: i64) -> AppResult<Option<String>>;

    fn value_prompt(field: Self::Field) -> (&'static str, Keyboard);

    /// `Ok(Err(message))` rejects the input and re-prompts.
    fn parse_value(conn: &Connection, id: i64, field: Self::Field, input: &str) -> AppResult<Result<FieldValue, String>>;

    /// Writes the value; returns the number of updated rows.
    fn apply(conn: &mut Connection, id: i64, field: Self::Field, value: &FieldValue) -> AppResult<usize>;
}

fn text_prompt(prompt: &'static str) -> (&'static str, Keyboard) {
    (prompt, cancel_keyboard())
}

fn field_keyboard<T: EditTarget>() -> Keyboard {
    let labels: Vec<&str> = T::Field::iter().map(T::label).collect();
    choices_keyboard(&labels, 2)
}

fn id_prompt<T: EditTarget>() -> String {
    format!("Enter the {} ID:", T::ENTITY)
}

const FIELD_PROMPT: &str = "Which field do you want to change?";

pub(crate) fn start<T: EditTarget>() -> Step {
    Step::ask(T::flow(EditForm::Id), id_prompt::<T>())
}

pub(crate) fn advance<T: EditTarget>(form: EditForm<T::Field>, input: &str, pool: &DbPool) -> AppResult<Step> {
    let mut conn = get_connection(pool)?;
    let step = match form {
        EditForm::Id => {
            let prompt = id_prompt::<T>();
            match validation::parse_id(input) {
                Ok(id) => match T::describe(&conn, id)? {
                    Some(current) => Step::Next(
                        T::flow(EditForm::Field { id }),
                        Reply::html(format!("{}\n\n{}", current, FIELD_PROMPT)).with_keyboard(field_keyboard::<T>()),
                    ),
                    None => Step::retry(T::flow(EditForm::Id), format!("No {} with ID {}.", T::ENTITY, id), &prompt),
                },
                Err(e) => Step::retry(T::flow(EditForm::Id), e, &prompt),
            }
        }
        EditForm::Field { id } => {
            let input = input.trim();
            match T::Field::iter().find(|field| T::label(*field) == input) {
                Some(field) => {
                    let (prompt, keyboard) = T::value_prompt(field);
                    Step::ask_with(T::flow(EditForm::Value { id, field }), prompt, keyboard)
                }
                None => Step::retry_with(
                    T::flow(EditForm::Field { id }),
                    "Unknown field.",
                    FIELD_PROMPT,
                    field_keyboard::<T>(),
                ),
            }
        }
        EditForm::Value { id, field } => match T::parse_value(&conn, id, field, input)? {
            Ok(value) => {
                let question = format!(
                    "Change {} of {} #{} to \"{}\"?",
                    T::label(field).to_lowercase(),
                    T::ENTITY,
                    id,
                    render::field_value(&value)
                );
                Step::ask_with(T::flow(EditForm::Confirm { id, field, value }), question, confirm_keyboard())
            }
            Err(message) => {
                let (prompt, keyboard) = T::value_prompt(field);
                Step::retry_with(T::flow(EditForm::Value { id, field }), message, prompt, keyboard)
            }
        },
        EditForm::Confirm { id, field, value } => match input.trim() {
            CONFIRM_YES => {
                if T::apply(&mut conn, id, field, &value)? == 0 {
                    Step::done(format!("⚠️ The {} #{} no longer exists. Nothing was changed.", T::ENTITY, id))
                } else {
                    Step::done(format!("✅ {} of {} #{} updated.", T::label(field), T::ENTITY, id))
                }
            }
            CONFIRM_NO => Step::done("Edit cancelled. Nothing was changed."),
            _ => Step::done("Invalid command. Edit cancelled, nothing was changed."),
        },
    };
    Ok(step)
}

pub(crate) struct GymEdit;

impl EditTarget for GymEdit {
    type Field = GymField;
    const ENTITY: &'static str = "gym";

    fn flow(form: EditForm<GymField>) -> Flow {
        Flow::EditGym(form)
    }

    fn label(field: GymField) -> &'static str {
        match field {
            GymField::Name => "Name",
            GymField::Location => "Location",
            GymField::Owner => "Owner",
            GymField::ReputationScore => "Reputation",
        }
    }

    fn describe(conn: &Connection, id: i64) -> AppResult<Option<String>> {
        Ok(gyms::get_gym(conn, id)?.map(|g| render::gym(&g)))
    }

    fn value_prompt(field: GymField) -> (&'static str, Keyboard) {
        text_prompt(match field {
            GymField::Name => "Enter the new name:",
            GymField::Location => "Enter the new location:",
            GymField::Owner => "Enter the new owner's name:",
            GymField::ReputationScore => "Enter the new reputation score (0-100):",
        })
    }

    fn parse_value(_conn: &Connection, _id: i64, field: GymField, input: &str) -> AppResult<Result<FieldValue, String>> {
        let value = match field {
            GymField::Name | GymField::Owner => validation::parse_name(input).map(FieldValue::Text),
            GymField::Location => validation::parse_required(input, "location").map(FieldValue::Text),
            GymField::ReputationScore => validation::parse_reputation(input).map(FieldValue::Integer),
        };
        Ok(value.map_err(|e| e.to_string()))
    }

    fn apply(conn: &mut Connection, id: i64, field: GymField, value: &FieldValue) -> AppResult<usize> {
        gyms::update_gym_field(conn, id, field, value)
    }
}

pub(crate) struct FighterEdit;

impl EditTarget for FighterEdit {
    type Field = FighterField;
    const ENTITY: &'static str = "fighter";

    fn flow(form: EditForm<FighterField>) -> Flow {
        Flow::EditFighter(form)
    }

    fn label(field: FighterField) -> &'static str {
        match field {
            FighterField::Name => "Name",
            FighterField::Nickname => "Nickname",
            FighterField::WeightClass => "Weight class",
            FighterField::Age => "Age",
            FighterField::Nationality => "Nationality",
            FighterField::Status => "Status",
            FighterField::Gym => "Gym",
        }
    }

    fn describe(conn: &Connection, id: i64) -> AppResult<Option<String>> {
        Ok(fighters::get_fighter(conn, id)?.map(|f| render::fighter(&f)))
    }

    fn value_prompt(field: FighterField) -> (&'static str, Keyboard) {
        match field {
            FighterField::Name => text_prompt("Enter the new name:"),
            FighterField::Nickname => text_prompt("Enter the new nickname (or \"-\" to clear it):"),
            FighterField::WeightClass => text_prompt("Enter the new weight class:"),
            FighterField::Age => text_prompt("Enter the new age:"),
            FighterField::Nationality => text_prompt("Enter the new nationality (or \"-\" to clear it):"),
            FighterField::Status => ("Choose the new status:", status_keyboard()),
            FighterField::Gym => text_prompt("Enter the new gym name (or \"-\" for no gym):"),
        }
    }

    fn parse_value(conn: &Connection, _id: i64, field: FighterField, input: &str) -> AppResult<Result<FieldValue, String>> {
        let value = match field {
            FighterField::Name => validation::parse_name(input).map(FieldValue::Text),
            FighterField::WeightClass => validation::parse_required(input, "weight class").map(FieldValue::Text),
            FighterField::Nickname | FighterField::Nationality => {
                Ok(FieldValue::OptionalText(validation::parse_optional(input)))
            }
            FighterField::Age => validation::parse_age(input).map(FieldValue::Integer),
            FighterField::Status => validation::parse_status(input).map(FieldValue::Status),
            FighterField::Gym => return Ok(optional_gym(conn, input)?.map(FieldValue::Reference)),
        };
        Ok(value.map_err(|e| e.to_string()))
    }

    fn apply(conn: &mut Connection, id: i64, field: FighterField, value: &FieldValue) -> AppResult<usize> {
        fighters::update_fighter_field(conn, id, field, value)
    }
}

pub(crate) struct TrainerEdit;

impl EditTarget for TrainerEdit {
    type Field = TrainerField;
    const ENTITY: &'static str = "trainer";

    fn flow(form: EditForm<TrainerField>) -> Flow {
        Flow::EditTrainer(form)
    }

    fn label(field: TrainerField) -> &'static str {
        match field {
            TrainerField::Name => "Name",
            TrainerField::Specialty => "Specialty",
            TrainerField::Gym => "Gym",
        }
    }

    fn describe(conn: &Connection, id: i64) -> AppResult<Option<String>> {
        Ok(trainers::get_trainer(conn, id)?.map(|t| render::trainer(&t)))
    }

    fn value_prompt(field: TrainerField) -> (&'static str, Keyboard) {
        text_prompt(match field {
            TrainerField::Name => "Enter the new name:",
            TrainerField::Specialty => "Enter the new specialty:",
            TrainerField::Gym => "Enter the new gym name (or \"-\" for no gym):",
        })
    }

    fn parse_value(conn: &Connection, _id: i64, field: TrainerField, input: &str) -> AppResult<Result<FieldValue, String>> {
        let value = match field {
            TrainerField::Name => validation::parse_name(input).map(FieldValue::Text),
            TrainerField::Specialty => validation::parse_required(input, "specialty").map(FieldValue::Text),
            TrainerField::Gym => return Ok(optional_gym(conn, input)?.map(FieldValue::Reference)),
        };
        Ok(value.map_err(|e| e.to_string()))
    }

    fn apply(conn: &mut Connection, id: i64, field: TrainerField, value: &FieldValue) -> AppResult<usize> {
        trainers::update_trainer_field(conn, id, field, value)
    }
}

pub(crate) struct EventEdit;

impl EditTarget for EventEdit {
    type Field = MatchField;
    const ENTITY: &'static str = "event";

    fn flow(form: EditForm<MatchField>) -> Flow {
        Flow::EditEvent(form)
    }

    fn label(field: MatchField) -> &'static str {
        match field {
            MatchField::Start => "Start",
            MatchField::End => "End",
            MatchField::Location => "Location",
            MatchField::Outcome => "Outcome",
        }
    }

    fn describe(conn: &Connection, id: i64) -> AppResult<Option<String>> {
        Ok(events::get_match(conn, id)?.map(|event| render::match_event(&event)))
    }

    fn value_prompt(field: MatchField) -> (&'static str, Keyboard) {
        match field {
            MatchField::Start => text_prompt("Enter the new start (YYYY-MM-DD HH:MM):"),
            MatchField::End => text_prompt("Enter the new end (YYYY-MM-DD HH:MM) or \"unknown\":"),
            MatchField::Location => text_prompt("Enter the new location:"),
            MatchField::Outcome => ("Choose the new outcome:", outcome_keyboard()),
        }
    }

    fn parse_value(conn: &Connection, id: i64, field: MatchField, input: &str) -> AppResult<Result<FieldValue, String>> {
        let value = match field {
            MatchField::Start | MatchField::End => {
                let Some(event) = events::get_match(conn, id)? else {
                    return Ok(Err(format!("No event with ID {}.", id)));
                };
                if field == MatchField::Start {
                    validation::parse_datetime(input).and_then(|start| {
                        ensure_end_after_start(start, event.end)?;
                        Ok(FieldValue::Timestamp(start))
                    })
                } else {
                    validation::parse_optional_datetime(input).and_then(|end| {
                        ensure_end_after_start(event.start, end)?;
                        Ok(FieldValue::OptionalTimestamp(end))
                    })
                }
            }
            MatchField::Location => validation::parse_required(input, "location").map(FieldValue::Text),
            MatchField::Outcome => {
                return Ok(outcome_from_label(input)
                    .map(FieldValue::Outcome)
                    .ok_or_else(|| "Unknown outcome.".to_string()))
            }
        };
        Ok(value.map_err(|e| e.to_string()))
    }

    fn apply(conn: &mut Connection, id: i64, field: MatchField, value: &FieldValue) -> AppResult<usize> {
        match value {
            FieldValue::Outcome(outcome) => {
                if events::get_match(conn, id)?.is_none() {
                    return Ok(0);
                }
                events::set_match_outcome(conn, id, *outcome)?;
                Ok(1)
            }
            _ => events::update_match_field(conn, id, field, value),
        }
    }
}
