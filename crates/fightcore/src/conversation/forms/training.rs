//! Training submenu forms: assign, end and view assignments

use chrono::Local;

use crate::conversation::flow::{AssignForm, EndTrainingForm, Flow, TrainingView};
use crate::conversation::forms::{fighter_by_id, trainer_by_id, Lookup, Step};
use crate::conversation::menu::choices_keyboard;
use crate::conversation::render;
use crate::conversation::reply::Keyboard;
use crate::error::AppResult;
use crate::storage::{get_connection, training, AssignOutcome, DbPool};
use crate::validation::{ensure_end_date_not_before, parse_choice, parse_date, ValidationError};

const FIGHTER_ID_PROMPT: &str = "Enter the fighter ID:";
const TRAINER_ID_PROMPT: &str = "Enter the trainer ID:";
const START_DATE_PROMPT: &str = "Enter the start date (YYYY-MM-DD) or \"today\":";
const END_DATE_PROMPT: &str = "Enter the end date (YYYY-MM-DD) or \"today\":";
const CHOICE_PROMPT: &str = "Send the number of the training to end:";

fn date_keyboard() -> Keyboard {
    choices_keyboard(&["today"], 1)
}

pub(crate) fn start_assign() -> Step {
    Step::ask(Flow::AssignTrainer(AssignForm::Fighter), FIGHTER_ID_PROMPT)
}

pub(crate) fn advance_assign(form: AssignForm, input: &str, pool: &DbPool) -> AppResult<Step> {
    let mut conn = get_connection(pool)?;
    let step = match form {
        AssignForm::Fighter => match fighter_by_id(&conn, input)? {
            Lookup::Found(fighter) => Step::ask(
                Flow::AssignTrainer(AssignForm::Trainer { fighter }),
                TRAINER_ID_PROMPT,
            ),
            Lookup::Rejected(message) => {
                Step::retry(Flow::AssignTrainer(AssignForm::Fighter), message, FIGHTER_ID_PROMPT)
            }
        },
        AssignForm::Trainer { fighter } => match trainer_by_id(&conn, input)? {
            Lookup::Found(trainer) => {
                if training::has_open_assignment(&conn, fighter.id, trainer.id)? {
                    Step::done_training(format!(
                        "⚠️ {} already trains with {}. Nothing was changed.",
                        fighter.name, trainer.name
                    ))
                } else {
                    Step::ask_with(
                        Flow::AssignTrainer(AssignForm::StartDate { fighter, trainer }),
                        START_DATE_PROMPT,
                        date_keyboard(),
                    )
                }
            }
            Lookup::Rejected(message) => Step::retry(
                Flow::AssignTrainer(AssignForm::Trainer { fighter }),
                message,
                TRAINER_ID_PROMPT,
            ),
        },
        AssignForm::StartDate { fighter, trainer } => match parse_date(input, Local::now().date_naive()) {
            Ok(start_date) => match training::assign_trainer(&mut conn, fighter.id, trainer.id, start_date)? {
                AssignOutcome::Assigned => Step::done_training(format!(
                    "✅ {} now trains with {} since {}.",
                    fighter.name, trainer.name, start_date
                )),
                AssignOutcome::AlreadyAssigned => Step::done_training(format!(
                    "⚠️ {} already trains with {}. Nothing was changed.",
                    fighter.name, trainer.name
                )),
                AssignOutcome::OverlapsEarlier { ended } => Step::retry_with(
                    Flow::AssignTrainer(AssignForm::StartDate { fighter, trainer }),
                    ValidationError::StartBeforePreviousEnd(ended),
                    START_DATE_PROMPT,
                    date_keyboard(),
                ),
            },
            Err(e) => Step::retry_with(
                Flow::AssignTrainer(AssignForm::StartDate { fighter, trainer }),
                e,
                START_DATE_PROMPT,
                date_keyboard(),
            ),
        },
    };
    Ok(step)
}

pub(crate) fn start_end() -> Step {
    Step::ask(Flow::EndTraining(EndTrainingForm::Fighter), FIGHTER_ID_PROMPT)
}

pub(crate) fn advance_end(form: EndTrainingForm, input: &str, pool: &DbPool) -> AppResult<Step> {
    let conn = get_connection(pool)?;
    let step = match form {
        EndTrainingForm::Fighter => match fighter_by_id(&conn, input)? {
            Lookup::Found(fighter) => {
                let options = training::active_trainers_of(&conn, fighter.id)?;
                if options.is_empty() {
                    Step::done_training(format!("{} has no active trainers.", fighter.name))
                } else {
                    let mut text = format!("Active trainers of {}:\n", fighter.name);
                    for (i, option) in options.iter().enumerate() {
                        text.push_str(&format!(
                            "\n{}. {} (since {})",
                            i + 1,
                            option.trainer_name,
                            option.start_date
                        ));
                    }
                    text.push_str(&format!("\n\n{}", CHOICE_PROMPT));
                    let numbers: Vec<String> = (1..=options.len()).map(|n| n.to_string()).collect();
                    Step::ask_with(
                        Flow::EndTraining(EndTrainingForm::Choice { fighter, options }),
                        text,
                        choices_keyboard(&numbers, 4),
                    )
                }
            }
            Lookup::Rejected(message) => {
                Step::retry(Flow::EndTraining(EndTrainingForm::Fighter), message, FIGHTER_ID_PROMPT)
            }
        },
        EndTrainingForm::Choice { fighter, options } => match parse_choice(input, options.len()) {
            Ok(index) => {
                let assignment = options[index].clone();
                Step::ask_with(
                    Flow::EndTraining(EndTrainingForm::EndDate { fighter, assignment }),
                    END_DATE_PROMPT,
                    date_keyboard(),
                )
            }
            Err(e) => {
                let numbers: Vec<String> = (1..=options.len()).map(|n| n.to_string()).collect();
                Step::retry_with(
                    Flow::EndTraining(EndTrainingForm::Choice { fighter, options }),
                    e,
                    CHOICE_PROMPT,
                    choices_keyboard(&numbers, 4),
                )
            }
        },
        EndTrainingForm::EndDate { fighter, assignment } => {
            let parsed = parse_date(input, Local::now().date_naive())
                .and_then(|end| ensure_end_date_not_before(assignment.start_date, end).map(|_| end));
            match parsed {
                Ok(end_date) => {
                    let closed = training::end_assignment(&conn, fighter.id, assignment.trainer_id, end_date)?;
                    if closed == 0 {
                        Step::done_training(format!(
                            "⚠️ {} no longer trains with {}. Nothing was changed.",
                            fighter.name, assignment.trainer_name
                        ))
                    } else {
                        Step::done_training(format!(
                            "✅ Training of {} with {} ended on {}.",
                            fighter.name, assignment.trainer_name, end_date
                        ))
                    }
                }
                Err(e) => Step::retry_with(
                    Flow::EndTraining(EndTrainingForm::EndDate { fighter, assignment }),
                    e,
                    END_DATE_PROMPT,
                    date_keyboard(),
                ),
            }
        }
    };
    Ok(step)
}

pub(crate) fn start_view(view: TrainingView) -> Step {
    let prompt = match view {
        TrainingView::TrainersOfFighter => FIGHTER_ID_PROMPT,
        TrainingView::FightersOfTrainer => TRAINER_ID_PROMPT,
    };
    Step::ask(Flow::ViewTraining(view), prompt)
}

pub(crate) fn advance_view(view: TrainingView, input: &str, pool: &DbPool) -> AppResult<Step> {
    let conn = get_connection(pool)?;
    let step = match view {
        TrainingView::TrainersOfFighter => match fighter_by_id(&conn, input)? {
            Lookup::Found(fighter) => {
                let rows = training::trainers_of_fighter(&conn, fighter.id)?;
                Step::done_training_html(render::trainers_of_fighter(&fighter.name, &rows))
            }
            Lookup::Rejected(message) => Step::retry(Flow::ViewTraining(view), message, FIGHTER_ID_PROMPT),
        },
        TrainingView::FightersOfTrainer => match trainer_by_id(&conn, input)? {
            Lookup::Found(trainer) => {
                let rows = training::fighters_of_trainer(&conn, trainer.id)?;
                Step::done_training_html(render::fighters_of_trainer(&trainer.name, &rows))
            }
            Lookup::Rejected(message) => Step::retry(Flow::ViewTraining(view), message, TRAINER_ID_PROMPT),
        },
    };
    Ok(step)
}
