use crate::conversation::flow::{Flow, TrainerForm};
use crate::conversation::forms::{optional_gym, Step};
use crate::error::AppResult;
use crate::models::NewTrainer;
use crate::storage::{get_connection, trainers, DbPool};
use crate::validation::{parse_name, parse_required};

const NAME_PROMPT: &str = "Enter the trainer's full name:";
const SPECIALTY_PROMPT: &str = "Enter the specialty (e.g. boxing, wrestling, BJJ):";
const GYM_PROMPT: &str = "Enter the gym name (or \"-\" for no gym):";

pub(crate) fn start() -> Step {
    Step::ask(Flow::AddTrainer(TrainerForm::Name), NAME_PROMPT)
}

pub(crate) fn advance(form: TrainerForm, input: &str, pool: &DbPool) -> AppResult<Step> {
    let step = match form {
        TrainerForm::Name => match parse_name(input) {
            Ok(name) => Step::ask(Flow::AddTrainer(TrainerForm::Specialty { name }), SPECIALTY_PROMPT),
            Err(e) => Step::retry(Flow::AddTrainer(TrainerForm::Name), e, NAME_PROMPT),
        },
        TrainerForm::Specialty { name } => match parse_required(input, "specialty") {
            Ok(specialty) => Step::ask(Flow::AddTrainer(TrainerForm::Gym { name, specialty }), GYM_PROMPT),
            Err(e) => Step::retry(Flow::AddTrainer(TrainerForm::Specialty { name }), e, SPECIALTY_PROMPT),
        },
        TrainerForm::Gym { name, specialty } => {
            let conn = get_connection(pool)?;
            match optional_gym(&conn, input)? {
                Ok(gym) => {
                    let trainer = NewTrainer {
                        name,
                        specialty,
                        gym_id: gym.map(|g| g.id),
                    };
                    let id = trainers::create_trainer(&conn, &trainer)?;
                    Step::done(format!("✅ Trainer \"{}\" added with ID {}.", trainer.name, id))
                }
                Err(message) => Step::retry(Flow::AddTrainer(TrainerForm::Gym { name, specialty }), message, GYM_PROMPT),
            }
        }
    };
    Ok(step)
}
