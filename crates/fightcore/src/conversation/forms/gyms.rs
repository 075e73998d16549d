use crate::conversation::flow::{Flow, GymForm};
use crate::conversation::forms::Step;
use crate::error::AppResult;
use crate::models::NewGym;
use crate::storage::{get_connection, gyms, DbPool};
use crate::validation::{parse_name, parse_required};

const NAME_PROMPT: &str = "Enter the gym name:";
const LOCATION_PROMPT: &str = "Enter the gym location:";
const OWNER_PROMPT: &str = "Enter the owner's name:";

pub(crate) fn start() -> Step {
    Step::ask(Flow::AddGym(GymForm::Name), NAME_PROMPT)
}

pub(crate) fn advance(form: GymForm, input: &str, pool: &DbPool) -> AppResult<Step> {
    let step = match form {
        GymForm::Name => match parse_name(input) {
            Ok(name) => Step::ask(Flow::AddGym(GymForm::Location { name }), LOCATION_PROMPT),
            Err(e) => Step::retry(Flow::AddGym(GymForm::Name), e, NAME_PROMPT),
        },
        GymForm::Location { name } => match parse_required(input, "location") {
            Ok(location) => Step::ask(Flow::AddGym(GymForm::Owner { name, location }), OWNER_PROMPT),
            Err(e) => Step::retry(Flow::AddGym(GymForm::Location { name }), e, LOCATION_PROMPT),
        },
        GymForm::Owner { name, location } => match parse_name(input) {
            Ok(owner) => {
                let conn = get_connection(pool)?;
                let gym = NewGym { name, location, owner };
                let id = gyms::create_gym(&conn, &gym)?;
                Step::done(format!("✅ Gym \"{}\" added with ID {}.", gym.name, id))
            }
            Err(e) => Step::retry(Flow::AddGym(GymForm::Owner { name, location }), e, OWNER_PROMPT),
        },
    };
    Ok(step)
}
