use crate::conversation::flow::{FighterForm, Flow};
use crate::conversation::forms::{optional_gym, Step};
use crate::error::AppResult;
use crate::models::NewFighter;
use crate::storage::{fighters, get_connection, DbPool};
use crate::validation::{parse_age, parse_name, parse_optional, parse_required};

const NAME_PROMPT: &str = "Enter the fighter's full name:";
const NICKNAME_PROMPT: &str = "Enter the nickname (or \"-\" to skip):";
const WEIGHT_CLASS_PROMPT: &str = "Enter the weight class:";
const AGE_PROMPT: &str = "Enter the age:";
const NATIONALITY_PROMPT: &str = "Enter the nationality (or \"-\" to skip):";
const GYM_PROMPT: &str = "Enter the gym name (or \"-\" for no gym):";

pub(crate) fn start() -> Step {
    Step::ask(Flow::AddFighter(FighterForm::Name), NAME_PROMPT)
}

pub(crate) fn advance(form: FighterForm, input: &str, pool: &DbPool) -> AppResult<Step> {
    let step = match form {
        FighterForm::Name => match parse_name(input) {
            Ok(name) => Step::ask(Flow::AddFighter(FighterForm::Nickname { name }), NICKNAME_PROMPT),
            Err(e) => Step::retry(Flow::AddFighter(FighterForm::Name), e, NAME_PROMPT),
        },
        FighterForm::Nickname { name } => {
            let nickname = parse_optional(input);
            Step::ask(
                Flow::AddFighter(FighterForm::WeightClass { name, nickname }),
                WEIGHT_CLASS_PROMPT,
            )
        }
        FighterForm::WeightClass { name, nickname } => match parse_required(input, "weight class") {
            Ok(weight_class) => Step::ask(
                Flow::AddFighter(FighterForm::Age {
                    name,
                    nickname,
                    weight_class,
                }),
                AGE_PROMPT,
            ),
            Err(e) => Step::retry(
                Flow::AddFighter(FighterForm::WeightClass { name, nickname }),
                e,
                WEIGHT_CLASS_PROMPT,
            ),
        },
        FighterForm::Age {
            name,
            nickname,
            weight_class,
        } => match parse_age(input) {
            Ok(age) => Step::ask(
                Flow::AddFighter(FighterForm::Nationality {
                    name,
                    nickname,
                    weight_class,
                    age,
                }),
                NATIONALITY_PROMPT,
            ),
            Err(e) => Step::retry(
                Flow::AddFighter(FighterForm::Age {
                    name,
                    nickname,
                    weight_class,
                }),
                e,
                AGE_PROMPT,
            ),
        },
        FighterForm::Nationality {
            name,
            nickname,
            weight_class,
            age,
        } => {
            let draft = NewFighter {
                name,
                nickname,
                weight_class,
                age,
                nationality: parse_optional(input),
                gym_id: None,
            };
            Step::ask(Flow::AddFighter(FighterForm::Gym { draft }), GYM_PROMPT)
        }
        FighterForm::Gym { mut draft } => {
            let conn = get_connection(pool)?;
            match optional_gym(&conn, input)? {
                Ok(gym) => {
                    draft.gym_id = gym.as_ref().map(|g| g.id);
                    let id = fighters::create_fighter(&conn, &draft)?;
                    let gym_note = gym.map(|g| format!(" at {}", g.name)).unwrap_or_default();
                    Step::done(format!("✅ Fighter \"{}\" added with ID {}{}.", draft.name, id, gym_note))
                }
                Err(message) => Step::retry(Flow::AddFighter(FighterForm::Gym { draft }), message, GYM_PROMPT),
            }
        }
    };
    Ok(step)
}
