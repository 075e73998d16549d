//! Multi-step form state
//!
//! Each form is an enum whose variants are its steps. A step carries every
//! value collected before it, so a finished form never has missing fields.
//! All of it is serializable for the Redis session store.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{ActiveTrainer, FieldValue, FighterField, GymField, MatchField, NamedRef, NewFighter, TrainerField};

/// The form a chat is currently filling in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flow {
    Login(LoginForm),
    AddGym(GymForm),
    AddFighter(FighterForm),
    AddTrainer(TrainerForm),
    AddEvent(EventForm),
    Search(SearchTarget),
    EditGym(EditForm<GymField>),
    EditFighter(EditForm<FighterField>),
    EditTrainer(EditForm<TrainerField>),
    EditEvent(EditForm<MatchField>),
    AssignTrainer(AssignForm),
    EndTraining(EndTrainingForm),
    ViewTraining(TrainingView),
}

impl Flow {
    /// Forms started from the training submenu return there when done.
    pub fn is_training(&self) -> bool {
        matches!(
            self,
            Flow::AssignTrainer(_) | Flow::EndTraining(_) | Flow::ViewTraining(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginForm {
    Username,
    /// The username waits in the session
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GymForm {
    Name,
    Location { name: String },
    Owner { name: String, location: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FighterForm {
    Name,
    Nickname {
        name: String,
    },
    WeightClass {
        name: String,
        nickname: Option<String>,
    },
    Age {
        name: String,
        nickname: Option<String>,
        weight_class: String,
    },
    Nationality {
        name: String,
        nickname: Option<String>,
        weight_class: String,
        age: i64,
    },
    /// Everything but the gym is known
    Gym {
        draft: NewFighter,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainerForm {
    Name,
    Specialty { name: String },
    Gym { name: String, specialty: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventForm {
    Start,
    End {
        start: NaiveDateTime,
    },
    Location {
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
    },
    FirstFighter {
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
        location: String,
    },
    SecondFighter {
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
        location: String,
        first: NamedRef,
    },
    Outcome {
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
        location: String,
        first: NamedRef,
        second: NamedRef,
    },
}

/// Single-step search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchTarget {
    Fighter,
    Gym,
    Trainer,
}

/// Edit form shared by every entity: id, field, value, confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditForm<F> {
    Id,
    Field { id: i64 },
    Value { id: i64, field: F },
    Confirm { id: i64, field: F, value: FieldValue },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignForm {
    Fighter,
    Trainer { fighter: NamedRef },
    StartDate { fighter: NamedRef, trainer: NamedRef },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndTrainingForm {
    Fighter,
    /// Numbered list of the fighter's open assignments
    Choice {
        fighter: NamedRef,
        options: Vec<ActiveTrainer>,
    },
    EndDate {
        fighter: NamedRef,
        assignment: ActiveTrainer,
    },
}

/// Single-step training history lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingView {
    TrainersOfFighter,
    FightersOfTrainer,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flow_survives_json() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        let flow = Flow::AddEvent(EventForm::SecondFighter {
            start,
            end: None,
            location: "Tehran".to_string(),
            first: NamedRef {
                id: 3,
                name: "Ali".to_string(),
            },
        });

        let json = serde_json::to_string(&flow).unwrap();
        let back: Flow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flow);
    }

    #[test]
    fn test_training_flows() {
        assert!(Flow::ViewTraining(TrainingView::TrainersOfFighter).is_training());
        assert!(Flow::AssignTrainer(AssignForm::Fighter).is_training());
        assert!(!Flow::AddGym(GymForm::Name).is_training());
    }
}
