//! Records stored in the fight-club database and the typed values the
//! forms collect for them.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Career status of a fighter.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FighterStatus {
    #[default]
    Active,
    Retired,
    Suspended,
}

/// Result of one fighter in one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum MatchResult {
    #[strum(serialize = "win")]
    Win,
    #[strum(serialize = "loss")]
    Loss,
    #[strum(serialize = "draw")]
    Draw,
    #[strum(serialize = "no contest")]
    NoContest,
}

macro_rules! impl_sql_for_str_enum {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_ref()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: strum::ParseError| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

impl_sql_for_str_enum!(FighterStatus);
impl_sql_for_str_enum!(MatchResult);

/// Outcome of a bout seen from the match as a whole.
///
/// Stored as one `MatchResult` per participant; `Unknown` leaves both
/// results empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
pub enum BoutOutcome {
    FirstWins,
    SecondWins,
    Draw,
    NoContest,
    Unknown,
}

impl BoutOutcome {
    /// Per-fighter results as `(first, second)`.
    pub fn results(self) -> (Option<MatchResult>, Option<MatchResult>) {
        match self {
            BoutOutcome::FirstWins => (Some(MatchResult::Win), Some(MatchResult::Loss)),
            BoutOutcome::SecondWins => (Some(MatchResult::Loss), Some(MatchResult::Win)),
            BoutOutcome::Draw => (Some(MatchResult::Draw), Some(MatchResult::Draw)),
            BoutOutcome::NoContest => (Some(MatchResult::NoContest), Some(MatchResult::NoContest)),
            BoutOutcome::Unknown => (None, None),
        }
    }

    /// Reconstructs the outcome from stored per-fighter results.
    pub fn from_results(first: Option<MatchResult>, second: Option<MatchResult>) -> Self {
        match (first, second) {
            (Some(MatchResult::Win), _) => BoutOutcome::FirstWins,
            (_, Some(MatchResult::Win)) => BoutOutcome::SecondWins,
            (Some(MatchResult::Draw), _) => BoutOutcome::Draw,
            (Some(MatchResult::NoContest), _) => BoutOutcome::NoContest,
            _ => BoutOutcome::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gym {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub owner: String,
    pub reputation_score: i64,
}

/// Gym with its head counts, as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GymSummary {
    pub gym: Gym,
    pub fighter_count: i64,
    pub trainer_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGym {
    pub name: String,
    pub location: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fighter {
    pub id: i64,
    pub name: String,
    pub nickname: Option<String>,
    pub weight_class: String,
    pub age: i64,
    pub nationality: Option<String>,
    pub status: FighterStatus,
    pub gym_id: Option<i64>,
    /// Joined from `gym`, `None` when the fighter has no gym
    pub gym_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFighter {
    pub name: String,
    pub nickname: Option<String>,
    pub weight_class: String,
    pub age: i64,
    pub nationality: Option<String>,
    pub gym_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trainer {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub gym_id: Option<i64>,
    pub gym_name: Option<String>,
}

/// Trainer with the number of fighters ever assigned to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerSummary {
    pub trainer: Trainer,
    pub pupil_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrainer {
    pub name: String,
    pub specialty: String,
    pub gym_id: Option<i64>,
}

/// A trainer as seen from one fighter's training history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerOfFighter {
    pub trainer_id: i64,
    pub trainer_name: String,
    pub specialty: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// A fighter as seen from one trainer's list of pupils.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PupilOfTrainer {
    pub fighter_id: i64,
    pub fighter_name: String,
    pub weight_class: String,
    pub status: FighterStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Open assignment offered for closing in the "end training" form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTrainer {
    pub trainer_id: i64,
    pub trainer_name: String,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub fighter_id: i64,
    pub fighter_name: String,
    pub result: Option<MatchResult>,
}

/// Match event with its two participants in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub location: String,
    pub first: Participant,
    pub second: Participant,
}

impl MatchEvent {
    pub fn outcome(&self) -> BoutOutcome {
        BoutOutcome::from_results(self.first.result, self.second.result)
    }
}

/// Id plus display name of a record picked by name or id in a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMatch {
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub location: String,
    pub first: NamedRef,
    pub second: NamedRef,
    pub outcome: BoutOutcome,
}

/// Editable gym columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
pub enum GymField {
    Name,
    Location,
    Owner,
    ReputationScore,
}

impl GymField {
    pub fn column(self) -> &'static str {
        match self {
            GymField::Name => "name",
            GymField::Location => "location",
            GymField::Owner => "owner",
            GymField::ReputationScore => "reputation_score",
        }
    }
}

/// Editable fighter columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
pub enum FighterField {
    Name,
    Nickname,
    WeightClass,
    Age,
    Nationality,
    Status,
    Gym,
}

impl FighterField {
    pub fn column(self) -> &'static str {
        match self {
            FighterField::Name => "name",
            FighterField::Nickname => "nickname",
            FighterField::WeightClass => "weight_class",
            FighterField::Age => "age",
            FighterField::Nationality => "nationality",
            FighterField::Status => "status",
            FighterField::Gym => "gym_id",
        }
    }
}

/// Editable trainer columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
pub enum TrainerField {
    Name,
    Specialty,
    Gym,
}

impl TrainerField {
    pub fn column(self) -> &'static str {
        match self {
            TrainerField::Name => "name",
            TrainerField::Specialty => "specialty",
            TrainerField::Gym => "gym_id",
        }
    }
}

/// Editable parts of a match event. `Outcome` touches `participants`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
pub enum MatchField {
    Start,
    End,
    Location,
    Outcome,
}

impl MatchField {
    /// Column in `match_event`, `None` for the outcome.
    pub fn column(self) -> Option<&'static str> {
        match self {
            MatchField::Start => Some("start_date"),
            MatchField::End => Some("end_date"),
            MatchField::Location => Some("location"),
            MatchField::Outcome => None,
        }
    }
}

/// New value captured by an edit form, waiting for confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    OptionalText(Option<String>),
    Integer(i64),
    Status(FighterStatus),
    Reference(Option<NamedRef>),
    Timestamp(NaiveDateTime),
    OptionalTimestamp(Option<NaiveDateTime>),
    Outcome(BoutOutcome),
}

impl FieldValue {
    /// Value bound to the UPDATE statement; `None` for values that are not a
    /// single column.
    pub fn sql_value(&self) -> Option<Value> {
        let value = match self {
            FieldValue::Text(text) => Value::Text(text.clone()),
            FieldValue::OptionalText(Some(text)) => Value::Text(text.clone()),
            FieldValue::OptionalText(None) => Value::Null,
            FieldValue::Integer(n) => Value::Integer(*n),
            FieldValue::Status(status) => Value::Text(status.as_ref().to_string()),
            FieldValue::Reference(Some(named)) => Value::Integer(named.id),
            FieldValue::Reference(None) => Value::Null,
            FieldValue::Timestamp(ts) => Value::Text(ts.format(TIMESTAMP_FORMAT).to_string()),
            FieldValue::OptionalTimestamp(Some(ts)) => Value::Text(ts.format(TIMESTAMP_FORMAT).to_string()),
            FieldValue::OptionalTimestamp(None) => Value::Null,
            FieldValue::Outcome(_) => return None,
        };
        Some(value)
    }
}

/// Storage format of timestamps; matches what rusqlite's chrono support writes.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
