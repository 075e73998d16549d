//! Parsing and validation of free-text form input
//!
//! Every form step turns the raw message text into a typed value here.
//! A `ValidationError` is shown to the user as-is, followed by the same
//! prompt again.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::config::validation::{MIN_FIGHTER_AGE, MIN_NAME_CHARS};
use crate::models::FighterStatus;

/// Input that may be left empty in optional fields
const SKIP_WORDS: &[&str] = &["-", "none", "skip", "empty"];

/// Input meaning "no end time yet" for events
const UNKNOWN_WORDS: &[&str] = &["-", "unknown", "none", "skip"];

/// Date input format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date and time input format
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The name must be at least {MIN_NAME_CHARS} characters long.")]
    NameTooShort,

    #[error("The {0} cannot be empty.")]
    Empty(&'static str),

    #[error("Please enter a positive whole number.")]
    InvalidNumber,

    #[error("Please enter a valid numeric ID.")]
    InvalidId,

    #[error("Age must be a positive whole number.")]
    InvalidAge,

    #[error("The fighter must be at least {MIN_FIGHTER_AGE} years old.")]
    Underage,

    #[error("Reputation must be a whole number from 0 to 100.")]
    ReputationOutOfRange,

    #[error("Invalid date. Use the format YYYY-MM-DD or type \"today\".")]
    InvalidDate,

    #[error("Invalid date and time. Use the format YYYY-MM-DD HH:MM.")]
    InvalidDateTime,

    #[error("The end must be later than the start.")]
    EndNotAfterStart,

    #[error("The end date cannot be before the start date ({0}).")]
    EndBeforeStart(NaiveDate),

    #[error("This pair already trained together until {0}. The new training cannot start before that day.")]
    StartBeforePreviousEnd(NaiveDate),

    #[error("Unknown status. Choose active, retired or suspended.")]
    InvalidStatus,
}

/// Returns true for the words that leave an optional field empty.
pub fn is_skip(input: &str) -> bool {
    let input = input.trim();
    input.is_empty() || SKIP_WORDS.iter().any(|word| input.eq_ignore_ascii_case(word))
}

/// Name of a person or gym, at least `MIN_NAME_CHARS` characters.
pub fn parse_name(input: &str) -> Result<String, ValidationError> {
    let name = input.trim();
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::NameTooShort);
    }
    Ok(name.to_string())
}

/// Mandatory free text. `what` names the field in the error.
pub fn parse_required(input: &str, what: &'static str) -> Result<String, ValidationError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(ValidationError::Empty(what));
    }
    Ok(text.to_string())
}

/// Optional free text; skip words give `None`.
pub fn parse_optional(input: &str) -> Option<String> {
    if is_skip(input) {
        None
    } else {
        Some(input.trim().to_string())
    }
}

/// Record id typed by the user.
pub fn parse_id(input: &str) -> Result<i64, ValidationError> {
    let input = input.trim();
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidId);
    }
    match input.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidId),
    }
}

/// 1-based position in a numbered list of `len` entries, as a 0-based index.
pub fn parse_choice(input: &str, len: usize) -> Result<usize, ValidationError> {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(n - 1),
        _ => Err(ValidationError::InvalidNumber),
    }
}

/// Fighter age: a positive integer of at least `MIN_FIGHTER_AGE`.
pub fn parse_age(input: &str) -> Result<i64, ValidationError> {
    let age = input.trim().parse::<i64>().map_err(|_| ValidationError::InvalidAge)?;
    if age <= 0 {
        return Err(ValidationError::InvalidAge);
    }
    if age < MIN_FIGHTER_AGE {
        return Err(ValidationError::Underage);
    }
    Ok(age)
}

/// Gym reputation score in `0..=100`.
pub fn parse_reputation(input: &str) -> Result<i64, ValidationError> {
    let score = input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::ReputationOutOfRange)?;
    check_reputation(score)?;
    Ok(score)
}

pub fn check_reputation(score: i64) -> Result<(), ValidationError> {
    if (0..=100).contains(&score) {
        Ok(())
    } else {
        Err(ValidationError::ReputationOutOfRange)
    }
}

/// Calendar date, or "today" for `today`.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate)
}

pub fn parse_datetime(input: &str) -> Result<NaiveDateTime, ValidationError> {
    NaiveDateTime::parse_from_str(input.trim(), DATETIME_FORMAT).map_err(|_| ValidationError::InvalidDateTime)
}

/// Event end time; "unknown" and the like give `None`.
pub fn parse_optional_datetime(input: &str) -> Result<Option<NaiveDateTime>, ValidationError> {
    let input = input.trim();
    if UNKNOWN_WORDS.iter().any(|word| input.eq_ignore_ascii_case(word)) {
        return Ok(None);
    }
    parse_datetime(input).map(Some)
}

/// Events must end strictly after they start.
pub fn ensure_end_after_start(start: NaiveDateTime, end: Option<NaiveDateTime>) -> Result<(), ValidationError> {
    match end {
        Some(end) if end <= start => Err(ValidationError::EndNotAfterStart),
        _ => Ok(()),
    }
}

/// A training assignment may end on its start day but not before it.
pub fn ensure_end_date_not_before(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end < start {
        Err(ValidationError::EndBeforeStart(start))
    } else {
        Ok(())
    }
}

pub fn parse_status(input: &str) -> Result<FighterStatus, ValidationError> {
    input.trim().parse().map_err(|_| ValidationError::InvalidStatus)
}
