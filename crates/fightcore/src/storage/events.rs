//! Match events and their two participants
//!
//! Participants are read back in insertion order: the first row inserted
//! for a match is its first fighter.

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::error::{AppError, AppResult};
use crate::models::{BoutOutcome, FieldValue, MatchEvent, MatchField, NewMatch, Participant};
use crate::validation;

/// Creates the event and both participant rows in one transaction.
///
/// A match against oneself is rejected before anything is written.
///
/// # Returns
///
/// The new match id.
pub fn create_match(conn: &mut Connection, new_match: &NewMatch) -> AppResult<i64> {
    if new_match.first.id == new_match.second.id {
        return Err(AppError::Validation("a fighter cannot fight themselves".to_string()));
    }
    validation::ensure_end_after_start(new_match.start, new_match.end)?;

    let (first_result, second_result) = new_match.outcome.results();

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let match_id: i64 = tx.query_row(
        "INSERT INTO match_event (start_date, end_date, location) VALUES (?1, ?2, ?3) RETURNING match_id",
        params![new_match.start, new_match.end, new_match.location],
        |row| row.get(0),
    )?;
    {
        let mut insert =
            tx.prepare("INSERT INTO participants (match_id, fighter_id, result) VALUES (?1, ?2, ?3)")?;
        insert.execute(params![match_id, new_match.first.id, first_result])?;
        insert.execute(params![match_id, new_match.second.id, second_result])?;
    }
    tx.commit()?;

    log::info!(
        "Created match {}: {} vs {} ({:?})",
        match_id,
        new_match.first.name,
        new_match.second.name,
        new_match.outcome
    );
    Ok(match_id)
}

fn load_participants(conn: &Connection, match_id: i64) -> AppResult<Vec<Participant>> {
    let mut stmt = conn.prepare(
        "SELECT p.fighter_id, f.name, p.result
         FROM participants p
         JOIN fighter f ON f.fighter_id = p.fighter_id
         WHERE p.match_id = ?1
         ORDER BY p.rowid",
    )?;
    let participants = stmt
        .query_map([match_id], |row| {
            Ok(Participant {
                fighter_id: row.get(0)?,
                fighter_name: row.get(1)?,
                result: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(participants)
}

type EventRow = (i64, chrono::NaiveDateTime, Option<chrono::NaiveDateTime>, String);

fn assemble(conn: &Connection, (id, start, end, location): EventRow) -> AppResult<Option<MatchEvent>> {
    let mut participants = load_participants(conn, id)?.into_iter();
    match (participants.next(), participants.next(), participants.next()) {
        (Some(first), Some(second), None) => Ok(Some(MatchEvent {
            id,
            start,
            end,
            location,
            first,
            second,
        })),
        _ => {
            log::warn!("Match {} does not have exactly two participants, skipping", id);
            Ok(None)
        }
    }
}

/// Loads a match with its participants.
///
/// Returns `None` when the id is unknown or the match is malformed.
pub fn get_match(conn: &Connection, id: i64) -> AppResult<Option<MatchEvent>> {
    let row: Option<EventRow> = conn
        .query_row(
            "SELECT match_id, start_date, end_date, location FROM match_event WHERE match_id = ?1",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .optional()?;
    match row {
        Some(row) => assemble(conn, row),
        None => Ok(None),
    }
}

/// Most recent matches first.
pub fn list_matches(conn: &Connection, limit: i64) -> AppResult<Vec<MatchEvent>> {
    let mut stmt = conn.prepare(
        "SELECT match_id, start_date, end_date, location
         FROM match_event
         ORDER BY start_date DESC, match_id DESC
         LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))?
        .collect::<Result<Vec<EventRow>, _>>()?;

    let mut matches = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(event) = assemble(conn, row)? {
            matches.push(event);
        }
    }
    Ok(matches)
}

/// Updates the start, end or location of a match.
///
/// The outcome lives in `participants`; use [`set_match_outcome`].
pub fn update_match_field(conn: &Connection, id: i64, field: MatchField, value: &FieldValue) -> AppResult<usize> {
    let accepted = matches!(
        (field, value),
        (MatchField::Start, FieldValue::Timestamp(_))
            | (MatchField::End, FieldValue::OptionalTimestamp(_))
            | (MatchField::Location, FieldValue::Text(_))
    );
    let column = field.column().filter(|_| accepted);
    let (Some(column), Some(sql_value)) = (column, value.sql_value()) else {
        return Err(AppError::Validation(format!("{:?} cannot hold value {:?}", field, value)));
    };

    let sql = format!("UPDATE match_event SET {} = ?1 WHERE match_id = ?2", column);
    let updated = conn.execute(&sql, params![sql_value, id])?;
    log::info!("Updated match {} field {:?} ({} row)", id, field, updated);
    Ok(updated)
}

/// Rewrites both participants' results from one outcome.
pub fn set_match_outcome(conn: &mut Connection, id: i64, outcome: BoutOutcome) -> AppResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let participants = load_participants(&tx, id)?;
    let [first, second] = participants.as_slice() else {
        return Err(AppError::NotFound(format!("match {} with two participants", id)));
    };

    let (first_result, second_result) = outcome.results();
    tx.execute(
        "UPDATE participants SET result = ?3 WHERE match_id = ?1 AND fighter_id = ?2",
        params![id, first.fighter_id, first_result],
    )?;
    tx.execute(
        "UPDATE participants SET result = ?3 WHERE match_id = ?1 AND fighter_id = ?2",
        params![id, second.fighter_id, second_result],
    )?;
    tx.commit()?;
    log::info!("Set outcome of match {} to {:?}", id, outcome);
    Ok(())
}
