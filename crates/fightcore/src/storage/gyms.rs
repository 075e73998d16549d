//! Gym records

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::config::validation::DEFAULT_REPUTATION;
use crate::error::{AppError, AppResult};
use crate::models::{FieldValue, Gym, GymField, GymSummary, NewGym};
use crate::storage::like_pattern;
use crate::validation;

const SUMMARY_SELECT: &str = "SELECT g.gym_id, g.name, g.location, g.owner, g.reputation_score,
        (SELECT COUNT(*) FROM fighter f WHERE f.gym_id = g.gym_id),
        (SELECT COUNT(*) FROM trainer t WHERE t.gym_id = g.gym_id)
     FROM gym g";

fn gym_from_row(row: &Row<'_>) -> rusqlite::Result<Gym> {
    Ok(Gym {
        id: row.get(0)?,
        name: row.get(1)?,
        location: row.get(2)?,
        owner: row.get(3)?,
        reputation_score: row.get(4)?,
    })
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<GymSummary> {
    Ok(GymSummary {
        gym: gym_from_row(row)?,
        fighter_count: row.get(5)?,
        trainer_count: row.get(6)?,
    })
}

/// Inserts a gym with the default reputation score.
///
/// # Returns
///
/// The new gym id.
pub fn create_gym(conn: &Connection, gym: &NewGym) -> AppResult<i64> {
    let id = conn.query_row(
        "INSERT INTO gym (name, location, owner, reputation_score) VALUES (?1, ?2, ?3, ?4) RETURNING gym_id",
        params![gym.name, gym.location, gym.owner, DEFAULT_REPUTATION],
        |row| row.get(0),
    )?;
    log::info!("Created gym {} ({})", id, gym.name);
    Ok(id)
}

pub fn get_gym(conn: &Connection, id: i64) -> AppResult<Option<Gym>> {
    let gym = conn
        .query_row(
            "SELECT gym_id, name, location, owner, reputation_score FROM gym WHERE gym_id = ?1",
            [id],
            gym_from_row,
        )
        .optional()?;
    Ok(gym)
}

/// Looks a gym up by its exact name, ignoring ASCII case.
///
/// Names are not unique; the oldest matching gym wins.
pub fn find_gym_id_by_name(conn: &Connection, name: &str) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT gym_id FROM gym WHERE name = ?1 COLLATE NOCASE ORDER BY gym_id LIMIT 1",
            [name.trim()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Gyms ordered by reputation (best first), with fighter and trainer counts.
pub fn list_gyms(conn: &Connection, limit: i64) -> AppResult<Vec<GymSummary>> {
    let sql = format!("{SUMMARY_SELECT} ORDER BY g.reputation_score DESC, g.name LIMIT ?1");
    let mut stmt = conn.prepare(&sql)?;
    let gyms = stmt
        .query_map([limit], summary_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(gyms)
}

/// Gyms whose name, location or owner contains `term`.
pub fn search_gyms(conn: &Connection, term: &str, limit: i64) -> AppResult<Vec<GymSummary>> {
    let sql = format!(
        "{SUMMARY_SELECT}
         WHERE g.name LIKE ?1 ESCAPE '\\' OR g.location LIKE ?1 ESCAPE '\\' OR g.owner LIKE ?1 ESCAPE '\\'
         ORDER BY g.reputation_score DESC, g.name LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let gyms = stmt
        .query_map(params![like_pattern(term), limit], summary_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(gyms)
}

/// Updates one column of a gym.
///
/// The reputation score is range-checked before the statement runs.
///
/// # Returns
///
/// Number of updated rows (0 when the gym does not exist).
pub fn update_gym_field(conn: &Connection, id: i64, field: GymField, value: &FieldValue) -> AppResult<usize> {
    match (field, value) {
        (GymField::ReputationScore, FieldValue::Integer(score)) => {
            validation::check_reputation(*score)?;
        }
        (GymField::Name | GymField::Location | GymField::Owner, FieldValue::Text(_)) => {}
        _ => {
            return Err(AppError::Validation(format!(
                "{:?} cannot hold value {:?}",
                field, value
            )))
        }
    }
    let sql_value = value
        .sql_value()
        .ok_or_else(|| AppError::Validation(format!("{:?} has no column value", value)))?;

    let sql = format!("UPDATE gym SET {} = ?1 WHERE gym_id = ?2", field.column());
    let updated = conn.execute(&sql, params![sql_value, id])?;
    log::info!("Updated gym {} field {:?} ({} row)", id, field, updated);
    Ok(updated)
}
