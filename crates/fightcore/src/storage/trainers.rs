//! Trainer records

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::{FieldValue, NewTrainer, Trainer, TrainerField, TrainerSummary};
use crate::storage::like_pattern;

const SUMMARY_SELECT: &str = "SELECT t.trainer_id, t.name, t.specialty, t.gym_id, g.name,
        (SELECT COUNT(*) FROM fighter_trainer ft WHERE ft.trainer_id = t.trainer_id)
     FROM trainer t
     LEFT JOIN gym g ON g.gym_id = t.gym_id";

fn trainer_from_row(row: &Row<'_>) -> rusqlite::Result<Trainer> {
    Ok(Trainer {
        id: row.get(0)?,
        name: row.get(1)?,
        specialty: row.get(2)?,
        gym_id: row.get(3)?,
        gym_name: row.get(4)?,
    })
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<TrainerSummary> {
    Ok(TrainerSummary {
        trainer: trainer_from_row(row)?,
        pupil_count: row.get(5)?,
    })
}

/// Inserts a trainer and returns the new id.
pub fn create_trainer(conn: &Connection, trainer: &NewTrainer) -> AppResult<i64> {
    let id = conn.query_row(
        "INSERT INTO trainer (name, specialty, gym_id) VALUES (?1, ?2, ?3) RETURNING trainer_id",
        params![trainer.name, trainer.specialty, trainer.gym_id],
        |row| row.get(0),
    )?;
    log::info!("Created trainer {} ({})", id, trainer.name);
    Ok(id)
}

pub fn get_trainer(conn: &Connection, id: i64) -> AppResult<Option<Trainer>> {
    let trainer = conn
        .query_row(
            "SELECT t.trainer_id, t.name, t.specialty, t.gym_id, g.name
             FROM trainer t
             LEFT JOIN gym g ON g.gym_id = t.gym_id
             WHERE t.trainer_id = ?1",
            [id],
            trainer_from_row,
        )
        .optional()?;
    Ok(trainer)
}

/// Trainers with the number of fighters they ever trained.
pub fn list_trainers(conn: &Connection, limit: i64) -> AppResult<Vec<TrainerSummary>> {
    let sql = format!("{SUMMARY_SELECT} ORDER BY t.name, t.trainer_id LIMIT ?1");
    let mut stmt = conn.prepare(&sql)?;
    let trainers = stmt
        .query_map([limit], summary_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(trainers)
}

/// Trainers whose name or specialty contains `term`.
pub fn search_trainers(conn: &Connection, term: &str, limit: i64) -> AppResult<Vec<TrainerSummary>> {
    let sql = format!(
        "{SUMMARY_SELECT}
         WHERE t.name LIKE ?1 ESCAPE '\\' OR t.specialty LIKE ?1 ESCAPE '\\'
         ORDER BY t.name, t.trainer_id LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let trainers = stmt
        .query_map(params![like_pattern(term), limit], summary_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(trainers)
}

/// Updates one column of a trainer; returns the number of updated rows.
pub fn update_trainer_field(
    conn: &Connection,
    id: i64,
    field: TrainerField,
    value: &FieldValue,
) -> AppResult<usize> {
    let accepted = matches!(
        (field, value),
        (TrainerField::Name | TrainerField::Specialty, FieldValue::Text(_))
            | (TrainerField::Gym, FieldValue::Reference(_))
    );
    let sql_value = value
        .sql_value()
        .filter(|_| accepted)
        .ok_or_else(|| AppError::Validation(format!("{:?} cannot hold value {:?}", field, value)))?;

    let sql = format!("UPDATE trainer SET {} = ?1 WHERE trainer_id = ?2", field.column());
    let updated = conn.execute(&sql, params![sql_value, id])?;
    log::info!("Updated trainer {} field {:?} ({} row)", id, field, updated);
    Ok(updated)
}
