//! Fighter/trainer assignments
//!
//! An assignment is open while `end_date` is NULL. A pair may have any
//! number of closed assignments but at most one open one.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::error::AppResult;
use crate::models::{ActiveTrainer, PupilOfTrainer, TrainerOfFighter};

/// Result of [`assign_trainer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    Assigned,
    /// The pair already has an open assignment; nothing was written
    AlreadyAssigned,
    /// The start falls inside an earlier period of the pair, which ended on `ended`
    OverlapsEarlier { ended: NaiveDate },
}

/// True when `fighter_id` currently trains with `trainer_id`.
pub fn has_open_assignment(conn: &Connection, fighter_id: i64, trainer_id: i64) -> AppResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM fighter_trainer
             WHERE fighter_id = ?1 AND trainer_id = ?2 AND end_date IS NULL",
            [fighter_id, trainer_id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Day the pair's most recent closed assignment ended.
pub fn last_end_date(conn: &Connection, fighter_id: i64, trainer_id: i64) -> AppResult<Option<NaiveDate>> {
    let ended = conn.query_row(
        "SELECT MAX(end_date) FROM fighter_trainer WHERE fighter_id = ?1 AND trainer_id = ?2",
        [fighter_id, trainer_id],
        |row| row.get(0),
    )?;
    Ok(ended)
}

/// Opens an assignment starting on `start_date`.
///
/// The checks and the insert share one IMMEDIATE transaction, so two
/// concurrent callers cannot both insert. A new period may start on the day
/// the previous one ended but not before.
pub fn assign_trainer(
    conn: &mut Connection,
    fighter_id: i64,
    trainer_id: i64,
    start_date: NaiveDate,
) -> AppResult<AssignOutcome> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    if has_open_assignment(&tx, fighter_id, trainer_id)? {
        log::info!(
            "Fighter {} already trains with trainer {}, nothing to assign",
            fighter_id,
            trainer_id
        );
        return Ok(AssignOutcome::AlreadyAssigned);
    }
    if let Some(ended) = last_end_date(&tx, fighter_id, trainer_id)? {
        if start_date < ended {
            return Ok(AssignOutcome::OverlapsEarlier { ended });
        }
    }
    tx.execute(
        "INSERT INTO fighter_trainer (fighter_id, trainer_id, start_date) VALUES (?1, ?2, ?3)",
        params![fighter_id, trainer_id, start_date],
    )?;
    tx.commit()?;
    log::info!(
        "Assigned trainer {} to fighter {} from {}",
        trainer_id,
        fighter_id,
        start_date
    );
    Ok(AssignOutcome::Assigned)
}

/// Open assignments of a fighter, oldest first.
pub fn active_trainers_of(conn: &Connection, fighter_id: i64) -> AppResult<Vec<ActiveTrainer>> {
    let mut stmt = conn.prepare(
        "SELECT t.trainer_id, t.name, ft.start_date
         FROM fighter_trainer ft
         JOIN trainer t ON t.trainer_id = ft.trainer_id
         WHERE ft.fighter_id = ?1 AND ft.end_date IS NULL
         ORDER BY ft.start_date, t.trainer_id",
    )?;
    let trainers = stmt
        .query_map([fighter_id], |row| {
            Ok(ActiveTrainer {
                trainer_id: row.get(0)?,
                trainer_name: row.get(1)?,
                start_date: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(trainers)
}

/// Closes the open assignment of the pair.
///
/// # Returns
///
/// Number of closed rows, 0 when the pair had no open assignment.
pub fn end_assignment(conn: &Connection, fighter_id: i64, trainer_id: i64, end_date: NaiveDate) -> AppResult<usize> {
    let updated = conn.execute(
        "UPDATE fighter_trainer SET end_date = ?3
         WHERE fighter_id = ?1 AND trainer_id = ?2 AND end_date IS NULL",
        params![fighter_id, trainer_id, end_date],
    )?;
    log::info!(
        "Ended training of fighter {} with trainer {} on {} ({} row)",
        fighter_id,
        trainer_id,
        end_date,
        updated
    );
    Ok(updated)
}

/// Full training history of a fighter: open assignments first, then by
/// start date, newest first.
pub fn trainers_of_fighter(conn: &Connection, fighter_id: i64) -> AppResult<Vec<TrainerOfFighter>> {
    let mut stmt = conn.prepare(
        "SELECT t.trainer_id, t.name, t.specialty, ft.start_date, ft.end_date
         FROM fighter_trainer ft
         JOIN trainer t ON t.trainer_id = ft.trainer_id
         WHERE ft.fighter_id = ?1
         ORDER BY ft.end_date IS NOT NULL, ft.start_date DESC, t.name",
    )?;
    let rows = stmt
        .query_map([fighter_id], |row| {
            Ok(TrainerOfFighter {
                trainer_id: row.get(0)?,
                trainer_name: row.get(1)?,
                specialty: row.get(2)?,
                start_date: row.get(3)?,
                end_date: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Everyone a trainer has trained, open assignments first.
pub fn fighters_of_trainer(conn: &Connection, trainer_id: i64) -> AppResult<Vec<PupilOfTrainer>> {
    let mut stmt = conn.prepare(
        "SELECT f.fighter_id, f.name, f.weight_class, f.status, ft.start_date, ft.end_date
         FROM fighter_trainer ft
         JOIN fighter f ON f.fighter_id = ft.fighter_id
         WHERE ft.trainer_id = ?1
         ORDER BY ft.end_date IS NOT NULL, ft.start_date DESC, f.name",
    )?;
    let rows = stmt
        .query_map([trainer_id], |row| {
            Ok(PupilOfTrainer {
                fighter_id: row.get(0)?,
                fighter_name: row.get(1)?,
                weight_class: row.get(2)?,
                status: row.get(3)?,
                start_date: row.get(4)?,
                end_date: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
