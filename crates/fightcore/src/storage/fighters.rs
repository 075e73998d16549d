//! Fighter records

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::{FieldValue, Fighter, FighterField, NewFighter};
use crate::storage::like_pattern;

const FIGHTER_SELECT: &str = "SELECT f.fighter_id, f.name, f.nickname, f.weight_class, f.age,
        f.nationality, f.status, f.gym_id, g.name
     FROM fighter f
     LEFT JOIN gym g ON g.gym_id = f.gym_id";

fn fighter_from_row(row: &Row<'_>) -> rusqlite::Result<Fighter> {
    Ok(Fighter {
        id: row.get(0)?,
        name: row.get(1)?,
        nickname: row.get(2)?,
        weight_class: row.get(3)?,
        age: row.get(4)?,
        nationality: row.get(5)?,
        status: row.get(6)?,
        gym_id: row.get(7)?,
        gym_name: row.get(8)?,
    })
}

/// Inserts a fighter with status `active`.
///
/// Text fields are stored verbatim.
///
/// # Returns
///
/// The new fighter id.
pub fn create_fighter(conn: &Connection, fighter: &NewFighter) -> AppResult<i64> {
    let id = conn.query_row(
        "INSERT INTO fighter (name, nickname, weight_class, age, nationality, gym_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         RETURNING fighter_id",
        params![
            fighter.name,
            fighter.nickname,
            fighter.weight_class,
            fighter.age,
            fighter.nationality,
            fighter.gym_id
        ],
        |row| row.get(0),
    )?;
    log::info!("Created fighter {} ({})", id, fighter.name);
    Ok(id)
}

pub fn get_fighter(conn: &Connection, id: i64) -> AppResult<Option<Fighter>> {
    let sql = format!("{FIGHTER_SELECT} WHERE f.fighter_id = ?1");
    Ok(conn.query_row(&sql, [id], fighter_from_row).optional()?)
}

/// Looks a fighter up by exact name, ignoring ASCII case. Oldest match wins.
pub fn find_fighter_id_by_name(conn: &Connection, name: &str) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT fighter_id FROM fighter WHERE name = ?1 COLLATE NOCASE ORDER BY fighter_id LIMIT 1",
            [name.trim()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn list_fighters(conn: &Connection, limit: i64) -> AppResult<Vec<Fighter>> {
    let sql = format!("{FIGHTER_SELECT} ORDER BY f.name, f.fighter_id LIMIT ?1");
    let mut stmt = conn.prepare(&sql)?;
    let fighters = stmt
        .query_map([limit], fighter_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(fighters)
}

/// Fighters whose name or nickname contains `term`.
pub fn search_fighters(conn: &Connection, term: &str, limit: i64) -> AppResult<Vec<Fighter>> {
    let sql = format!(
        "{FIGHTER_SELECT}
         WHERE f.name LIKE ?1 ESCAPE '\\' OR f.nickname LIKE ?1 ESCAPE '\\'
         ORDER BY f.name, f.fighter_id LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let fighters = stmt
        .query_map(params![like_pattern(term), limit], fighter_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(fighters)
}

/// Updates one column of a fighter.
///
/// # Returns
///
/// Number of updated rows (0 when the fighter does not exist).
pub fn update_fighter_field(
    conn: &Connection,
    id: i64,
    field: FighterField,
    value: &FieldValue,
) -> AppResult<usize> {
    let accepted = match (field, value) {
        (FighterField::Name | FighterField::WeightClass, FieldValue::Text(_)) => true,
        (FighterField::Nickname | FighterField::Nationality, FieldValue::OptionalText(_)) => true,
        (FighterField::Age, FieldValue::Integer(age)) => *age > 0,
        (FighterField::Status, FieldValue::Status(_)) => true,
        (FighterField::Gym, FieldValue::Reference(_)) => true,
        _ => false,
    };
    let sql_value = value
        .sql_value()
        .filter(|_| accepted)
        .ok_or_else(|| AppError::Validation(format!("{:?} cannot hold value {:?}", field, value)))?;

    let sql = format!("UPDATE fighter SET {} = ?1 WHERE fighter_id = ?2", field.column());
    let updated = conn.execute(&sql, params![sql_value, id])?;
    log::info!("Updated fighter {} field {:?} ({} row)", id, field, updated);
    Ok(updated)
}
