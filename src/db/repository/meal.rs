use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::row::{datetime_at, enum_at, format_datetime, uuid_at};
use crate::db::DatabaseError;
use crate::models::MealEntry;

pub(crate) fn insert_meal_entry(conn: &Connection, meal: &MealEntry) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO meal_entries (id, user_id, timestamp, meal_type, food_items, calories, sodium,
         notes, post_surgery_day)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            meal.id.to_string(),
            meal.user_id.to_string(),
            format_datetime(&meal.timestamp),
            meal.meal_type.as_str(),
            meal.food_items,
            meal.calories,
            meal.sodium,
            meal.notes,
            meal.post_surgery_day,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

pub fn get_meal_entry(conn: &Connection, id: &Uuid) -> Result<Option<MealEntry>, DatabaseError> {
    conn.query_row(
        "SELECT id, user_id, timestamp, meal_type, food_items, calories, sodium, notes, post_surgery_day
         FROM meal_entries WHERE id = ?1",
        params![id.to_string()],
        row_to_meal,
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn list_meals_for_user(conn: &Connection, user_id: &Uuid) -> Result<Vec<MealEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, timestamp, meal_type, food_items, calories, sodium, notes, post_surgery_day
         FROM meal_entries WHERE user_id = ?1 ORDER BY timestamp ASC",
    )?;
    let rows = stmt.query_map(params![user_id.to_string()], row_to_meal)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn delete_meal_entry(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM meal_entries WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "meal_entry".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn row_to_meal(row: &rusqlite::Row) -> Result<MealEntry, rusqlite::Error> {
    Ok(MealEntry {
        id: uuid_at(row, 0)?,
        user_id: uuid_at(row, 1)?,
        timestamp: datetime_at(row, 2)?,
        meal_type: enum_at(row, 3)?,
        food_items: row.get(4)?,
        calories: row.get(5)?,
        sodium: row.get(6)?,
        notes: row.get(7)?,
        post_surgery_day: row.get(8)?,
    })
}
