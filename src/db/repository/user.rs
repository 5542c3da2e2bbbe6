use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::row::{datetime_at, enum_at, format_datetime, uuid_at};
use crate::db::DatabaseError;
use crate::models::User;

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, display_name, role, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            user.id.to_string(),
            user.display_name,
            user.role.as_str(),
            format_datetime(&user.created_at),
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: &Uuid) -> Result<Option<User>, DatabaseError> {
    conn.query_row(
        "SELECT id, display_name, role, created_at FROM users WHERE id = ?1",
        params![id.to_string()],
        |row| {
            Ok(User {
                id: uuid_at(row, 0)?,
                display_name: row.get(1)?,
                role: enum_at(row, 2)?,
                created_at: datetime_at(row, 3)?,
            })
        },
    )
    .optional()
    .map_err(DatabaseError::from)
}
