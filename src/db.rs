//! The key-value store that backs the application's persisted state.
//!
//! The application only persists two values: the full transaction collection
//! (as JSON) and the theme preference. Both live in a single SQLite table.

use rusqlite::{Connection, OptionalExtension};

use crate::Error;

/// Create the tables used by the application.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS key_value (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Get the value stored under `key`, or `None` if nothing has been stored yet.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_value(key: &str, connection: &Connection) -> Result<Option<String>, Error> {
    connection
        .query_row(
            "SELECT value FROM key_value WHERE key = :key",
            &[(":key", key)],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
}

/// Store `value` under `key`, replacing any previous value.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn set_value(key: &str, value: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO key_value (key, value) VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (key, value),
    )?;

    Ok(())
}
