//! This module defines traits for interacting with the application's SQLite
//! database and the function for setting up the schema.

use rusqlite::{Connection, Row};

use crate::stores::sqlite::{SqliteCategoryStore, SqliteTransactionStore};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a
/// concrete rust type.
pub trait MapRow {
    /// The type to map the row to.
    type ReturnType;

    /// Convert `row` into the mapped type, reading columns from the start of
    /// the row.
    ///
    /// # Errors
    /// Returns an error if a column contains an unexpected type or is missing.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert `row` into the mapped type, reading columns starting from
    /// `offset`.
    ///
    /// # Errors
    /// Returns an error if a column contains an unexpected type or is missing.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// Create the tables for the application's domain models.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    SqliteCategoryStore::create_table(connection)?;
    SqliteTransactionStore::create_table(connection)?;

    Ok(())
}
