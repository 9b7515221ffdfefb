//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Category, CategoryTitle, DatabaseID},
    stores::CategoryStore,
};

/// Creates and retrieves transaction categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SqliteCategoryStore {
    /// Get the category with `title`, creating it first if it does not exist.
    ///
    /// The UNIQUE constraint on `title` plus the conflict-tolerant insert
    /// guarantee at most one category per distinct title even when two
    /// requests reference a new title at the same time.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_or_create(&self, title: CategoryTitle) -> Result<Category, Error> {
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO category (title) VALUES (?1) ON CONFLICT(title) DO NOTHING;",
            (title.as_ref(),),
        )?;

        connection
            .prepare("SELECT id, title FROM category WHERE title = :title;")?
            .query_row(&[(":title", title.as_ref())], SqliteCategoryStore::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve the category with `category_id` from the database.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get(&self, category_id: DatabaseID) -> Result<Category, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, title FROM category WHERE id = :id;")?
            .query_row(&[(":id", &category_id)], SqliteCategoryStore::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve all categories in the database.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Category>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, title FROM category;")?
            .query_map([], SqliteCategoryStore::map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SqliteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL UNIQUE
            );",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SqliteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;

        let raw_title: String = row.get(offset + 1)?;
        let title = CategoryTitle::new_unchecked(&raw_title);

        Ok(Self::ReturnType { id, title })
    }
}
