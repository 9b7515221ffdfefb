//! Contains convenience type alias and function for [AppState] that uses
//! the SQLite backend.

mod category;
mod transaction;

pub use category::SqliteCategoryStore;
pub use transaction::SqliteTransactionStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SqlAppState = AppState<SqliteCategoryStore, SqliteTransactionStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
pub fn create_app_state(db_connection: Connection) -> Result<SqlAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));
    let category_store = SqliteCategoryStore::new(connection.clone());
    let transaction_store = SqliteTransactionStore::new(connection.clone());

    Ok(AppState::new(category_store, transaction_store))
}
