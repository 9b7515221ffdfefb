//! Implements a SQLite backed transaction store.
//!
//! The balance invariant lives here: both [TransactionStore::create] and
//! [TransactionStore::import] read the running balance and insert inside a
//! single SQLite transaction, so a rejected operation leaves no rows behind
//! and two concurrent outcomes cannot both pass the check.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Balance, DatabaseID, NewTransaction, Transaction, TransactionKind},
    stores::TransactionStore,
};

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction references a
/// [Category](crate::models::Category), the category table must be set up in
/// the database.
#[derive(Debug, Clone)]
pub struct SqliteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SqliteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// The balance check and the insert run in one SQLite transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InsufficientFunds] if an outcome of the given value would
    ///   drive the running total below zero,
    /// - [Error::InvalidCategory] if `category_id` does not refer to a valid
    ///   category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();
        let sql_transaction = connection.unchecked_transaction()?;

        let balance = select_balance(&sql_transaction)?;

        if new_transaction.kind == TransactionKind::Outcome
            && balance.total - new_transaction.value < 0.0
        {
            // Dropping the uncommitted SQL transaction rolls it back.
            return Err(Error::InsufficientFunds);
        }

        let transaction = insert_transaction(&sql_transaction, &new_transaction)?;
        sql_transaction.commit()?;

        Ok(transaction)
    }

    /// Insert a batch of transactions, all or nothing.
    ///
    /// The net check and every insert run in one SQLite transaction, so a
    /// failure on any row rolls back the whole batch.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InsufficientFunds] if the projected post-batch total is
    ///   below zero; no rows are inserted,
    /// - [Error::InvalidCategory] if a row's `category_id` does not refer to
    ///   a valid category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn import(&mut self, new_transactions: Vec<NewTransaction>) -> Result<Vec<Transaction>, Error> {
        let connection = self.connection.lock().unwrap();
        let sql_transaction = connection.unchecked_transaction()?;

        let net_value: f64 = new_transactions
            .iter()
            .map(NewTransaction::signed_value)
            .sum();
        let balance = select_balance(&sql_transaction)?;

        if balance.total + net_value < 0.0 {
            return Err(Error::InsufficientFunds);
        }

        let mut imported_transactions = Vec::with_capacity(new_transactions.len());

        for new_transaction in &new_transactions {
            imported_transactions.push(insert_transaction(&sql_transaction, new_transaction)?);
        }

        sql_transaction.commit()?;

        Ok(imported_transactions)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, title, value, kind, category_id, created_at, updated_at
                 FROM \"transaction\" WHERE id = :id;",
            )?
            .query_row(&[(":id", &id)], SqliteTransactionStore::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve all transactions in the database, in insertion order.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, title, value, kind, category_id, created_at, updated_at
                 FROM \"transaction\" ORDER BY id;",
            )?
            .query_map([], SqliteTransactionStore::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    /// Delete the transaction with `id` from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        let rows_deleted = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM \"transaction\" WHERE id = ?1;", (id,))?;

        if rows_deleted == 0 {
            Err(Error::NotFound)
        } else {
            Ok(())
        }
    }

    /// Compute the income, outcome and total over all stored transactions.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn balance(&self) -> Result<Balance, Error> {
        let connection = self.connection.lock().unwrap();

        select_balance(&connection)
    }
}

/// Compute the balance aggregate with a single SQL query.
fn select_balance(connection: &Connection) -> Result<Balance, Error> {
    let (income, outcome) = connection.query_row(
        "SELECT
            COALESCE(SUM(CASE WHEN kind = 'income' THEN value END), 0.0),
            COALESCE(SUM(CASE WHEN kind = 'outcome' THEN value END), 0.0)
         FROM \"transaction\";",
        [],
        |row| Ok((row.get::<_, f64>(0)?, row.get::<_, f64>(1)?)),
    )?;

    Ok(Balance {
        income,
        outcome,
        total: income - outcome,
    })
}

fn insert_transaction(
    connection: &Connection,
    new_transaction: &NewTransaction,
) -> Result<Transaction, Error> {
    let now = OffsetDateTime::now_utc();

    connection
        .prepare(
            "INSERT INTO \"transaction\" (title, value, kind, category_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, title, value, kind, category_id, created_at, updated_at;",
        )?
        .query_row(
            (
                &new_transaction.title,
                new_transaction.value,
                new_transaction.kind,
                new_transaction.category_id,
                now,
                now,
            ),
            SqliteTransactionStore::map_row,
        )
        .map_err(|error| match error {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            // The caller referenced a non-existent category.
            rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 787 => {
                Error::InvalidCategory
            }
            error => error.into(),
        })
}

impl CreateTable for SqliteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                value REAL NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'outcome')),
                category_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id)
            );",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SqliteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Self::ReturnType {
            id: row.get(offset)?,
            title: row.get(offset + 1)?,
            value: row.get(offset + 2)?,
            kind: row.get(offset + 3)?,
            category_id: row.get(offset + 4)?,
            created_at: row.get(offset + 5)?,
            updated_at: row.get(offset + 6)?,
        })
    }
}
