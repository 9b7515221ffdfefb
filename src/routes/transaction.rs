//! This file defines the API routes for listing, creating and deleting
//! transactions.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    models::{Balance, CategoryTitle, DatabaseID, NewTransaction, Transaction, TransactionKind},
    stores::{CategoryStore, TransactionStore},
};

/// The JSON payload for creating a transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionData {
    /// A text description of what the transaction is for.
    pub title: String,
    /// Either "income" or "outcome".
    #[serde(rename = "type")]
    pub kind: String,
    /// The unsigned amount of money earned or spent.
    pub value: f64,
    /// The title of the category the transaction belongs to. The category is
    /// created if it does not exist yet.
    pub category: String,
}

/// The JSON response for listing transactions.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionListResponse {
    /// All stored transactions, in insertion order.
    pub transactions: Vec<Transaction>,
    /// The running balance over all stored transactions.
    pub balance: Balance,
}

/// A route handler for listing all transactions along with the running
/// balance.
pub async fn get_transactions<C, T>(
    State(state): State<AppState<C, T>>,
) -> Result<Json<TransactionListResponse>, Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
{
    let transactions = state.transaction_store.get_all()?;
    let balance = state.transaction_store.balance()?;

    Ok(Json(TransactionListResponse {
        transactions,
        balance,
    }))
}

/// A route handler for creating a new transaction.
///
/// The referenced category is resolved by title and created on first use.
/// The store rejects an outcome that would drive the running balance below
/// zero, without side effects. A category created for a rejected transaction
/// is left in place as a tolerated inconsistency.
pub async fn create_transaction<C, T>(
    State(state): State<AppState<C, T>>,
    Json(data): Json<TransactionData>,
) -> Result<Json<Transaction>, Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
{
    let kind: TransactionKind = data.kind.parse()?;
    let category_title = CategoryTitle::new(&data.category)?;

    let category = state.category_store.get_or_create(category_title)?;
    let new_transaction = NewTransaction::new(&data.title, data.value, kind, category.id)?;

    let mut transaction_store = state.transaction_store;
    let transaction = transaction_store.create(new_transaction)?;

    Ok(Json(transaction))
}

/// A route handler for deleting a transaction by its database ID.
///
/// Returns the status code 404 if the requested transaction does not exist.
pub async fn delete_transaction<C, T>(
    State(state): State<AppState<C, T>>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<StatusCode, Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
{
    let mut transaction_store = state.transaction_store;
    transaction_store.delete(transaction_id)?;

    Ok(StatusCode::NO_CONTENT)
}
