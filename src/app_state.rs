//! Implements the struct that holds the state of the REST server.

use std::marker::{Send, Sync};

use crate::stores::{CategoryStore, TransactionStore};

/// The state of the REST server.
///
/// The stores are passed in explicitly so that route handlers can be tested
/// against in-memory databases or test doubles.
#[derive(Debug, Clone)]
pub struct AppState<C, T>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
{
    /// The store for managing [categories](crate::models::Category).
    pub category_store: C,
    /// The store for managing [transactions](crate::models::Transaction) and
    /// computing the running balance.
    pub transaction_store: T,
}

impl<C, T> AppState<C, T>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
{
    /// Create a new [AppState].
    pub fn new(category_store: C, transaction_store: T) -> Self {
        Self {
            category_store,
            transaction_store,
        }
    }
}
