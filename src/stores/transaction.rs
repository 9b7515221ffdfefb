//! Defines the transaction store trait.

use crate::{
    Error,
    models::{Balance, DatabaseID, NewTransaction, Transaction},
};

/// Handles the creation, retrieval and deletion of transactions, and computes
/// the running balance.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    ///
    /// The balance check and the insert must be a single atomic operation:
    /// an outcome transaction of value `v` is rejected with
    /// [Error::InsufficientFunds] when `balance.total - v < 0`, and a
    /// rejected transaction must leave the store unchanged. A separate
    /// read-then-write would let two concurrent outcomes each pass the check
    /// and together drive the total negative.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Insert a batch of transactions, all or nothing.
    ///
    /// The whole batch is rejected with [Error::InsufficientFunds] when
    /// `balance.total + s < 0`, where `s` is the net signed sum of the batch
    /// (income positive, outcome negative). On success the inserted
    /// transactions are returned in input order.
    fn import(&mut self, new_transactions: Vec<NewTransaction>) -> Result<Vec<Transaction>, Error>;

    /// Retrieve a transaction from the store.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error>;

    /// Retrieve all transactions in the order they were stored.
    fn get_all(&self) -> Result<Vec<Transaction>, Error>;

    /// Delete the transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a stored
    /// transaction.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;

    /// Compute the income, outcome and total over all stored transactions.
    fn balance(&self) -> Result<Balance, Error>;
}
