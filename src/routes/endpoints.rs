//! The API endpoint URIs.

/// The route to list transactions with the running balance, or to create a
/// transaction.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";
/// The route to upload a CSV file for importing transactions.
pub const IMPORT: &str = "/transactions/import";
