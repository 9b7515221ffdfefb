//! This module defines the domain data types.

mod balance;
mod category;
mod transaction;

pub use balance::Balance;
pub use category::{Category, CategoryTitle};
pub use transaction::{NewTransaction, Transaction, TransactionKind};

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
