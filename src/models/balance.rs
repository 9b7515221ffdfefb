//! Defines the model for the running balance.

use serde::{Deserialize, Serialize};

/// The totals of all persisted transactions, computed on demand by the store.
///
/// Never persisted; `total` must be non-negative after every accepted
/// transaction creation or import.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// The sum of the values of all income transactions.
    pub income: f64,
    /// The sum of the values of all outcome transactions.
    pub outcome: f64,
    /// `income - outcome`.
    pub total: f64,
}
