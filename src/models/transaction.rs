//! This file defines the `Transaction` type, the core type of the ledger, and
//! the types needed to create one.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, models::DatabaseID};

/// Whether a transaction adds money to or removes money from the ledger.
///
/// Serialized as `"income"` or `"outcome"` both on the wire and in the
/// database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, increases the running balance.
    Income,
    /// Money spent, decreases the running balance.
    Outcome,
}

impl TransactionKind {
    /// The sign this kind contributes to the running balance, either `1.0` or
    /// `-1.0`.
    pub fn sign(&self) -> f64 {
        match self {
            TransactionKind::Income => 1.0,
            TransactionKind::Outcome => -1.0,
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "outcome" => Ok(TransactionKind::Outcome),
            other => Err(Error::InvalidKind(other.to_string())),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Outcome => write!(f, "outcome"),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An income or outcome, i.e. an event where money was either earned or spent.
///
/// Transactions are immutable after creation; there is no update operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseID,
    /// A text description of what the transaction was for.
    pub title: String,
    /// The unsigned amount of money earned or spent.
    pub value: f64,
    /// Whether the transaction is an income or an outcome.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The ID of the category the transaction belongs to.
    pub category_id: DatabaseID,
    /// When the transaction was persisted.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last written. Equal to `created_at` since
    /// transactions are immutable.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A validated candidate transaction that has not been persisted yet.
///
/// Finalize with [TransactionStore::create](crate::stores::TransactionStore::create)
/// or [TransactionStore::import](crate::stores::TransactionStore::import).
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A text description of what the transaction is for.
    pub title: String,
    /// The unsigned amount of money earned or spent.
    pub value: f64,
    /// Whether the transaction is an income or an outcome.
    pub kind: TransactionKind,
    /// The ID of the category the transaction belongs to.
    pub category_id: DatabaseID,
}

impl NewTransaction {
    /// Create a candidate transaction.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyTitle] if `title` is empty after trimming,
    /// [Error::NonFiniteValue] if `value` is NaN or infinite, or
    /// [Error::NegativeValue] if `value` is negative.
    pub fn new(
        title: &str,
        value: f64,
        kind: TransactionKind,
        category_id: DatabaseID,
    ) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }

        // NaN slips past the sign check and would poison the balance sums.
        if !value.is_finite() {
            return Err(Error::NonFiniteValue(value));
        }

        if value < 0.0 {
            return Err(Error::NegativeValue(value));
        }

        Ok(Self {
            title: title.to_string(),
            value,
            kind,
            category_id,
        })
    }

    /// The value this transaction contributes to the running balance:
    /// positive for income, negative for outcome.
    pub fn signed_value(&self) -> f64 {
        self.kind.sign() * self.value
    }
}
