//! This file defines the `Category` type and the validated title used to
//! create one. A category acts like a label for transactions; a transaction
//! has exactly one category.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, models::DatabaseID};

/// The title of a category.
///
/// Titles are non-empty after trimming surrounding whitespace. They are
/// unique across categories; the store enforces this with a UNIQUE
/// constraint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryTitle(String);

impl CategoryTitle {
    /// Create a category title from `title`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyCategoryTitle] if `title` is empty or whitespace.
    pub fn new(title: &str) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            Err(Error::EmptyCategoryTitle)
        } else {
            Ok(Self(title.to_string()))
        }
    }

    /// Create a category title without validation.
    ///
    /// The caller should ensure that the string is not empty. This function
    /// has `_unchecked` in the name but is not `unsafe`, because violating
    /// the non-empty invariant causes incorrect behaviour but does not affect
    /// memory safety.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_string())
    }
}

impl AsRef<str> for CategoryTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A grouping label for transactions, e.g., 'Food', 'Rent', 'Salary'.
///
/// Categories are created lazily the first time a title is referenced by an
/// incoming transaction, and are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: DatabaseID,
    /// The title of the category, unique across all categories.
    pub title: CategoryTitle,
}
