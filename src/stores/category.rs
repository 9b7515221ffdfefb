//! Defines the category store trait.

use crate::{
    Error,
    models::{Category, CategoryTitle, DatabaseID},
};

/// Creates and retrieves the categories that group transactions.
pub trait CategoryStore {
    /// Get the category with `title`, creating it first if no category with
    /// that title exists.
    ///
    /// Implementers must guarantee at most one category per distinct title,
    /// including under concurrent access. The SQLite implementation relies on
    /// a UNIQUE constraint and a conflict-tolerant insert rather than
    /// look-up-then-insert.
    fn get_or_create(&self, title: CategoryTitle) -> Result<Category, Error>;

    /// Get a category by its ID.
    fn get(&self, category_id: DatabaseID) -> Result<Category, Error>;

    /// Get all categories.
    fn get_all(&self) -> Result<Vec<Category>, Error>;
}
