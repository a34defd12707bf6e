//! Recipe books: named collections of recipes.
//!
//! Membership lives in the store as (book, recipe) links; deleting a book
//! removes only the links, never the recipes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a recipe book.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeBookId(Uuid);

impl RecipeBookId {
    /// Create a new random book ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecipeBookId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecipeBookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecipeBookId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A named collection of recipes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeBook {
    /// Unique identifier.
    pub id: RecipeBookId,
    /// Book name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl RecipeBook {
    /// Create a new book with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecipeBookId::new(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_id_roundtrip() {
        let id = RecipeBookId::new();
        let parsed: RecipeBookId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_book_new() {
        let book = RecipeBook::new("Weeknight dinners");
        assert_eq!(book.name, "Weeknight dinners");
    }
}
