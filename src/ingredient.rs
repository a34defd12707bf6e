//! Ingredient catalog types.
//!
//! Ingredients are reusable named food items, independent of any recipe.
//! Recipe requirements and pantry stock reference them by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IngredientId(Uuid);

impl IngredientId {
    /// Create a new random ingredient ID.
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

impl Default for IngredientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for IngredientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for IngredientId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A catalog ingredient.
///
/// Names are unique by convention, not enforced. An ingredient cannot be
/// deleted while any recipe requirement references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier.
    pub id: IngredientId,
    /// Ingredient name.
    pub name: String,
    /// Free-text description (may be empty).
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Ingredient {
    /// Create a new ingredient with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: IngredientId::new(),
            name: name.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}
