//! Pantry stock rows.
//!
//! Each row records one batch of an ingredient currently in the household.
//! Several rows may reference the same ingredient; no deduplication is
//! enforced, and the availability matcher deliberately checks requirements
//! against single rows rather than summing batches.

use crate::ingredient::IngredientId;
use crate::unit::UnitOfMeasure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pantry row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PantryIngredientId(Uuid);

impl PantryIngredientId {
    /// Create a new random pantry row ID.
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

impl Default for PantryIngredientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PantryIngredientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PantryIngredientId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One batch of an ingredient currently in stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantryIngredient {
    /// Unique identifier.
    pub id: PantryIngredientId,
    /// Referenced catalog ingredient.
    pub ingredient: IngredientId,
    /// Quantity on hand.
    pub quantity: f64,
    /// Unit the quantity is expressed in.
    pub unit: UnitOfMeasure,
    /// When this batch was added (pantry listings are newest-first).
    pub date_added: DateTime<Utc>,
}

impl PantryIngredient {
    /// Create a new pantry row dated now.
    #[must_use]
    pub fn new(ingredient: IngredientId, quantity: f64, unit: UnitOfMeasure) -> Self {
        Self {
            id: PantryIngredientId::new(),
            ingredient,
            quantity,
            unit,
            date_added: Utc::now(),
        }
    }
}
