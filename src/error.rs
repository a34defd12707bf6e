//! Error types for larder operations.

use thiserror::Error;

/// Result type alias for larder operations.
pub type Result<T> = std::result::Result<T, LarderError>;

/// Errors that can occur during larder store operations.
#[derive(Error, Debug)]
pub enum LarderError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Entity not found.
    #[error("not found: {kind} '{id}'")]
    NotFound {
        /// Kind of entity (ingredient, recipe, step, ...).
        kind: String,
        /// Identifier that was looked up.
        id: String,
    },

    /// Ingredient is still referenced by recipes and cannot be deleted.
    #[error("ingredient '{name}' is used by {recipe_count} recipe(s)")]
    IngredientInUse {
        /// Name of the ingredient.
        name: String,
        /// Number of recipes referencing it.
        recipe_count: usize,
    },

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),
}

impl LarderError {
    /// Build a `NotFound` error for the given entity kind and id.
    pub(crate) fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }
}
