//! Convenient re-exports for common usage.
//!
//! ```
//! use larder::prelude::*;
//! ```

// Core types
pub use crate::error::{LarderError, Result};
pub use crate::store::{Settings, Store, StoreConfig, StoreStats};

// Catalog types
pub use crate::ingredient::{Ingredient, IngredientId};
pub use crate::unit::UnitOfMeasure;

// Recipe types
pub use crate::recipe::{
    scaled_quantity, sorted_ingredients, sorted_steps, Difficulty, Recipe, RecipeId,
    RecipeIngredient, RecipeIngredientId, Step, StepDuration, StepId,
};

// Pantry types
pub use crate::pantry::{PantryIngredient, PantryIngredientId};

// Recipe books
pub use crate::book::{RecipeBook, RecipeBookId};

// Derived views
pub use crate::availability::{
    compute_availability, compute_availability_with_limit, is_satisfied, missing_ingredients,
    AlmostAvailable, Availability, RecipeRequirements,
};
pub use crate::cooking::{can_complete, can_uncomplete, CookingSession};
