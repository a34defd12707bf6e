//! The availability matcher.
//!
//! Classifies recipes against current pantry stock: fully available (every
//! requirement satisfied), almost available (1 up to a small bounded number
//! of requirements missing), or unavailable (omitted from both views).
//!
//! The functions here are pure and idempotent; they never touch the store.
//! There is no incremental update — after any mutation to recipes,
//! requirement rows or pantry stock, callers recompute from fresh snapshots
//! (see [`Store::availability`](crate::store::Store::availability)).

use crate::pantry::PantryIngredient;
use crate::recipe::{Recipe, RecipeIngredient};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default upper bound on missing requirements for "almost available".
pub const DEFAULT_ALMOST_MISSING_MAX: usize = 3;

/// A recipe together with its requirement rows.
///
/// `required` is expected in the recipe's display order (ascending by
/// referenced ingredient name); the missing lists produced by the matcher
/// preserve that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRequirements {
    /// The recipe.
    pub recipe: Recipe,
    /// Its requirement rows.
    pub required: Vec<RecipeIngredient>,
}

/// A recipe that is close to cookable, with what is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlmostAvailable {
    /// The recipe.
    pub recipe: Recipe,
    /// The unsatisfied requirement rows, in requirement order.
    pub missing: Vec<RecipeIngredient>,
}

/// Result of an availability computation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Availability {
    /// Recipes whose every requirement is satisfied, in input order.
    pub available: Vec<Recipe>,
    /// Recipes missing between one and the configured maximum requirements.
    pub almost_available: Vec<AlmostAvailable>,
}

/// Check whether a single requirement is satisfied by the pantry.
///
/// A requirement is satisfied iff some single pantry row references the
/// same ingredient, holds at least the required quantity, and uses exactly
/// the same unit. Quantities are never summed across rows, and a
/// requirement without an ingredient reference is never satisfied.
#[must_use]
pub fn is_satisfied(required: &RecipeIngredient, pantry: &[PantryIngredient]) -> bool {
    let Some(ingredient) = &required.ingredient else {
        return false;
    };
    pantry.iter().any(|row| {
        row.ingredient == *ingredient
            && row.quantity >= required.quantity
            && row.unit == required.unit
    })
}

/// The unsatisfied subset of `required`, preserving input order.
#[must_use]
pub fn missing_ingredients(
    required: &[RecipeIngredient],
    pantry: &[PantryIngredient],
) -> Vec<RecipeIngredient> {
    required
        .iter()
        .filter(|row| !is_satisfied(row, pantry))
        .cloned()
        .collect()
}

/// Classify recipes against the pantry with the default missing window.
#[must_use]
pub fn compute_availability(
    recipes: &[RecipeRequirements],
    pantry: &[PantryIngredient],
) -> Availability {
    compute_availability_with_limit(recipes, pantry, DEFAULT_ALMOST_MISSING_MAX)
}

/// Classify recipes against the pantry.
///
/// A recipe with zero requirements is vacuously available. A recipe whose
/// unsatisfied count lies in `1..=almost_missing_max` is almost available;
/// anything missing more is omitted from both views. `available` preserves
/// the input recipe order.
#[must_use]
pub fn compute_availability_with_limit(
    recipes: &[RecipeRequirements],
    pantry: &[PantryIngredient],
    almost_missing_max: usize,
) -> Availability {
    let mut availability = Availability::default();

    for entry in recipes {
        let missing = missing_ingredients(&entry.required, pantry);
        if missing.is_empty() {
            availability.available.push(entry.recipe.clone());
        } else if missing.len() <= almost_missing_max {
            availability.almost_available.push(AlmostAvailable {
                recipe: entry.recipe.clone(),
                missing,
            });
        }
    }

    debug!(
        recipes = recipes.len(),
        pantry_rows = pantry.len(),
        available = availability.available.len(),
        almost = availability.almost_available.len(),
        "computed recipe availability"
    );

    availability
}
