//! Recipe types and projections.
//!
//! A recipe owns its requirement rows ([`RecipeIngredient`]) and its
//! [`Step`](crate::recipe::Step)s. Quantities on requirement rows are
//! relative to the recipe's baseline `servings` and can be rescaled with
//! [`scaled_quantity`].

mod difficulty;
mod duration;
mod step;

pub use difficulty::Difficulty;
pub use duration::StepDuration;
pub use step::{sorted_steps, Step, StepId};

use crate::ingredient::{Ingredient, IngredientId};
use crate::unit::UnitOfMeasure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeId(Uuid);

impl RecipeId {
    /// Create a new random recipe ID.
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

impl Default for RecipeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecipeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique identifier for a recipe requirement row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeIngredientId(Uuid);

impl RecipeIngredientId {
    /// Create a new random requirement ID.
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

impl Default for RecipeIngredientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecipeIngredientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecipeIngredientId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A named dish with steps, requirements, time, servings and difficulty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier.
    pub id: RecipeId,
    /// Recipe name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Total preparation time in minutes.
    pub time_in_minutes: u32,
    /// Baseline serving count the requirement quantities refer to.
    pub servings: i32,
    /// Difficulty level.
    pub difficulty: Difficulty,
    /// Raw image bytes, carried opaquely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<Vec<u8>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last updated timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a new recipe builder.
    #[must_use]
    pub fn builder() -> RecipeBuilder {
        RecipeBuilder::new()
    }

    /// Quantity of a requirement row rescaled to `desired_servings`.
    #[must_use]
    pub fn scaled_quantity(&self, required: &RecipeIngredient, desired_servings: i32) -> f64 {
        scaled_quantity(required.quantity, desired_servings, self.servings)
    }
}

/// Builder for creating recipes.
#[derive(Debug)]
pub struct RecipeBuilder {
    name: String,
    description: String,
    time_in_minutes: u32,
    servings: i32,
    difficulty: Difficulty,
    image_data: Option<Vec<u8>>,
}

impl RecipeBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            time_in_minutes: 0,
            servings: 1,
            difficulty: Difficulty::default(),
            image_data: None,
        }
    }

    /// Set the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the preparation time in minutes.
    #[must_use]
    pub fn time_in_minutes(mut self, minutes: u32) -> Self {
        self.time_in_minutes = minutes;
        self
    }

    /// Set the baseline serving count.
    #[must_use]
    pub fn servings(mut self, servings: i32) -> Self {
        self.servings = servings;
        self
    }

    /// Set the difficulty.
    #[must_use]
    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Attach raw image bytes.
    #[must_use]
    pub fn image_data(mut self, data: Vec<u8>) -> Self {
        self.image_data = Some(data);
        self
    }

    /// Build the recipe.
    #[must_use]
    pub fn build(self) -> Recipe {
        Recipe {
            id: RecipeId::new(),
            name: self.name,
            description: self.description,
            time_in_minutes: self.time_in_minutes,
            servings: self.servings,
            difficulty: self.difficulty,
            image_data: self.image_data,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

impl Default for RecipeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A requirement row linking one recipe to one ingredient.
///
/// `ingredient` is optional: a row whose catalog reference is missing is
/// never satisfiable and sorts first (its name counts as empty).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Unique identifier.
    pub id: RecipeIngredientId,
    /// Owning recipe.
    pub recipe: RecipeId,
    /// Referenced catalog ingredient, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient: Option<IngredientId>,
    /// Required quantity at the recipe's baseline servings.
    pub quantity: f64,
    /// Unit the quantity is expressed in.
    pub unit: UnitOfMeasure,
}

impl RecipeIngredient {
    /// Create a new requirement row.
    #[must_use]
    pub fn new(
        recipe: RecipeId,
        ingredient: IngredientId,
        quantity: f64,
        unit: UnitOfMeasure,
    ) -> Self {
        Self {
            id: RecipeIngredientId::new(),
            recipe,
            ingredient: Some(ingredient),
            quantity,
            unit,
        }
    }
}

/// Sort requirement rows ascending by referenced ingredient name.
///
/// The comparison is case-sensitive ordinal; rows whose ingredient is
/// missing from `catalog` (or unset) sort as the empty string, i.e. first.
/// The sort is stable, so equal names keep their input order.
#[must_use]
pub fn sorted_ingredients(
    required: &[RecipeIngredient],
    catalog: &HashMap<IngredientId, Ingredient>,
) -> Vec<RecipeIngredient> {
    let name_of = |row: &RecipeIngredient| -> String {
        row.ingredient
            .as_ref()
            .and_then(|id| catalog.get(id))
            .map(|ingredient| ingredient.name.clone())
            .unwrap_or_default()
    };

    let mut sorted = required.to_vec();
    sorted.sort_by(|a, b| name_of(a).cmp(&name_of(b)));
    sorted
}

/// Rescale a baseline quantity to a desired serving count.
///
/// `base_servings <= 0` is treated as 1 so the result is always finite.
#[must_use]
pub fn scaled_quantity(base: f64, desired_servings: i32, base_servings: i32) -> f64 {
    let base_servings = if base_servings <= 0 { 1 } else { base_servings };
    base * f64::from(desired_servings) / f64::from(base_servings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_id_generation() {
        let id1 = RecipeId::new();
        let id2 = RecipeId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_recipe_builder() {
        let recipe = Recipe::builder()
            .name("Carbonara")
            .description("Roman pasta dish")
            .time_in_minutes(25)
            .servings(4)
            .difficulty(Difficulty::Medium)
            .build();

        assert_eq!(recipe.name, "Carbonara");
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert!(recipe.image_data.is_none());
    }

    #[test]
    fn test_recipe_builder_default_servings() {
        let recipe = Recipe::builder().name("Toast").build();
        assert_eq!(recipe.servings, 1);
    }

    #[test]
    fn test_scaled_quantity() {
        assert_eq!(scaled_quantity(100.0, 4, 2), 200.0);
        assert_eq!(scaled_quantity(100.0, 1, 4), 25.0);
        assert_eq!(scaled_quantity(0.0, 3, 2), 0.0);
    }

    #[test]
    fn test_scaled_quantity_zero_servings_guard() {
        assert_eq!(scaled_quantity(100.0, 1, 0), 100.0);
        assert_eq!(scaled_quantity(100.0, 2, -3), 200.0);
        assert!(scaled_quantity(100.0, 1, 0).is_finite());
    }

    #[test]
    fn test_recipe_scaled_quantity() {
        let recipe = Recipe::builder().name("Pancakes").servings(2).build();
        let flour = RecipeIngredient::new(
            recipe.id.clone(),
            IngredientId::new(),
            250.0,
            UnitOfMeasure::Grams,
        );

        assert_eq!(recipe.scaled_quantity(&flour, 6), 750.0);
    }

    #[test]
    fn test_sorted_ingredients_by_name() {
        let recipe_id = RecipeId::new();
        let flour = Ingredient::new("Flour", "");
        let butter = Ingredient::new("Butter", "");
        let sugar = Ingredient::new("Sugar", "");

        let rows = vec![
            RecipeIngredient::new(recipe_id.clone(), sugar.id.clone(), 1.0, UnitOfMeasure::Cups),
            RecipeIngredient::new(
                recipe_id.clone(),
                flour.id.clone(),
                200.0,
                UnitOfMeasure::Grams,
            ),
            RecipeIngredient::new(recipe_id, butter.id.clone(), 100.0, UnitOfMeasure::Grams),
        ];

        let catalog: HashMap<_, _> = [flour, butter, sugar]
            .into_iter()
            .map(|ingredient| (ingredient.id.clone(), ingredient))
            .collect();

        let sorted = sorted_ingredients(&rows, &catalog);
        let names: Vec<&str> = sorted
            .iter()
            .map(|row| {
                row.ingredient
                    .as_ref()
                    .map(|id| catalog[id].name.as_str())
                    .unwrap_or("")
            })
            .collect();
        assert_eq!(names, vec!["Butter", "Flour", "Sugar"]);
    }

    #[test]
    fn test_sorted_ingredients_missing_reference_sorts_first() {
        let recipe_id = RecipeId::new();
        let apple = Ingredient::new("Apple", "");

        let mut dangling = RecipeIngredient::new(
            recipe_id.clone(),
            IngredientId::new(),
            1.0,
            UnitOfMeasure::Pieces,
        );
        dangling.ingredient = None;

        let rows = vec![
            RecipeIngredient::new(recipe_id, apple.id.clone(), 2.0, UnitOfMeasure::Pieces),
            dangling.clone(),
        ];

        let catalog: HashMap<_, _> = [(apple.id.clone(), apple)].into_iter().collect();

        let sorted = sorted_ingredients(&rows, &catalog);
        assert_eq!(sorted[0].id, dangling.id);
    }

    #[test]
    fn test_recipe_serialization() {
        let recipe = Recipe::builder().name("Soup").servings(2).build();
        let json = serde_json::to_string(&recipe).unwrap();
        let deserialized: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.id, recipe.id);
        assert_eq!(deserialized.name, "Soup");
    }
}
