//! Sample data for demos and fresh installs.

use crate::error::Result;
use crate::ingredient::Ingredient;
use crate::recipe::{Difficulty, Recipe};
use crate::store::Store;
use crate::unit::UnitOfMeasure;
use std::collections::HashMap;
use tracing::info;

const INGREDIENTS: &[(&str, &str)] = &[
    (
        "All-purpose Flour",
        "A versatile wheat flour suitable for most baking needs",
    ),
    ("Sugar", "Regular granulated white sugar"),
    ("Eggs", "Fresh chicken eggs"),
    ("Milk", "Whole dairy milk"),
    ("Butter", "Unsalted butter"),
    ("Vanilla Extract", "Pure vanilla extract"),
    ("Baking Powder", "Leavening agent for baking"),
    ("Salt", "Fine table salt"),
    ("Chocolate Chips", "Semi-sweet chocolate chips"),
    ("Olive Oil", "Extra virgin olive oil"),
];

const COOKIE_STEPS: &[&str] = &[
    "Preheat oven to 375°F (190°C) and line baking sheets with parchment paper.",
    "In a large bowl, cream together butter and sugars for 3 minutes until light and fluffy.",
    "Beat in eggs one at a time, then stir in vanilla extract.",
    "In another bowl, whisk together flour, baking soda, and salt.",
    "Gradually mix dry ingredients into wet ingredients.",
    "Fold in chocolate chips.",
    "Drop rounded tablespoons of dough onto prepared baking sheets.",
    "Bake for 10 minutes or until edges are lightly browned.",
];

const COOKIE_REQUIREMENTS: &[(&str, f64, UnitOfMeasure)] = &[
    ("All-purpose Flour", 280.0, UnitOfMeasure::Grams),
    ("Sugar", 200.0, UnitOfMeasure::Grams),
    ("Butter", 230.0, UnitOfMeasure::Grams),
    ("Eggs", 2.0, UnitOfMeasure::Pieces),
    ("Chocolate Chips", 340.0, UnitOfMeasure::Grams),
    ("Vanilla Extract", 10.0, UnitOfMeasure::Milliliters),
    ("Baking Powder", 5.0, UnitOfMeasure::Grams),
    ("Salt", 3.0, UnitOfMeasure::Grams),
];

/// Seed a store with a small ingredient catalog and starter recipes.
///
/// # Errors
///
/// Returns an error if any insertion fails.
pub fn seed(store: &Store) -> Result<()> {
    let mut catalog: HashMap<&str, Ingredient> = HashMap::new();
    for (name, description) in INGREDIENTS {
        let ingredient = store.add_ingredient(*name, *description)?;
        catalog.insert(name, ingredient);
    }

    let cookies = Recipe::builder()
        .name("Classic Chocolate Chip Cookies")
        .description("Soft and chewy cookies loaded with chocolate chips")
        .time_in_minutes(45)
        .servings(24)
        .difficulty(Difficulty::Easy)
        .build();
    store.add_recipe(&cookies)?;

    for (order, instructions) in COOKIE_STEPS.iter().enumerate() {
        store.add_step(&cookies.id, *instructions, order as i32)?;
    }
    for (name, quantity, unit) in COOKIE_REQUIREMENTS {
        if let Some(ingredient) = catalog.get(name) {
            store.add_recipe_ingredient(&cookies.id, &ingredient.id, *quantity, *unit)?;
        }
    }

    let pizza = Recipe::builder()
        .name("Homemade Pizza")
        .description("Crispy crust topped with fresh ingredients")
        .time_in_minutes(60)
        .servings(4)
        .difficulty(Difficulty::Medium)
        .build();
    store.add_recipe(&pizza)?;

    let stir_fry = Recipe::builder()
        .name("Beef Stir Fry")
        .description("Quick and flavorful Asian-inspired dish")
        .time_in_minutes(30)
        .servings(4)
        .difficulty(Difficulty::Easy)
        .build();
    store.add_recipe(&stir_fry)?;

    info!("seeded sample data");
    Ok(())
}
