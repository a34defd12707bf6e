//! Store implementation with `SQLite` persistence.
//!
//! The store is the single owner of entity data. Entities are plain value
//! types; every relationship is an ID reference resolved through the store.
//! Derived views (availability, requirement projections) are recomputed
//! from fresh snapshots on demand; nothing here is reactive.

mod database;

pub use database::StoreDb;

use crate::availability::{compute_availability_with_limit, Availability, RecipeRequirements};
use crate::book::{RecipeBook, RecipeBookId};
use crate::error::{LarderError, Result};
use crate::ingredient::{Ingredient, IngredientId};
use crate::pantry::{PantryIngredient, PantryIngredientId};
use crate::recipe::{Recipe, RecipeId, RecipeIngredient, RecipeIngredientId, Step, StepId};
use crate::unit::UnitOfMeasure;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration for a larder store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base path for the store.
    pub base_path: PathBuf,
}

impl StoreConfig {
    /// Create a new config with the given base path.
    #[must_use]
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the database path.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.base_path.join("larder.db")
    }

    /// Get the config file path.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.base_path.join("config.toml")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        let home = dirs_path();
        Self::new(home.join(".larder"))
    }
}

fn dirs_path() -> PathBuf {
    std::env::var("HOME").map_or_else(|_| PathBuf::from("."), PathBuf::from)
}

/// Tunable settings, read from `config.toml` when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Upper bound on missing requirements for "almost available".
    pub almost_missing_max: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            almost_missing_max: crate::availability::DEFAULT_ALMOST_MISSING_MAX,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Entity counts for a store.
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Number of catalog ingredients.
    pub ingredient_count: usize,
    /// Number of recipes.
    pub recipe_count: usize,
    /// Number of pantry rows.
    pub pantry_count: usize,
    /// Number of recipe books.
    pub book_count: usize,
}

/// The larder store.
pub struct Store {
    config: StoreConfig,
    settings: Settings,
    db: StoreDb,
}

impl Store {
    /// Create or open a store at the default location (~/.larder).
    ///
    /// # Errors
    ///
    /// Returns an error if initialization fails.
    pub fn open_default() -> Result<Self> {
        Self::open(StoreConfig::default())
    }

    /// Create or open a store with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if initialization fails.
    pub fn open(config: StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.base_path)?;

        let settings = Settings::load(config.config_path())?;
        let db = StoreDb::open(config.db_path())?;

        info!(path = %config.base_path.display(), "opened larder store");

        Ok(Self {
            config,
            settings,
            db,
        })
    }

    /// Get the store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Get the active settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ==================== Ingredients ====================

    /// Add a catalog ingredient.
    ///
    /// # Errors
    ///
    /// Returns an error if insertion fails.
    pub fn add_ingredient(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Ingredient> {
        let ingredient = Ingredient::new(name, description);
        self.db.insert_ingredient(&ingredient)?;
        debug!(name = %ingredient.name, "added ingredient");
        Ok(ingredient)
    }

    /// Get an ingredient by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the ingredient is not found.
    pub fn get_ingredient(&self, id: &IngredientId) -> Result<Ingredient> {
        self.db.get_ingredient(id)
    }

    /// List all ingredients, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
        self.db.list_ingredients()
    }

    /// Update an ingredient's name and description.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_ingredient(&self, ingredient: &Ingredient) -> Result<()> {
        self.db.update_ingredient(ingredient)
    }

    /// Delete an ingredient.
    ///
    /// Pantry rows referencing it are removed as well.
    ///
    /// # Errors
    ///
    /// Returns [`LarderError::IngredientInUse`] while any recipe requirement
    /// still references the ingredient.
    pub fn delete_ingredient(&self, id: &IngredientId) -> Result<()> {
        let ingredient = self.db.get_ingredient(id)?;
        let recipe_count = self.db.count_recipe_references(id)?;
        if recipe_count > 0 {
            return Err(LarderError::IngredientInUse {
                name: ingredient.name,
                recipe_count,
            });
        }
        self.db.delete_ingredient(id)?;
        debug!(name = %ingredient.name, "deleted ingredient");
        Ok(())
    }

    /// Recipes whose requirements reference an ingredient, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recipes_using(&self, id: &IngredientId) -> Result<Vec<Recipe>> {
        self.db.recipes_using(id)
    }

    // ==================== Recipes ====================

    /// Register a recipe built with [`Recipe::builder`].
    ///
    /// # Errors
    ///
    /// Returns an error if insertion fails.
    pub fn add_recipe(&self, recipe: &Recipe) -> Result<RecipeId> {
        self.db.insert_recipe(recipe)?;
        debug!(name = %recipe.name, "added recipe");
        Ok(recipe.id.clone())
    }

    /// Get a recipe by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipe is not found.
    pub fn get_recipe(&self, id: &RecipeId) -> Result<Recipe> {
        self.db.get_recipe(id)
    }

    /// List all recipes, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_recipes(&self) -> Result<Vec<Recipe>> {
        self.db.list_recipes()
    }

    /// Recipes whose name contains `query`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn search_recipes(&self, query: &str) -> Result<Vec<Recipe>> {
        self.db.search_recipes(query)
    }

    /// Update a recipe in place (edit-in-place semantics, no versioning).
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_recipe(&self, recipe: &Recipe) -> Result<()> {
        self.db.update_recipe(recipe)
    }

    /// Delete a recipe, cascading to owned steps and requirement rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_recipe(&self, id: &RecipeId) -> Result<()> {
        self.db.delete_recipe(id)?;
        debug!(recipe = %id, "deleted recipe");
        Ok(())
    }

    // ==================== Requirement rows ====================

    /// Link an ingredient to a recipe with a quantity and unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipe or ingredient does not exist.
    pub fn add_recipe_ingredient(
        &self,
        recipe: &RecipeId,
        ingredient: &IngredientId,
        quantity: f64,
        unit: UnitOfMeasure,
    ) -> Result<RecipeIngredient> {
        // Resolve both ends so dangling references cannot be created here.
        let recipe = self.db.get_recipe(recipe)?;
        let ingredient = self.db.get_ingredient(ingredient)?;

        let link = RecipeIngredient::new(recipe.id, ingredient.id, quantity, unit);
        self.db.insert_recipe_ingredient(&link)?;
        Ok(link)
    }

    /// Requirement rows of a recipe, sorted by ingredient name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recipe_ingredients(&self, recipe: &RecipeId) -> Result<Vec<RecipeIngredient>> {
        self.db.list_recipe_ingredients(recipe)
    }

    /// Update a requirement row's quantity and unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_recipe_ingredient(&self, link: &RecipeIngredient) -> Result<()> {
        self.db.update_recipe_ingredient(link)
    }

    /// Remove a requirement row, also dropping it from any step that uses it.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove_recipe_ingredient(&self, id: &RecipeIngredientId) -> Result<()> {
        self.db.remove_ingredient_from_steps(id)?;
        self.db.delete_recipe_ingredient(id)
    }

    // ==================== Steps ====================

    /// Append a step to a recipe.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipe does not exist.
    pub fn add_step(
        &self,
        recipe: &RecipeId,
        instructions: impl Into<String>,
        order: i32,
    ) -> Result<Step> {
        let recipe = self.db.get_recipe(recipe)?;
        let step = Step::new(recipe.id, instructions, order);
        self.db.insert_step(&step)?;
        Ok(step)
    }

    /// Get a step by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the step is not found.
    pub fn get_step(&self, id: &StepId) -> Result<Step> {
        self.db.get_step(id)
    }

    /// Steps of a recipe in deterministic `(order, created_at)` order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn steps(&self, recipe: &RecipeId) -> Result<Vec<Step>> {
        self.db.list_steps(recipe)
    }

    /// Update a step's instructions, order and ingredient list.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_step(&self, step: &Step) -> Result<()> {
        self.db.update_step(step)
    }

    /// Delete a step.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_step(&self, id: &StepId) -> Result<()> {
        self.db.delete_step(id)
    }

    /// Assign the requirement rows a step uses.
    ///
    /// # Errors
    ///
    /// Returns [`LarderError::Validation`] if any row belongs to a recipe
    /// other than the step's.
    pub fn set_step_ingredients(
        &self,
        step: &StepId,
        links: &[RecipeIngredientId],
    ) -> Result<()> {
        let mut step = self.db.get_step(step)?;
        for id in links {
            let link = self.db.get_recipe_ingredient(id)?;
            if link.recipe != step.recipe {
                return Err(LarderError::Validation(format!(
                    "recipe ingredient '{id}' belongs to another recipe"
                )));
            }
        }
        step.ingredients = links.to_vec();
        self.db.update_step(&step)
    }

    // ==================== Pantry ====================

    /// Add a batch of an ingredient to the pantry.
    ///
    /// # Errors
    ///
    /// Returns an error if the ingredient does not exist.
    pub fn add_pantry_ingredient(
        &self,
        ingredient: &IngredientId,
        quantity: f64,
        unit: UnitOfMeasure,
    ) -> Result<PantryIngredient> {
        let ingredient = self.db.get_ingredient(ingredient)?;
        let row = PantryIngredient::new(ingredient.id, quantity, unit);
        self.db.insert_pantry_ingredient(&row)?;
        debug!(ingredient = %ingredient.name, quantity = row.quantity, "added pantry stock");
        Ok(row)
    }

    /// Get a pantry row by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the row is not found.
    pub fn get_pantry_ingredient(&self, id: &PantryIngredientId) -> Result<PantryIngredient> {
        self.db.get_pantry_ingredient(id)
    }

    /// All pantry rows, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_pantry(&self) -> Result<Vec<PantryIngredient>> {
        self.db.list_pantry()
    }

    /// Pantry rows whose ingredient name contains `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn search_pantry(&self, query: &str) -> Result<Vec<PantryIngredient>> {
        self.db.search_pantry(query)
    }

    /// Update a pantry row's quantity and unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_pantry_ingredient(&self, row: &PantryIngredient) -> Result<()> {
        self.db.update_pantry_ingredient(row)
    }

    /// Remove a pantry row.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove_pantry_ingredient(&self, id: &PantryIngredientId) -> Result<()> {
        self.db.delete_pantry_ingredient(id)
    }

    // ==================== Recipe books ====================

    /// Create a recipe book.
    ///
    /// # Errors
    ///
    /// Returns an error if insertion fails.
    pub fn add_book(&self, name: impl Into<String>) -> Result<RecipeBook> {
        let book = RecipeBook::new(name);
        self.db.insert_book(&book)?;
        Ok(book)
    }

    /// Get a book by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the book is not found.
    pub fn get_book(&self, id: &RecipeBookId) -> Result<RecipeBook> {
        self.db.get_book(id)
    }

    /// List all books, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_books(&self) -> Result<Vec<RecipeBook>> {
        self.db.list_books()
    }

    /// Rename a book.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn rename_book(&self, book: &RecipeBook) -> Result<()> {
        self.db.update_book(book)
    }

    /// Delete a book; its recipes survive.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_book(&self, id: &RecipeBookId) -> Result<()> {
        self.db.delete_book(id)
    }

    /// Add a recipe to a book (idempotent).
    ///
    /// # Errors
    ///
    /// Returns an error if either side does not exist.
    pub fn add_recipe_to_book(&self, book: &RecipeBookId, recipe: &RecipeId) -> Result<()> {
        self.db.get_book(book)?;
        self.db.get_recipe(recipe)?;
        self.db.link_book_recipe(book, recipe)
    }

    /// Remove a recipe from a book.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove_recipe_from_book(&self, book: &RecipeBookId, recipe: &RecipeId) -> Result<()> {
        self.db.unlink_book_recipe(book, recipe)
    }

    /// Recipes in a book, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn book_recipes(&self, book: &RecipeBookId) -> Result<Vec<Recipe>> {
        self.db.list_book_recipes(book)
    }

    // ==================== Derived views ====================

    /// All recipes (name-sorted) with their requirement rows.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    pub fn requirements(&self) -> Result<Vec<RecipeRequirements>> {
        let recipes = self.db.list_recipes()?;
        let mut entries = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            let required = self.db.list_recipe_ingredients(&recipe.id)?;
            entries.push(RecipeRequirements { recipe, required });
        }
        Ok(entries)
    }

    /// Recompute recipe availability from fresh snapshots.
    ///
    /// This is the explicit "recompute now" trigger: call it after any
    /// mutation to recipes, requirement rows or pantry stock.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    pub fn availability(&self) -> Result<Availability> {
        let entries = self.requirements()?;
        let pantry = self.db.list_pantry()?;
        Ok(compute_availability_with_limit(
            &entries,
            &pantry,
            self.settings.almost_missing_max,
        ))
    }

    // ==================== Utility ====================

    /// Get entity counts.
    ///
    /// # Errors
    ///
    /// Returns an error if querying fails.
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            ingredient_count: self.db.count_ingredients()?,
            recipe_count: self.db.count_recipes()?,
            pantry_count: self.db.count_pantry()?,
            book_count: self.db.count_books()?,
        })
    }

    /// Delete all data from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn erase_all(&self) -> Result<()> {
        info!("erasing all store data");
        self.db.erase_all()
    }
}
