//! `SQLite` database for larder entities.

use crate::book::{RecipeBook, RecipeBookId};
use crate::error::{LarderError, Result};
use crate::ingredient::{Ingredient, IngredientId};
use crate::pantry::{PantryIngredient, PantryIngredientId};
use crate::recipe::{Recipe, RecipeId, RecipeIngredient, RecipeIngredientId, Step, StepId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

/// `SQLite` database holding all larder entities.
pub struct StoreDb {
    conn: Connection,
}

impl StoreDb {
    /// Open or create a database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (tests and throwaway stores).
    ///
    /// # Errors
    ///
    /// Returns an error if initialization fails.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<()> {
        // "order" is a keyword, hence the ord column on steps.
        self.conn.execute_batch(
            r"
            -- Ingredient catalog
            CREATE TABLE IF NOT EXISTS ingredients (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_ingredients_name ON ingredients(name);

            -- Recipes
            CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                time_in_minutes INTEGER NOT NULL DEFAULT 0,
                servings INTEGER NOT NULL DEFAULT 1,
                difficulty TEXT NOT NULL DEFAULT 'easy',
                image_data BLOB,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_recipes_name ON recipes(name);

            -- Requirement rows (recipe -> ingredient links)
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
                id TEXT PRIMARY KEY,
                recipe_id TEXT NOT NULL,
                ingredient_id TEXT,
                quantity REAL NOT NULL,
                unit TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe
                ON recipe_ingredients(recipe_id);
            CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_ingredient
                ON recipe_ingredients(ingredient_id);

            -- Steps
            CREATE TABLE IF NOT EXISTS steps (
                id TEXT PRIMARY KEY,
                recipe_id TEXT NOT NULL,
                instructions TEXT NOT NULL DEFAULT '',
                ord INTEGER NOT NULL DEFAULT 0,
                ingredient_ids_json TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_steps_recipe ON steps(recipe_id);

            -- Pantry stock
            CREATE TABLE IF NOT EXISTS pantry (
                id TEXT PRIMARY KEY,
                ingredient_id TEXT NOT NULL,
                quantity REAL NOT NULL,
                unit TEXT NOT NULL,
                date_added TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_pantry_ingredient ON pantry(ingredient_id);

            -- Recipe books
            CREATE TABLE IF NOT EXISTS books (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS book_recipes (
                book_id TEXT NOT NULL,
                recipe_id TEXT NOT NULL,
                UNIQUE(book_id, recipe_id)
            );
            ",
        )?;
        Ok(())
    }

    // ==================== Ingredients ====================

    /// Insert an ingredient.
    pub fn insert_ingredient(&self, ingredient: &Ingredient) -> Result<()> {
        self.conn.execute(
            r"INSERT INTO ingredients (id, name, description, created_at)
              VALUES (?1, ?2, ?3, ?4)",
            params![
                ingredient.id.to_string(),
                ingredient.name,
                ingredient.description,
                ingredient.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get an ingredient by ID.
    pub fn get_ingredient(&self, id: &IngredientId) -> Result<Ingredient> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, description, created_at FROM ingredients WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => LarderError::not_found("ingredient", id),
                e => LarderError::Database(e),
            })?;

        ingredient_from_row(row)
    }

    /// List all ingredients, sorted by name.
    pub fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, created_at FROM ingredients ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut ingredients = Vec::new();
        for row in rows {
            ingredients.push(ingredient_from_row(row?)?);
        }
        Ok(ingredients)
    }

    /// Update an ingredient's name and description.
    pub fn update_ingredient(&self, ingredient: &Ingredient) -> Result<()> {
        self.conn.execute(
            "UPDATE ingredients SET name = ?1, description = ?2 WHERE id = ?3",
            params![
                ingredient.name,
                ingredient.description,
                ingredient.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Delete an ingredient and any pantry rows referencing it.
    ///
    /// Callers are expected to have checked recipe references first.
    pub fn delete_ingredient(&self, id: &IngredientId) -> Result<()> {
        self.conn.execute(
            "DELETE FROM pantry WHERE ingredient_id = ?1",
            params![id.to_string()],
        )?;
        self.conn.execute(
            "DELETE FROM ingredients WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }

    /// Count requirement rows referencing an ingredient.
    pub fn count_recipe_references(&self, id: &IngredientId) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM recipe_ingredients WHERE ingredient_id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Recipes whose requirements reference an ingredient, sorted by name.
    pub fn recipes_using(&self, id: &IngredientId) -> Result<Vec<Recipe>> {
        let mut stmt = self.conn.prepare(
            r"SELECT DISTINCT r.id, r.name, r.description, r.time_in_minutes, r.servings,
                     r.difficulty, r.image_data, r.created_at, r.updated_at
              FROM recipes r
              JOIN recipe_ingredients ri ON ri.recipe_id = r.id
              WHERE ri.ingredient_id = ?1
              ORDER BY r.name",
        )?;
        let rows = stmt.query_map(params![id.to_string()], recipe_columns)?;

        let mut recipes = Vec::new();
        for row in rows {
            recipes.push(recipe_from_row(row?)?);
        }
        Ok(recipes)
    }

    /// Count ingredients.
    pub fn count_ingredients(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ingredients", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    // ==================== Recipes ====================

    /// Insert a recipe.
    pub fn insert_recipe(&self, recipe: &Recipe) -> Result<()> {
        self.conn.execute(
            r"INSERT INTO recipes (id, name, description, time_in_minutes, servings,
                                   difficulty, image_data, created_at, updated_at)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                recipe.id.to_string(),
                recipe.name,
                recipe.description,
                recipe.time_in_minutes,
                recipe.servings,
                recipe.difficulty.to_string(),
                recipe.image_data,
                recipe.created_at.to_rfc3339(),
                recipe.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a recipe by ID.
    pub fn get_recipe(&self, id: &RecipeId) -> Result<Recipe> {
        let row = self
            .conn
            .query_row(
                r"SELECT id, name, description, time_in_minutes, servings, difficulty,
                         image_data, created_at, updated_at
                  FROM recipes WHERE id = ?1",
                params![id.to_string()],
                recipe_columns,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => LarderError::not_found("recipe", id),
                e => LarderError::Database(e),
            })?;

        recipe_from_row(row)
    }

    /// List all recipes, sorted by name.
    pub fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let mut stmt = self.conn.prepare(
            r"SELECT id, name, description, time_in_minutes, servings, difficulty,
                     image_data, created_at, updated_at
              FROM recipes ORDER BY name",
        )?;
        let rows = stmt.query_map([], recipe_columns)?;

        let mut recipes = Vec::new();
        for row in rows {
            recipes.push(recipe_from_row(row?)?);
        }
        Ok(recipes)
    }

    /// Recipes whose name contains `query`, case-insensitively, by name.
    pub fn search_recipes(&self, query: &str) -> Result<Vec<Recipe>> {
        let mut stmt = self.conn.prepare(
            r"SELECT id, name, description, time_in_minutes, servings, difficulty,
                     image_data, created_at, updated_at
              FROM recipes
              WHERE instr(lower(name), lower(?1)) > 0
              ORDER BY name",
        )?;
        let rows = stmt.query_map(params![query], recipe_columns)?;

        let mut recipes = Vec::new();
        for row in rows {
            recipes.push(recipe_from_row(row?)?);
        }
        Ok(recipes)
    }

    /// Update a recipe in place, stamping `updated_at`.
    pub fn update_recipe(&self, recipe: &Recipe) -> Result<()> {
        self.conn.execute(
            r"UPDATE recipes SET name = ?1, description = ?2, time_in_minutes = ?3,
                                 servings = ?4, difficulty = ?5, image_data = ?6,
                                 updated_at = ?7
              WHERE id = ?8",
            params![
                recipe.name,
                recipe.description,
                recipe.time_in_minutes,
                recipe.servings,
                recipe.difficulty.to_string(),
                recipe.image_data,
                Utc::now().to_rfc3339(),
                recipe.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Delete a recipe, cascading to its owned steps, requirement rows and
    /// book membership. Shared ingredients are untouched.
    pub fn delete_recipe(&self, id: &RecipeId) -> Result<()> {
        let id = id.to_string();
        self.conn
            .execute("DELETE FROM steps WHERE recipe_id = ?1", params![id])?;
        self.conn.execute(
            "DELETE FROM recipe_ingredients WHERE recipe_id = ?1",
            params![id],
        )?;
        self.conn
            .execute("DELETE FROM book_recipes WHERE recipe_id = ?1", params![id])?;
        self.conn
            .execute("DELETE FROM recipes WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Count recipes.
    pub fn count_recipes(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    // ==================== Requirement rows ====================

    /// Insert a requirement row.
    pub fn insert_recipe_ingredient(&self, link: &RecipeIngredient) -> Result<()> {
        self.conn.execute(
            r"INSERT INTO recipe_ingredients (id, recipe_id, ingredient_id, quantity, unit)
              VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                link.id.to_string(),
                link.recipe.to_string(),
                link.ingredient.as_ref().map(ToString::to_string),
                link.quantity,
                link.unit.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Get a requirement row by ID.
    pub fn get_recipe_ingredient(&self, id: &RecipeIngredientId) -> Result<RecipeIngredient> {
        let row = self
            .conn
            .query_row(
                r"SELECT id, recipe_id, ingredient_id, quantity, unit
                  FROM recipe_ingredients WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, f64>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    LarderError::not_found("recipe ingredient", id)
                }
                e => LarderError::Database(e),
            })?;

        recipe_ingredient_from_row(row)
    }

    /// Requirement rows of a recipe, sorted ascending by the referenced
    /// ingredient's name (rows without one sort first).
    pub fn list_recipe_ingredients(&self, recipe: &RecipeId) -> Result<Vec<RecipeIngredient>> {
        let mut stmt = self.conn.prepare(
            r"SELECT ri.id, ri.recipe_id, ri.ingredient_id, ri.quantity, ri.unit
              FROM recipe_ingredients ri
              LEFT JOIN ingredients i ON i.id = ri.ingredient_id
              WHERE ri.recipe_id = ?1
              ORDER BY COALESCE(i.name, '')",
        )?;
        let rows = stmt.query_map(params![recipe.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut links = Vec::new();
        for row in rows {
            links.push(recipe_ingredient_from_row(row?)?);
        }
        Ok(links)
    }

    /// Update a requirement row's quantity and unit.
    pub fn update_recipe_ingredient(&self, link: &RecipeIngredient) -> Result<()> {
        self.conn.execute(
            "UPDATE recipe_ingredients SET quantity = ?1, unit = ?2 WHERE id = ?3",
            params![link.quantity, link.unit.to_string(), link.id.to_string()],
        )?;
        Ok(())
    }

    /// Delete a requirement row.
    pub fn delete_recipe_ingredient(&self, id: &RecipeIngredientId) -> Result<()> {
        self.conn.execute(
            "DELETE FROM recipe_ingredients WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }

    /// Drop a requirement row from every step ingredient list it occurs in.
    pub fn remove_ingredient_from_steps(&self, id: &RecipeIngredientId) -> Result<()> {
        let needle = id.to_string();
        let mut stmt = self.conn.prepare(
            "SELECT id, ingredient_ids_json FROM steps
             WHERE instr(ingredient_ids_json, ?1) > 0",
        )?;
        let rows = stmt.query_map(params![needle], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut updates = Vec::new();
        for row in rows {
            let (step_id, json) = row?;
            let ids: Vec<RecipeIngredientId> = serde_json::from_str(&json)?;
            let kept: Vec<RecipeIngredientId> =
                ids.into_iter().filter(|linked| linked != id).collect();
            updates.push((step_id, serde_json::to_string(&kept)?));
        }

        for (step_id, json) in updates {
            self.conn.execute(
                "UPDATE steps SET ingredient_ids_json = ?1 WHERE id = ?2",
                params![json, step_id],
            )?;
        }
        Ok(())
    }

    // ==================== Steps ====================

    /// Insert a step.
    pub fn insert_step(&self, step: &Step) -> Result<()> {
        let ingredient_ids_json = serde_json::to_string(&step.ingredients)?;
        self.conn.execute(
            r"INSERT INTO steps (id, recipe_id, instructions, ord, ingredient_ids_json, created_at)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                step.id.to_string(),
                step.recipe.to_string(),
                step.instructions,
                step.order,
                ingredient_ids_json,
                step.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a step by ID.
    pub fn get_step(&self, id: &StepId) -> Result<Step> {
        let row = self
            .conn
            .query_row(
                r"SELECT id, recipe_id, instructions, ord, ingredient_ids_json, created_at
                  FROM steps WHERE id = ?1",
                params![id.to_string()],
                step_columns,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => LarderError::not_found("step", id),
                e => LarderError::Database(e),
            })?;

        step_from_row(row)
    }

    /// Steps of a recipe in deterministic order `(ord, created_at)`.
    pub fn list_steps(&self, recipe: &RecipeId) -> Result<Vec<Step>> {
        let mut stmt = self.conn.prepare(
            r"SELECT id, recipe_id, instructions, ord, ingredient_ids_json, created_at
              FROM steps WHERE recipe_id = ?1
              ORDER BY ord, created_at",
        )?;
        let rows = stmt.query_map(params![recipe.to_string()], step_columns)?;

        let mut steps = Vec::new();
        for row in rows {
            steps.push(step_from_row(row?)?);
        }
        Ok(steps)
    }

    /// Update a step's instructions, order and ingredient list.
    pub fn update_step(&self, step: &Step) -> Result<()> {
        let ingredient_ids_json = serde_json::to_string(&step.ingredients)?;
        self.conn.execute(
            r"UPDATE steps SET instructions = ?1, ord = ?2, ingredient_ids_json = ?3
              WHERE id = ?4",
            params![
                step.instructions,
                step.order,
                ingredient_ids_json,
                step.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Delete a step.
    pub fn delete_step(&self, id: &StepId) -> Result<()> {
        self.conn
            .execute("DELETE FROM steps WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }

    // ==================== Pantry ====================

    /// Insert a pantry row.
    pub fn insert_pantry_ingredient(&self, row: &PantryIngredient) -> Result<()> {
        self.conn.execute(
            r"INSERT INTO pantry (id, ingredient_id, quantity, unit, date_added)
              VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                row.id.to_string(),
                row.ingredient.to_string(),
                row.quantity,
                row.unit.to_string(),
                row.date_added.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a pantry row by ID.
    pub fn get_pantry_ingredient(&self, id: &PantryIngredientId) -> Result<PantryIngredient> {
        let row = self
            .conn
            .query_row(
                r"SELECT id, ingredient_id, quantity, unit, date_added
                  FROM pantry WHERE id = ?1",
                params![id.to_string()],
                pantry_columns,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    LarderError::not_found("pantry ingredient", id)
                }
                e => LarderError::Database(e),
            })?;

        pantry_from_row(row)
    }

    /// All pantry rows, newest first.
    pub fn list_pantry(&self) -> Result<Vec<PantryIngredient>> {
        let mut stmt = self.conn.prepare(
            r"SELECT id, ingredient_id, quantity, unit, date_added
              FROM pantry ORDER BY date_added DESC",
        )?;
        let rows = stmt.query_map([], pantry_columns)?;

        let mut pantry = Vec::new();
        for row in rows {
            pantry.push(pantry_from_row(row?)?);
        }
        Ok(pantry)
    }

    /// Pantry rows whose ingredient name contains `query`, newest first.
    pub fn search_pantry(&self, query: &str) -> Result<Vec<PantryIngredient>> {
        let mut stmt = self.conn.prepare(
            r"SELECT p.id, p.ingredient_id, p.quantity, p.unit, p.date_added
              FROM pantry p
              JOIN ingredients i ON i.id = p.ingredient_id
              WHERE instr(lower(i.name), lower(?1)) > 0
              ORDER BY p.date_added DESC",
        )?;
        let rows = stmt.query_map(params![query], pantry_columns)?;

        let mut pantry = Vec::new();
        for row in rows {
            pantry.push(pantry_from_row(row?)?);
        }
        Ok(pantry)
    }

    /// Update a pantry row's quantity and unit.
    pub fn update_pantry_ingredient(&self, row: &PantryIngredient) -> Result<()> {
        self.conn.execute(
            "UPDATE pantry SET quantity = ?1, unit = ?2 WHERE id = ?3",
            params![row.quantity, row.unit.to_string(), row.id.to_string()],
        )?;
        Ok(())
    }

    /// Delete a pantry row.
    pub fn delete_pantry_ingredient(&self, id: &PantryIngredientId) -> Result<()> {
        self.conn
            .execute("DELETE FROM pantry WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }

    /// Count pantry rows.
    pub fn count_pantry(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pantry", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    // ==================== Recipe books ====================

    /// Insert a book.
    pub fn insert_book(&self, book: &RecipeBook) -> Result<()> {
        self.conn.execute(
            "INSERT INTO books (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![
                book.id.to_string(),
                book.name,
                book.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a book by ID.
    pub fn get_book(&self, id: &RecipeBookId) -> Result<RecipeBook> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM books WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => LarderError::not_found("book", id),
                e => LarderError::Database(e),
            })?;

        book_from_row(row)
    }

    /// List all books, sorted by name.
    pub fn list_books(&self) -> Result<Vec<RecipeBook>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM books ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut books = Vec::new();
        for row in rows {
            books.push(book_from_row(row?)?);
        }
        Ok(books)
    }

    /// Rename a book.
    pub fn update_book(&self, book: &RecipeBook) -> Result<()> {
        self.conn.execute(
            "UPDATE books SET name = ?1 WHERE id = ?2",
            params![book.name, book.id.to_string()],
        )?;
        Ok(())
    }

    /// Delete a book and its membership links (recipes survive).
    pub fn delete_book(&self, id: &RecipeBookId) -> Result<()> {
        self.conn.execute(
            "DELETE FROM book_recipes WHERE book_id = ?1",
            params![id.to_string()],
        )?;
        self.conn
            .execute("DELETE FROM books WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }

    /// Add a recipe to a book (idempotent).
    pub fn link_book_recipe(&self, book: &RecipeBookId, recipe: &RecipeId) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO book_recipes (book_id, recipe_id) VALUES (?1, ?2)",
            params![book.to_string(), recipe.to_string()],
        )?;
        Ok(())
    }

    /// Remove a recipe from a book.
    pub fn unlink_book_recipe(&self, book: &RecipeBookId, recipe: &RecipeId) -> Result<()> {
        self.conn.execute(
            "DELETE FROM book_recipes WHERE book_id = ?1 AND recipe_id = ?2",
            params![book.to_string(), recipe.to_string()],
        )?;
        Ok(())
    }

    /// Recipes in a book, sorted by name.
    pub fn list_book_recipes(&self, book: &RecipeBookId) -> Result<Vec<Recipe>> {
        let mut stmt = self.conn.prepare(
            r"SELECT r.id, r.name, r.description, r.time_in_minutes, r.servings,
                     r.difficulty, r.image_data, r.created_at, r.updated_at
              FROM recipes r
              JOIN book_recipes br ON br.recipe_id = r.id
              WHERE br.book_id = ?1
              ORDER BY r.name",
        )?;
        let rows = stmt.query_map(params![book.to_string()], recipe_columns)?;

        let mut recipes = Vec::new();
        for row in rows {
            recipes.push(recipe_from_row(row?)?);
        }
        Ok(recipes)
    }

    /// Count books.
    pub fn count_books(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    // ==================== Maintenance ====================

    /// Delete every row from every table.
    pub fn erase_all(&self) -> Result<()> {
        self.conn.execute_batch(
            r"
            DELETE FROM book_recipes;
            DELETE FROM books;
            DELETE FROM pantry;
            DELETE FROM steps;
            DELETE FROM recipe_ingredients;
            DELETE FROM recipes;
            DELETE FROM ingredients;
            ",
        )?;
        Ok(())
    }
}

// ==================== Row conversions ====================

type IngredientRow = (String, String, String, String);
type RecipeRow = (
    String,
    String,
    String,
    i64,
    i64,
    String,
    Option<Vec<u8>>,
    String,
    String,
);
type RecipeIngredientRow = (String, String, Option<String>, f64, String);
type StepRow = (String, String, String, i64, String, String);
type PantryRow = (String, String, f64, String, String);
type BookRow = (String, String, String);

fn recipe_columns(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecipeRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
    ))
}

fn step_columns(row: &rusqlite::Row<'_>) -> rusqlite::Result<StepRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn pantry_columns(row: &rusqlite::Row<'_>) -> rusqlite::Result<PantryRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn ingredient_from_row(row: IngredientRow) -> Result<Ingredient> {
    let (id, name, description, created_at) = row;
    Ok(Ingredient {
        id: parse_id(&id, "ingredient id")?,
        name,
        description,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn recipe_from_row(row: RecipeRow) -> Result<Recipe> {
    let (
        id,
        name,
        description,
        time_in_minutes,
        servings,
        difficulty,
        image_data,
        created_at,
        updated_at,
    ) = row;
    Ok(Recipe {
        id: parse_id(&id, "recipe id")?,
        name,
        description,
        time_in_minutes: u32::try_from(time_in_minutes).unwrap_or(0),
        servings: i32::try_from(servings).unwrap_or(1),
        difficulty: difficulty.parse()?,
        image_data,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn recipe_ingredient_from_row(row: RecipeIngredientRow) -> Result<RecipeIngredient> {
    let (id, recipe, ingredient, quantity, unit) = row;
    let ingredient = match ingredient {
        Some(raw) => Some(parse_id(&raw, "ingredient id")?),
        None => None,
    };
    Ok(RecipeIngredient {
        id: parse_id(&id, "recipe ingredient id")?,
        recipe: parse_id(&recipe, "recipe id")?,
        ingredient,
        quantity,
        unit: unit.parse()?,
    })
}

fn step_from_row(row: StepRow) -> Result<Step> {
    let (id, recipe, instructions, order, ingredient_ids_json, created_at) = row;
    Ok(Step {
        id: parse_id(&id, "step id")?,
        recipe: parse_id(&recipe, "recipe id")?,
        instructions,
        order: i32::try_from(order).unwrap_or(0),
        ingredients: serde_json::from_str(&ingredient_ids_json)?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn pantry_from_row(row: PantryRow) -> Result<PantryIngredient> {
    let (id, ingredient, quantity, unit, date_added) = row;
    Ok(PantryIngredient {
        id: parse_id(&id, "pantry id")?,
        ingredient: parse_id(&ingredient, "ingredient id")?,
        quantity,
        unit: unit.parse()?,
        date_added: parse_timestamp(&date_added)?,
    })
}

fn book_from_row(row: BookRow) -> Result<RecipeBook> {
    let (id, name, created_at) = row;
    Ok(RecipeBook {
        id: parse_id(&id, "book id")?,
        name,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn parse_id<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| LarderError::Validation(format!("invalid {what}: {raw}")))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| LarderError::Validation(format!("invalid timestamp: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Difficulty;
    use crate::unit::UnitOfMeasure;

    fn setup() -> StoreDb {
        StoreDb::open_in_memory().unwrap()
    }

    #[test]
    fn test_db_open_on_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let _db = StoreDb::open(dir.path().join("test.db")).unwrap();
    }

    #[test]
    fn test_ingredient_crud() {
        let db = setup();

        let ingredient = Ingredient::new("Flour", "All-purpose");
        db.insert_ingredient(&ingredient).unwrap();

        let retrieved = db.get_ingredient(&ingredient.id).unwrap();
        assert_eq!(retrieved.name, "Flour");
        assert_eq!(retrieved.description, "All-purpose");

        let mut renamed = retrieved;
        renamed.name = "Bread Flour".to_string();
        db.update_ingredient(&renamed).unwrap();
        assert_eq!(db.get_ingredient(&renamed.id).unwrap().name, "Bread Flour");

        db.delete_ingredient(&renamed.id).unwrap();
        assert!(matches!(
            db.get_ingredient(&renamed.id),
            Err(LarderError::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_ingredients_sorted_by_name() {
        let db = setup();
        for name in ["Sugar", "Butter", "Flour"] {
            db.insert_ingredient(&Ingredient::new(name, "")).unwrap();
        }

        let names: Vec<String> = db
            .list_ingredients()
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Butter", "Flour", "Sugar"]);
    }

    #[test]
    fn test_recipe_crud_roundtrip() {
        let db = setup();

        let recipe = Recipe::builder()
            .name("Pizza")
            .description("Crispy crust")
            .time_in_minutes(60)
            .servings(4)
            .difficulty(Difficulty::Medium)
            .image_data(vec![0xff, 0xd8])
            .build();
        db.insert_recipe(&recipe).unwrap();

        let retrieved = db.get_recipe(&recipe.id).unwrap();
        assert_eq!(retrieved.name, "Pizza");
        assert_eq!(retrieved.servings, 4);
        assert_eq!(retrieved.difficulty, Difficulty::Medium);
        assert_eq!(retrieved.image_data, Some(vec![0xff, 0xd8]));
    }

    #[test]
    fn test_recipe_delete_cascades() {
        let db = setup();

        let flour = Ingredient::new("Flour", "");
        db.insert_ingredient(&flour).unwrap();

        let recipe = Recipe::builder().name("Bread").servings(2).build();
        db.insert_recipe(&recipe).unwrap();

        let link =
            RecipeIngredient::new(recipe.id.clone(), flour.id.clone(), 500.0, UnitOfMeasure::Grams);
        db.insert_recipe_ingredient(&link).unwrap();
        db.insert_step(&Step::new(recipe.id.clone(), "Knead", 0))
            .unwrap();

        let book = RecipeBook::new("Bakes");
        db.insert_book(&book).unwrap();
        db.link_book_recipe(&book.id, &recipe.id).unwrap();

        db.delete_recipe(&recipe.id).unwrap();

        assert!(db.list_recipe_ingredients(&recipe.id).unwrap().is_empty());
        assert!(db.list_steps(&recipe.id).unwrap().is_empty());
        assert!(db.list_book_recipes(&book.id).unwrap().is_empty());
        // The shared ingredient survives.
        assert!(db.get_ingredient(&flour.id).is_ok());
    }

    #[test]
    fn test_recipe_ingredients_sorted_by_ingredient_name() {
        let db = setup();

        let sugar = Ingredient::new("Sugar", "");
        let butter = Ingredient::new("Butter", "");
        db.insert_ingredient(&sugar).unwrap();
        db.insert_ingredient(&butter).unwrap();

        let recipe = Recipe::builder().name("Cookies").build();
        db.insert_recipe(&recipe).unwrap();

        db.insert_recipe_ingredient(&RecipeIngredient::new(
            recipe.id.clone(),
            sugar.id.clone(),
            200.0,
            UnitOfMeasure::Grams,
        ))
        .unwrap();
        db.insert_recipe_ingredient(&RecipeIngredient::new(
            recipe.id.clone(),
            butter.id.clone(),
            100.0,
            UnitOfMeasure::Grams,
        ))
        .unwrap();

        let mut dangling = RecipeIngredient::new(
            recipe.id.clone(),
            IngredientId::new(),
            1.0,
            UnitOfMeasure::Pieces,
        );
        dangling.ingredient = None;
        db.insert_recipe_ingredient(&dangling).unwrap();

        let links = db.list_recipe_ingredients(&recipe.id).unwrap();
        // Dangling row first (empty name), then Butter, then Sugar.
        assert_eq!(links[0].id, dangling.id);
        assert_eq!(links[1].ingredient, Some(butter.id));
        assert_eq!(links[2].ingredient, Some(sugar.id));
    }

    #[test]
    fn test_step_ingredient_ids_roundtrip() {
        let db = setup();

        let recipe = Recipe::builder().name("Stew").build();
        db.insert_recipe(&recipe).unwrap();

        let link = RecipeIngredient::new(
            recipe.id.clone(),
            IngredientId::new(),
            1.0,
            UnitOfMeasure::Pieces,
        );
        db.insert_recipe_ingredient(&link).unwrap();

        let mut step = Step::new(recipe.id.clone(), "Brown the meat", 0);
        step.ingredients = vec![link.id.clone()];
        db.insert_step(&step).unwrap();

        let retrieved = db.get_step(&step.id).unwrap();
        assert_eq!(retrieved.ingredients, vec![link.id.clone()]);

        db.remove_ingredient_from_steps(&link.id).unwrap();
        assert!(db.get_step(&step.id).unwrap().ingredients.is_empty());
    }

    #[test]
    fn test_steps_ordered_deterministically() {
        let db = setup();
        let recipe = Recipe::builder().name("Soup").build();
        db.insert_recipe(&recipe).unwrap();

        for order in [2, 0, 1] {
            db.insert_step(&Step::new(recipe.id.clone(), format!("step {order}"), order))
                .unwrap();
        }

        let orders: Vec<i32> = db
            .list_steps(&recipe.id)
            .unwrap()
            .iter()
            .map(|s| s.order)
            .collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_pantry_crud_and_ordering() {
        let db = setup();
        let milk = Ingredient::new("Milk", "");
        db.insert_ingredient(&milk).unwrap();

        let mut older = PantryIngredient::new(milk.id.clone(), 1.0, UnitOfMeasure::Liters);
        older.date_added = older.date_added - chrono::Duration::days(2);
        let newer = PantryIngredient::new(milk.id.clone(), 2.0, UnitOfMeasure::Liters);
        db.insert_pantry_ingredient(&older).unwrap();
        db.insert_pantry_ingredient(&newer).unwrap();

        let rows = db.list_pantry().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, newer.id);
        assert_eq!(rows[1].id, older.id);

        db.delete_pantry_ingredient(&older.id).unwrap();
        assert_eq!(db.count_pantry().unwrap(), 1);
    }

    #[test]
    fn test_search_recipes_case_insensitive() {
        let db = setup();
        for name in ["Chocolate Cake", "Pancakes", "Beef Stew"] {
            db.insert_recipe(&Recipe::builder().name(name).build())
                .unwrap();
        }

        let hits = db.search_recipes("cake").unwrap();
        let names: Vec<String> = hits.into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Chocolate Cake", "Pancakes"]);
    }

    #[test]
    fn test_search_pantry_by_ingredient_name() {
        let db = setup();
        let flour = Ingredient::new("Wheat Flour", "");
        let milk = Ingredient::new("Milk", "");
        db.insert_ingredient(&flour).unwrap();
        db.insert_ingredient(&milk).unwrap();

        db.insert_pantry_ingredient(&PantryIngredient::new(
            flour.id.clone(),
            500.0,
            UnitOfMeasure::Grams,
        ))
        .unwrap();
        db.insert_pantry_ingredient(&PantryIngredient::new(
            milk.id.clone(),
            1.0,
            UnitOfMeasure::Liters,
        ))
        .unwrap();

        let hits = db.search_pantry("flour").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].ingredient, flour.id);
    }

    #[test]
    fn test_book_membership() {
        let db = setup();
        let recipe = Recipe::builder().name("Tart").build();
        db.insert_recipe(&recipe).unwrap();

        let book = RecipeBook::new("Desserts");
        db.insert_book(&book).unwrap();
        db.link_book_recipe(&book.id, &recipe.id).unwrap();
        // Linking twice is idempotent.
        db.link_book_recipe(&book.id, &recipe.id).unwrap();

        let recipes = db.list_book_recipes(&book.id).unwrap();
        assert_eq!(recipes.len(), 1);

        db.delete_book(&book.id).unwrap();
        // The recipe itself survives book deletion.
        assert!(db.get_recipe(&recipe.id).is_ok());
    }

    #[test]
    fn test_erase_all() {
        let db = setup();
        db.insert_ingredient(&Ingredient::new("Salt", "")).unwrap();
        db.insert_recipe(&Recipe::builder().name("Eggs").build())
            .unwrap();

        db.erase_all().unwrap();
        assert_eq!(db.count_ingredients().unwrap(), 0);
        assert_eq!(db.count_recipes().unwrap(), 0);
    }
}
