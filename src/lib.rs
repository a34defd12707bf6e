// Clippy configuration for the larder crate
// Allow precision loss when computing progress fractions
#![allow(clippy::cast_precision_loss)]
// Allow from_str method name (not trait impl)
#![allow(clippy::should_implement_trait)]
// Allow missing docs for internal items
#![allow(clippy::missing_errors_doc)]
// Allow format string style choices
#![allow(clippy::uninlined_format_args)]

//! Larder: Recipe and Pantry Registry
//!
//! Larder is the domain core of a recipe-management application: a catalog
//! of ingredients, recipes with ordered steps and per-recipe requirements,
//! pantry stock, recipe books, and the derived availability views over
//! them — which recipes can be cooked right now, and which are only a few
//! ingredients short.
//!
//! # Quick Start
//!
//! ```no_run
//! use larder::prelude::*;
//!
//! // Open or create the store
//! let store = Store::open_default()?;
//!
//! // Build a catalog and a recipe
//! let flour = store.add_ingredient("Flour", "All-purpose wheat flour")?;
//! let eggs = store.add_ingredient("Eggs", "Fresh chicken eggs")?;
//!
//! let pancakes = Recipe::builder()
//!     .name("Pancakes")
//!     .servings(4)
//!     .difficulty(Difficulty::Easy)
//!     .build();
//! store.add_recipe(&pancakes)?;
//! store.add_recipe_ingredient(&pancakes.id, &flour.id, 200.0, UnitOfMeasure::Grams)?;
//! store.add_recipe_ingredient(&pancakes.id, &eggs.id, 2.0, UnitOfMeasure::Pieces)?;
//!
//! // Stock the pantry and see what is cookable
//! store.add_pantry_ingredient(&flour.id, 1000.0, UnitOfMeasure::Grams)?;
//! let availability = store.availability()?;
//! for entry in &availability.almost_available {
//!     println!("{} is missing {} ingredient(s)", entry.recipe.name, entry.missing.len());
//! }
//! # Ok::<(), larder::error::LarderError>(())
//! ```
//!
//! # Architecture
//!
//! Entities are plain immutable value types keyed by UUID newtypes;
//! relationships are ID references resolved through the [`store::Store`].
//! Derived views are pure functions over snapshots:
//!
//! - [`availability`] classifies recipes against pantry stock
//! - [`recipe`] provides sorted step/requirement projections and serving
//!   scaling
//! - [`cooking`] enforces strictly sequential step completion
//!
//! There is no reactive machinery: after mutating data, call
//! [`store::Store::availability`] (or the pure functions) again.
//!
//! # Storage
//!
//! Entity data lives in `SQLite` at `~/.larder/larder.db`; settings are
//! read from `~/.larder/config.toml` when present.

pub mod availability;
pub mod book;
pub mod cooking;
pub mod error;
pub mod ingredient;
pub mod pantry;
pub mod prelude;
pub mod recipe;
pub mod sample;
pub mod store;
pub mod unit;

pub use error::{LarderError, Result};
pub use store::{Settings, Store, StoreConfig, StoreStats};
