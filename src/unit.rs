//! Units of measure for ingredient quantities.

use crate::error::{LarderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit of measure for a recipe requirement or pantry row.
///
/// Availability matching compares units by exact equality; no conversion
/// between units is performed (200 g never satisfies a 0.2 kg requirement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnitOfMeasure {
    /// Grams.
    #[default]
    #[serde(rename = "g")]
    Grams,
    /// Kilograms.
    #[serde(rename = "kg")]
    Kilograms,
    /// Milliliters.
    #[serde(rename = "ml")]
    Milliliters,
    /// Liters.
    #[serde(rename = "L")]
    Liters,
    /// Pieces (countable items).
    #[serde(rename = "pcs")]
    Pieces,
    /// Tablespoons.
    #[serde(rename = "tbsp")]
    Tablespoons,
    /// Teaspoons.
    #[serde(rename = "tsp")]
    Teaspoons,
    /// Cups.
    #[serde(rename = "cups")]
    Cups,
}

impl UnitOfMeasure {
    /// Get all supported units.
    #[must_use]
    pub fn all() -> &'static [UnitOfMeasure] {
        &[
            UnitOfMeasure::Grams,
            UnitOfMeasure::Kilograms,
            UnitOfMeasure::Milliliters,
            UnitOfMeasure::Liters,
            UnitOfMeasure::Pieces,
            UnitOfMeasure::Tablespoons,
            UnitOfMeasure::Teaspoons,
            UnitOfMeasure::Cups,
        ]
    }

    /// Short form used for storage and display next to quantities.
    #[must_use]
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Grams => "g",
            Self::Kilograms => "kg",
            Self::Milliliters => "ml",
            Self::Liters => "L",
            Self::Pieces => "pcs",
            Self::Tablespoons => "tbsp",
            Self::Teaspoons => "tsp",
            Self::Cups => "cups",
        }
    }

    /// Long form for pickers and labels.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Grams => "Grams",
            Self::Kilograms => "Kilograms",
            Self::Milliliters => "Milliliters",
            Self::Liters => "Liters",
            Self::Pieces => "Pieces",
            Self::Tablespoons => "Tablespoons",
            Self::Teaspoons => "Teaspoons",
            Self::Cups => "Cups",
        }
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for UnitOfMeasure {
    type Err = LarderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "g" | "gram" | "grams" => Ok(Self::Grams),
            "kg" | "kilogram" | "kilograms" => Ok(Self::Kilograms),
            "ml" | "milliliter" | "milliliters" => Ok(Self::Milliliters),
            "l" | "liter" | "liters" => Ok(Self::Liters),
            "pc" | "pcs" | "piece" | "pieces" => Ok(Self::Pieces),
            "tbsp" | "tablespoon" | "tablespoons" => Ok(Self::Tablespoons),
            "tsp" | "teaspoon" | "teaspoons" => Ok(Self::Teaspoons),
            "cup" | "cups" => Ok(Self::Cups),
            _ => Err(LarderError::Validation(format!("unknown unit: {s}"))),
        }
    }
}
