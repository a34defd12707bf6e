//! Recipe steps and their deterministic ordering.

use crate::recipe::{RecipeId, RecipeIngredientId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a recipe step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepId(Uuid);

impl StepId {
    /// Create a new random step ID.
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

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for StepId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A single instruction step of a recipe.
///
/// `order` is the stable sort key; it need not be contiguous. Ties are
/// broken by `created_at`, so the step sequence is always deterministic.
/// `ingredients` lists the requirement rows of the owning recipe that this
/// step uses; the store rejects links to another recipe's rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Unique identifier.
    pub id: StepId,
    /// Owning recipe.
    pub recipe: RecipeId,
    /// Free-text instructions.
    pub instructions: String,
    /// Position in the step sequence (zero-based).
    pub order: i32,
    /// Requirement rows used in this step.
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredientId>,
    /// Creation timestamp (tie-breaker for equal orders).
    pub created_at: DateTime<Utc>,
}

impl Step {
    /// Create a new step for a recipe.
    #[must_use]
    pub fn new(recipe: RecipeId, instructions: impl Into<String>, order: i32) -> Self {
        Self {
            id: StepId::new(),
            recipe,
            instructions: instructions.into(),
            order,
            ingredients: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Sort steps by `(order ascending, created_at ascending)`.
#[must_use]
pub fn sorted_steps(steps: &[Step]) -> Vec<Step> {
    let mut sorted = steps.to_vec();
    sorted.sort_by_key(|step| (step.order, step.created_at));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn step_at(order: i32, created_at: DateTime<Utc>) -> Step {
        let mut step = Step::new(RecipeId::new(), format!("step {order}"), order);
        step.created_at = created_at;
        step
    }

    #[test]
    fn test_step_id_roundtrip() {
        let id = StepId::new();
        let parsed: StepId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_sorted_steps_by_order() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let steps = vec![step_at(2, t), step_at(0, t), step_at(1, t)];

        let sorted = sorted_steps(&steps);
        let orders: Vec<i32> = sorted.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_sorted_steps_tie_broken_by_created_at() {
        let earlier = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 0).unwrap();

        let second = step_at(1, later);
        let first = step_at(1, earlier);
        let steps = vec![second.clone(), first.clone()];

        let sorted = sorted_steps(&steps);
        assert_eq!(sorted[0].id, first.id);
        assert_eq!(sorted[1].id, second.id);
    }

    #[test]
    fn test_sorted_steps_noncontiguous_orders() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let steps = vec![step_at(10, t), step_at(3, t), step_at(7, t)];

        let sorted = sorted_steps(&steps);
        let orders: Vec<i32> = sorted.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![3, 7, 10]);
    }
}
