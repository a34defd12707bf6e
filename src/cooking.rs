//! Guided-cooking step progression.
//!
//! Steps complete strictly in sequence: a step may be marked done only when
//! it is the first step or its predecessor is done, and may be unmarked
//! only while no later step is done. [`CookingSession`] tracks one
//! cook-through of a recipe's sorted step list under those rules.

use crate::recipe::{sorted_steps, Step};
use std::collections::BTreeSet;

/// Whether the step at `order` may be marked complete.
///
/// True when it is the first step (`order == 0`) or the immediately
/// preceding order is already complete.
#[must_use]
pub fn can_complete(order: i32, completed: &BTreeSet<i32>) -> bool {
    order == 0 || completed.contains(&(order - 1))
}

/// Whether the step at `order` may be unmarked.
///
/// True while no step with a greater order is complete.
#[must_use]
pub fn can_uncomplete(order: i32, completed: &BTreeSet<i32>) -> bool {
    completed.iter().all(|&done| done <= order)
}

/// One cook-through of a recipe's steps.
#[derive(Debug, Clone)]
pub struct CookingSession {
    steps: Vec<Step>,
    completed: BTreeSet<i32>,
}

impl CookingSession {
    /// Start a session over the given steps (sorted deterministically).
    #[must_use]
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: sorted_steps(&steps),
            completed: BTreeSet::new(),
        }
    }

    /// The steps in cooking order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Orders currently marked complete.
    #[must_use]
    pub fn completed(&self) -> &BTreeSet<i32> {
        &self.completed
    }

    /// Whether the step at `order` is marked complete.
    #[must_use]
    pub fn is_completed(&self, order: i32) -> bool {
        self.completed.contains(&order)
    }

    /// Toggle completion of the step at `order`.
    ///
    /// Denied transitions (completing out of sequence, unmarking beneath a
    /// completed later step, unknown order) are ignored. Returns whether
    /// the state changed.
    pub fn toggle(&mut self, order: i32) -> bool {
        if !self.steps.iter().any(|step| step.order == order) {
            return false;
        }

        if self.completed.contains(&order) {
            if can_uncomplete(order, &self.completed) {
                self.completed.remove(&order);
                return true;
            }
        } else if can_complete(order, &self.completed) {
            self.completed.insert(order);
            return true;
        }
        false
    }

    /// The first step not yet completed, in cooking order.
    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.steps
            .iter()
            .find(|step| !self.completed.contains(&step.order))
    }

    /// Fraction of steps completed, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.completed.len() as f64 / self.steps.len() as f64
    }

    /// Whether every step is complete.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.completed.len() == self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::RecipeId;

    fn set(orders: &[i32]) -> BTreeSet<i32> {
        orders.iter().copied().collect()
    }

    fn steps(orders: &[i32]) -> Vec<Step> {
        let recipe = RecipeId::new();
        orders
            .iter()
            .map(|&order| Step::new(recipe.clone(), format!("step {order}"), order))
            .collect()
    }

    #[test]
    fn test_can_complete_first_step() {
        assert!(can_complete(0, &set(&[])));
    }

    #[test]
    fn test_can_complete_requires_predecessor() {
        assert!(!can_complete(2, &set(&[0])));
        assert!(can_complete(2, &set(&[0, 1])));
        assert!(can_complete(1, &set(&[0])));
    }

    #[test]
    fn test_can_uncomplete_blocked_by_later_step() {
        assert!(!can_uncomplete(1, &set(&[0, 1, 2])));
        assert!(can_uncomplete(2, &set(&[0, 1, 2])));
        assert!(can_uncomplete(0, &set(&[0])));
    }

    #[test]
    fn test_session_walks_forward_only() {
        let mut session = CookingSession::new(steps(&[0, 1, 2]));

        assert!(!session.toggle(2));
        assert!(session.toggle(0));
        assert!(!session.toggle(2));
        assert!(session.toggle(1));
        assert!(session.toggle(2));
        assert!(session.is_finished());
    }

    #[test]
    fn test_session_unwinds_backward_only() {
        let mut session = CookingSession::new(steps(&[0, 1, 2]));
        session.toggle(0);
        session.toggle(1);
        session.toggle(2);

        assert!(!session.toggle(0));
        assert!(!session.toggle(1));
        assert!(session.toggle(2));
        assert!(session.toggle(1));
        assert_eq!(session.completed(), &set(&[0]));
    }

    #[test]
    fn test_session_ignores_unknown_order() {
        let mut session = CookingSession::new(steps(&[0, 1]));
        assert!(!session.toggle(7));
        assert!(session.completed().is_empty());
    }

    #[test]
    fn test_session_progress_and_current_step() {
        let mut session = CookingSession::new(steps(&[1, 0]));
        assert_eq!(session.progress(), 0.0);
        assert_eq!(session.current_step().unwrap().order, 0);

        session.toggle(0);
        assert_eq!(session.progress(), 0.5);
        assert_eq!(session.current_step().unwrap().order, 1);

        session.toggle(1);
        assert_eq!(session.progress(), 1.0);
        assert!(session.current_step().is_none());
    }

    #[test]
    fn test_empty_session() {
        let session = CookingSession::new(Vec::new());
        assert_eq!(session.progress(), 0.0);
        assert!(session.is_finished());
        assert!(session.current_step().is_none());
    }
}
