//! Plan lifecycle state machine.
//!
//! A day's plan is in exactly one of three states, and the state gates
//! which user actions are legal:
//!
//! - `none`: no plan exists. Nothing but load/refresh is legal.
//! - `generated`: a plan exists but the user has not confirmed it.
//!   Swapping and recipe viewing are legal; logging and grocery export
//!   are not.
//! - `saved`: the user persisted the plan. Logging and grocery export
//!   become legal; swapping remains legal and keeps `saved` when the
//!   server says the plan is still saved.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::NutritionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanState {
    None,
    Generated,
    Saved,
}

impl fmt::Display for PlanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanState::None => write!(f, "none"),
            PlanState::Generated => write!(f, "generated"),
            PlanState::Saved => write!(f, "saved"),
        }
    }
}

/// Tracks the lifecycle state and enforces legal transitions.
///
/// Transitions only happen on server confirmation: a failed call leaves
/// the state exactly where it was. There are no partial transitions.
#[derive(Debug, Clone)]
pub struct PlanLifecycle {
    state: PlanState,
}

impl PlanLifecycle {
    pub fn new() -> Self {
        Self {
            state: PlanState::None,
        }
    }

    pub fn state(&self) -> PlanState {
        self.state
    }

    /// Apply the outcome of a load/refresh. An empty plan means `none`;
    /// otherwise the response's saved flag decides between `saved` and
    /// `generated`. Regeneration goes through this same transition, so a
    /// previously saved plan demotes to `generated` when the regenerated
    /// content comes back unconfirmed.
    pub fn apply_refresh(&mut self, saved: bool, empty: bool) -> PlanState {
        self.state = if empty {
            PlanState::None
        } else if saved {
            PlanState::Saved
        } else {
            PlanState::Generated
        };
        self.state
    }

    /// Saving is only legal from `generated`.
    pub fn ensure_can_save(&self) -> Result<(), NutritionError> {
        match self.state {
            PlanState::Generated => Ok(()),
            PlanState::None => Err(NutritionError::validation(
                "No plan to save. Generate a plan first.",
            )),
            PlanState::Saved => Err(NutritionError::validation("This plan is already saved.")),
        }
    }

    /// Complete a successful save.
    pub fn complete_save(&mut self) {
        self.state = PlanState::Saved;
    }

    /// Swapping is legal from `generated` or `saved`.
    pub fn ensure_can_swap(&self) -> Result<(), NutritionError> {
        match self.state {
            PlanState::Generated | PlanState::Saved => Ok(()),
            PlanState::None => Err(NutritionError::validation(
                "No plan yet. Generate a plan first.",
            )),
        }
    }

    /// Apply the outcome of a swap. The resulting state comes from the
    /// response's saved flag: a saved plan stays saved when the server
    /// confirms it, otherwise the plan is back to unconfirmed content.
    pub fn apply_swap(&mut self, saved: bool) -> PlanState {
        self.state = if saved {
            PlanState::Saved
        } else {
            PlanState::Generated
        };
        self.state
    }

    /// Logging and grocery export are only legal from `saved`.
    pub fn ensure_can_log(&self) -> Result<(), NutritionError> {
        match self.state {
            PlanState::Saved => Ok(()),
            _ => Err(NutritionError::validation(
                "Save your plan before logging meals or exporting groceries.",
            )),
        }
    }
}

impl Default for PlanLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_none() {
        let lifecycle = PlanLifecycle::new();
        assert_eq!(lifecycle.state(), PlanState::None);
    }

    #[test]
    fn test_refresh_transitions() {
        let mut lifecycle = PlanLifecycle::new();

        assert_eq!(lifecycle.apply_refresh(false, true), PlanState::None);
        assert_eq!(lifecycle.apply_refresh(false, false), PlanState::Generated);
        assert_eq!(lifecycle.apply_refresh(true, false), PlanState::Saved);
        // saved flag on an empty plan still means no plan
        assert_eq!(lifecycle.apply_refresh(true, true), PlanState::None);
    }

    #[test]
    fn test_save_only_from_generated() {
        let mut lifecycle = PlanLifecycle::new();
        assert!(lifecycle.ensure_can_save().is_err());

        lifecycle.apply_refresh(false, false);
        assert!(lifecycle.ensure_can_save().is_ok());

        lifecycle.complete_save();
        assert_eq!(lifecycle.state(), PlanState::Saved);
        assert!(lifecycle.ensure_can_save().is_err());
    }

    #[test]
    fn test_swap_preserves_saved_when_server_confirms() {
        let mut lifecycle = PlanLifecycle::new();
        lifecycle.apply_refresh(true, false);

        assert!(lifecycle.ensure_can_swap().is_ok());
        assert_eq!(lifecycle.apply_swap(true), PlanState::Saved);
        assert_eq!(lifecycle.apply_swap(false), PlanState::Generated);
    }

    #[test]
    fn test_swap_illegal_from_none() {
        let lifecycle = PlanLifecycle::new();
        assert!(lifecycle.ensure_can_swap().is_err());
    }

    #[test]
    fn test_regenerate_demotes_saved_plan() {
        let mut lifecycle = PlanLifecycle::new();
        lifecycle.apply_refresh(true, false);
        assert_eq!(lifecycle.state(), PlanState::Saved);

        // Regenerated content comes back unconfirmed.
        assert_eq!(lifecycle.apply_refresh(false, false), PlanState::Generated);
    }

    #[test]
    fn test_log_gating() {
        let mut lifecycle = PlanLifecycle::new();
        assert!(lifecycle.ensure_can_log().is_err());

        lifecycle.apply_refresh(false, false);
        assert!(lifecycle.ensure_can_log().is_err());

        lifecycle.complete_save();
        assert!(lifecycle.ensure_can_log().is_ok());
    }
}
