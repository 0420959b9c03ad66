//! Swap coordination: replacing one slot's planned content without
//! disturbing sibling slots that share its label.
//!
//! Identity is resolved once into a [`SwapTarget`] carrying the
//! `(category, index)` key; every subsequent call for the interaction
//! reuses that key instead of re-deriving it from the label.

use tracing::debug;

use crate::api::{Alternative, SwapApplyRequest, SwapIn, SwapSuggestRequest};
use crate::error::NutritionError;
use crate::lifecycle::PlanState;
use crate::models::{PlanEntry, SlotCategory, SlotKey};
use crate::session::{NutritionEvent, PlanSession};

/// The server caps suggestion batches at three.
pub const MAX_ALTERNATIVES: usize = 3;

/// The resolved identity of the slot being swapped.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapTarget {
    pub key: SlotKey,
    pub meal_type: String,
    pub current_title: String,
}

/// Case-insensitive meal-type comparison that treats underscores and
/// spaces as the same separator ("Morning Snack" matches
/// "morning_snack").
pub(crate) fn meal_type_matches(a: &str, b: &str) -> bool {
    let normalize = |s: &str| s.to_lowercase().replace(' ', "_");
    normalize(a) == normalize(b)
}

/// Resolve which plan entry a swap refers to.
///
/// The label decides only the category (snack vs meal). A supplied
/// in-range index is used directly; otherwise the first entry whose
/// meal type matches the label wins. The returned target records the
/// actual index, which all later calls must carry.
pub fn resolve_swap_target(
    meals: &[PlanEntry],
    snacks: &[PlanEntry],
    label: &str,
    slot_index: Option<usize>,
) -> Result<SwapTarget, NutritionError> {
    let category = SlotCategory::of(label);
    let source = match category {
        SlotCategory::Meal => meals,
        SlotCategory::Snack => snacks,
    };

    let actual_index = match slot_index.filter(|&index| index < source.len()) {
        Some(index) => index,
        None => source
            .iter()
            .position(|entry| meal_type_matches(&entry.meal_type, label))
            .ok_or_else(|| {
                NutritionError::validation(format!("No planned {} matches '{}'.", category, label))
            })?,
    };

    let entry = &source[actual_index];
    Ok(SwapTarget {
        key: SlotKey::new(category, actual_index),
        meal_type: entry.meal_type.clone(),
        current_title: entry.title.clone(),
    })
}

impl PlanSession {
    /// Resolve a swap target against the current plan.
    pub fn swap_target(
        &self,
        label: &str,
        slot_index: Option<usize>,
    ) -> Result<SwapTarget, NutritionError> {
        let day = self.lock_state();
        day.lifecycle.ensure_can_swap()?;
        resolve_swap_target(&day.meals, &day.snacks, label, slot_index)
    }

    /// Ask the agent for alternatives to the targeted slot. Zero
    /// alternatives is an explicit error, never a silent empty list.
    pub async fn suggest_swaps(
        &self,
        target: &SwapTarget,
        count: usize,
        desired_calories: Option<f64>,
    ) -> Result<Vec<Alternative>, NutritionError> {
        {
            let day = self.lock_state();
            day.lifecycle.ensure_can_swap()?;
        }

        let request = SwapSuggestRequest {
            meal_type: target.meal_type.clone(),
            current_title: target.current_title.clone(),
            alternatives_count: count.clamp(1, MAX_ALTERNATIVES),
            desired_calories,
            slot_index: target.key.index,
            is_snack: target.key.category == SlotCategory::Snack,
        };

        let alternatives = self.api.suggest_swaps(&request).await?;
        if alternatives.is_empty() {
            return Err(NutritionError::partial_data(
                "Unable to generate alternatives right now. Try again in a moment.",
            ));
        }
        debug!(target = %target.key, count = alternatives.len(), "swap alternatives received");
        Ok(alternatives)
    }

    /// Apply the chosen alternative. On success the entire plan and
    /// snack arrays are replaced from the response - never patched in
    /// place - so client and server cannot drift. On failure local state
    /// is untouched.
    pub async fn apply_swap(
        &self,
        target: &SwapTarget,
        alternatives: &[Alternative],
        chosen_title: &str,
    ) -> Result<PlanState, NutritionError> {
        let _guard = self.ops.lock().await;
        {
            let day = self.lock_state();
            day.lifecycle.ensure_can_swap()?;
        }

        // Prefer the detailed alternative object; a bare title wrapper
        // is the fallback when the choice is not among the suggestions.
        let swap_in = alternatives
            .iter()
            .find(|alternative| alternative.title.eq_ignore_ascii_case(chosen_title))
            .map(SwapIn::from)
            .unwrap_or_else(|| SwapIn::Minimal {
                title: chosen_title.to_string(),
            });

        let request = SwapApplyRequest {
            meal_type: target.meal_type.clone(),
            current_title: target.current_title.clone(),
            swap_in,
            slot_index: target.key.index,
            is_snack: target.key.category == SlotCategory::Snack,
        };

        let outcome = self.api.apply_swap(&request).await?;

        let state = {
            let mut day = self.lock_state();
            day.apply_swap_outcome(outcome);
            day.lifecycle.state()
        };
        debug!(target = %target.key, state = %state, "swap applied");
        self.emit(NutritionEvent::PlanUpdated { date: self.date() });
        Ok(state)
    }
}
