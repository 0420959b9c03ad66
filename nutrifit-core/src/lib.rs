//! NutriFit Core Library
//!
//! The meal-plan lifecycle and grocery-aggregation engine behind the
//! NutriFit nutrition screen: plan state machine, slot resolution,
//! ingredient aggregation, swap coordination, and meal logging against a
//! remote nutrition service.

pub mod api;
pub mod error;
pub mod grocery;
pub mod lifecycle;
pub mod logger;
pub mod models;
pub mod session;
pub mod slots;
pub mod swap;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{
    Alternative, DayLog, HttpNutritionApi, MealLogRequest, NutritionApi, PlanCache, PlanSnapshot,
    SavePlanRequest, SwapApplyRequest, SwapIn, SwapOutcome, SwapSuggestRequest,
    DEFAULT_WATER_GOAL_ML,
};
pub use error::NutritionError;
pub use grocery::{
    aggregate_ingredients, build_grocery_list, format_item, grocery_csv, AggregatedItem,
};
pub use lifecycle::{PlanLifecycle, PlanState};
pub use models::{
    LoggedItem, MacroTotals, MealLogEntry, NutritionProfile, PlanEntry, Slot, SlotCategory,
    SlotKey, DEFAULT_MEALS_PER_DAY, DEFAULT_SNACKS_PER_DAY,
};
pub use session::{NutritionEvent, PlanSession};
pub use slots::{format_label, resolve_slots, DaySlots};
pub use swap::{resolve_swap_target, SwapTarget, MAX_ALTERNATIVES};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
