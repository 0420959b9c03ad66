mod meal_log;
mod plan;
mod profile;
mod slot;

pub use meal_log::{LoggedItem, MealLogEntry};
pub use plan::{MacroTotals, PlanEntry};
pub use profile::{NutritionProfile, DEFAULT_MEALS_PER_DAY, DEFAULT_SNACKS_PER_DAY};
pub use slot::{Slot, SlotCategory, SlotKey};
