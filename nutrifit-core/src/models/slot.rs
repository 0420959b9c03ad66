use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::plan::PlanEntry;

/// Which of the two independent slot lists a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotCategory {
    Meal,
    Snack,
}

impl SlotCategory {
    /// Classify a free-text meal type. Anything containing "snack"
    /// (case-insensitive) is a snack; everything else is a meal.
    pub fn of(meal_type: &str) -> Self {
        if meal_type.to_lowercase().contains("snack") {
            SlotCategory::Snack
        } else {
            SlotCategory::Meal
        }
    }

    /// Positional fallback label prefix ("Meal" / "Snack").
    pub fn fallback_prefix(&self) -> &'static str {
        match self {
            SlotCategory::Meal => "Meal",
            SlotCategory::Snack => "Snack",
        }
    }
}

impl fmt::Display for SlotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotCategory::Meal => write!(f, "meal"),
            SlotCategory::Snack => write!(f, "snack"),
        }
    }
}

impl FromStr for SlotCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "meal" => Ok(SlotCategory::Meal),
            "snack" => Ok(SlotCategory::Snack),
            _ => Err(format!(
                "Invalid slot category '{}'. Valid options: meal, snack",
                s
            )),
        }
    }
}

/// Positional identity of a slot: category plus index within that category.
///
/// This is the one identity that swap and log calls carry. Labels are not
/// usable as identity because two snack slots share the same label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub category: SlotCategory,
    pub index: usize,
}

impl SlotKey {
    pub fn new(category: SlotCategory, index: usize) -> Self {
        Self { category, index }
    }

    pub fn meal(index: usize) -> Self {
        Self::new(SlotCategory::Meal, index)
    }

    pub fn snack(index: usize) -> Self {
        Self::new(SlotCategory::Snack, index)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.category, self.index)
    }
}

/// A derived display/action unit pairing a planned entry with any
/// corresponding logged entry. Rebuilt on every render; never mutated and
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub key: SlotKey,
    pub label: String,
    pub title: String,
    pub kcal: f64,
    pub logged: bool,
    /// The planned entry backing this slot, when the plan has one.
    /// Slots without a planned entry carry logged-only data and offer no
    /// swap or recipe affordance.
    pub planned: Option<PlanEntry>,
}

impl Slot {
    pub fn can_swap(&self) -> bool {
        self.planned.is_some()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.logged { "[x]" } else { "[ ]" };
        write!(
            f,
            "{} {:<16} {:<28} {:>5} kcal",
            mark,
            self.label,
            self.title,
            self.kcal.round() as i64
        )
    }
}
