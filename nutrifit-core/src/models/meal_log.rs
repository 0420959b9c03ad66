use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::plan::PlanEntry;

/// One food item inside a logged meal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggedItem {
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
}

impl LoggedItem {
    pub fn new(name: impl Into<String>, calories: f64) -> Self {
        Self {
            name: name.into(),
            calories,
            protein_g: 0.0,
            carbs_g: 0.0,
            fats_g: 0.0,
        }
    }

    pub fn with_macros(mut self, protein_g: f64, carbs_g: f64, fats_g: f64) -> Self {
        self.protein_g = protein_g;
        self.carbs_g = carbs_g;
        self.fats_g = fats_g;
        self
    }
}

/// A meal that was actually eaten (vs `PlanEntry`, which is planned).
///
/// Log entries have a lifetime independent from the plan: regenerating or
/// swapping the plan never touches them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealLogEntry {
    pub id: Uuid,
    pub meal_type: String,
    pub timestamp: DateTime<Utc>,
    pub items: Vec<LoggedItem>,
    pub notes: Option<String>,
}

impl MealLogEntry {
    pub fn new(meal_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            meal_type: meal_type.into(),
            timestamp: Utc::now(),
            items: Vec::new(),
            notes: None,
        }
    }

    pub fn with_items(mut self, items: Vec<LoggedItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Synthesize a log entry from a planned entry, copying its macros.
    /// Used for the optimistic insert before the server confirms.
    pub fn from_plan_entry(entry: &PlanEntry) -> Self {
        Self::new(entry.meal_type.clone()).with_items(vec![LoggedItem::new(
            entry.title.clone(),
            entry.calories,
        )
        .with_macros(entry.protein_g, entry.carbs_g, entry.fats_g)])
    }

    /// Display title: the first item's name.
    pub fn title(&self) -> Option<&str> {
        self.items.first().map(|item| item.name.as_str())
    }

    pub fn calories(&self) -> f64 {
        self.items.iter().map(|item| item.calories).sum()
    }

    pub fn is_snack(&self) -> bool {
        self.meal_type.to_lowercase().contains("snack")
    }
}

impl fmt::Display for MealLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({} kcal)",
            self.meal_type,
            self.title().unwrap_or("(no items)"),
            self.calories().round() as i64
        )?;
        if let Some(notes) = &self.notes {
            write!(f, " [{}]", notes)?;
        }
        Ok(())
    }
}
