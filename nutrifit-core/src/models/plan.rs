use serde::{Deserialize, Serialize};
use std::fmt;

/// One planned meal or snack for the day.
///
/// Plan entries are owned by the current plan and replaced wholesale on
/// regenerate and swap; nothing mutates them field by field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanEntry {
    pub meal_type: String,
    pub title: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
    /// Free-text ingredient lines, e.g. "1 cup rice".
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

impl PlanEntry {
    pub fn new(meal_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            meal_type: meal_type.into(),
            title: title.into(),
            calories: 0.0,
            protein_g: 0.0,
            carbs_g: 0.0,
            fats_g: 0.0,
            ingredients: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn with_macros(mut self, calories: f64, protein_g: f64, carbs_g: f64, fats_g: f64) -> Self {
        self.calories = calories;
        self.protein_g = protein_g;
        self.carbs_g = carbs_g;
        self.fats_g = fats_g;
        self
    }

    pub fn with_ingredients(mut self, ingredients: Vec<String>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }

    /// Snack entries are recognized by their meal type, not by a flag.
    pub fn is_snack(&self) -> bool {
        self.meal_type.to_lowercase().contains("snack")
    }
}

impl fmt::Display for PlanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} kcal)", self.title, self.calories.round() as i64)?;
        writeln!(
            f,
            "  P {}g / C {}g / F {}g",
            self.protein_g.round() as i64,
            self.carbs_g.round() as i64,
            self.fats_g.round() as i64
        )?;

        if !self.ingredients.is_empty() {
            writeln!(f, "  Ingredients:")?;
            for ingredient in &self.ingredients {
                writeln!(f, "    - {}", ingredient)?;
            }
        }

        if !self.steps.is_empty() {
            writeln!(f, "  Steps:")?;
            for (i, step) in self.steps.iter().enumerate() {
                writeln!(f, "    {}. {}", i + 1, step)?;
            }
        }

        Ok(())
    }
}

/// Daily macro totals, either planned (from the plan response) or consumed
/// (reconciled from logged meals).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
}

impl MacroTotals {
    pub fn new(calories: f64, protein_g: f64, carbs_g: f64, fats_g: f64) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fats_g,
        }
    }
}

impl fmt::Display for MacroTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} kcal (P {}g / C {}g / F {}g)",
            self.calories.round() as i64,
            self.protein_g.round() as i64,
            self.carbs_g.round() as i64,
            self.fats_g.round() as i64
        )
    }
}
