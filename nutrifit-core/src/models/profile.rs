use serde::{Deserialize, Serialize};

/// Default daily meal target when onboarding never recorded one.
pub const DEFAULT_MEALS_PER_DAY: usize = 3;
/// Default daily snack target when onboarding never recorded one.
pub const DEFAULT_SNACKS_PER_DAY: usize = 2;

/// The user's nutrition preferences, captured once during onboarding.
///
/// Read-only input to slot resolution; the engine never mutates it.
/// Fields missing from a serialized profile fall back to the defaults
/// below rather than failing the load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NutritionProfile {
    pub diet_type: String,
    pub allergies: Vec<String>,
    pub favorite_cuisines: Vec<String>,
    pub meals_per_day: usize,
    pub snacks_per_day: usize,
    pub cooking_time_preference: String,
}

impl NutritionProfile {
    pub fn new(diet_type: impl Into<String>) -> Self {
        Self {
            diet_type: diet_type.into(),
            allergies: Vec::new(),
            favorite_cuisines: Vec::new(),
            meals_per_day: DEFAULT_MEALS_PER_DAY,
            snacks_per_day: DEFAULT_SNACKS_PER_DAY,
            cooking_time_preference: "any".to_string(),
        }
    }

    pub fn with_targets(mut self, meals_per_day: usize, snacks_per_day: usize) -> Self {
        self.meals_per_day = meals_per_day;
        self.snacks_per_day = snacks_per_day;
        self
    }

    pub fn with_allergies(mut self, allergies: Vec<String>) -> Self {
        self.allergies = allergies;
        self
    }

    pub fn with_favorite_cuisines(mut self, cuisines: Vec<String>) -> Self {
        self.favorite_cuisines = cuisines;
        self
    }

    pub fn with_cooking_time_preference(mut self, preference: impl Into<String>) -> Self {
        self.cooking_time_preference = preference.into();
        self
    }
}

impl Default for NutritionProfile {
    fn default() -> Self {
        Self::new("balanced")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults() {
        let profile = NutritionProfile::default();
        assert_eq!(profile.diet_type, "balanced");
        assert_eq!(profile.meals_per_day, DEFAULT_MEALS_PER_DAY);
        assert_eq!(profile.snacks_per_day, DEFAULT_SNACKS_PER_DAY);
        assert!(profile.allergies.is_empty());
    }

    #[test]
    fn test_profile_builder() {
        let profile = NutritionProfile::new("vegetarian")
            .with_targets(4, 1)
            .with_allergies(vec!["peanuts".into()])
            .with_cooking_time_preference("quick");

        assert_eq!(profile.meals_per_day, 4);
        assert_eq!(profile.snacks_per_day, 1);
        assert_eq!(profile.allergies, vec!["peanuts".to_string()]);
        assert_eq!(profile.cooking_time_preference, "quick");
    }

    #[test]
    fn test_partial_profile_uses_named_fallbacks() {
        let parsed: NutritionProfile =
            serde_json::from_str(r#"{"diet_type": "keto", "meals_per_day": 4}"#).unwrap();
        assert_eq!(parsed.diet_type, "keto");
        assert_eq!(parsed.meals_per_day, 4);
        assert_eq!(parsed.snacks_per_day, DEFAULT_SNACKS_PER_DAY);
        assert_eq!(parsed.cooking_time_preference, "any");
    }

    #[test]
    fn test_profile_json_roundtrip() {
        let profile = NutritionProfile::new("keto").with_targets(3, 2);
        let json = serde_json::to_string(&profile).unwrap();
        let parsed: NutritionProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile);
    }
}
