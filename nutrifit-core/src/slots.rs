//! Slot resolution: merging profile targets, the current plan, and the
//! day's logged meals into ordered display slots.
//!
//! Meals and snacks are resolved independently. Within each category the
//! i-th logged entry pairs with the i-th planned entry, so identity is
//! positional - two "Snack" slots are distinct slots even though their
//! labels match.

use crate::models::{MealLogEntry, NutritionProfile, PlanEntry, Slot, SlotCategory, SlotKey};

/// The resolved slot lists for one day.
#[derive(Debug, Clone, Default)]
pub struct DaySlots {
    pub meals: Vec<Slot>,
    pub snacks: Vec<Slot>,
}

impl DaySlots {
    /// All slots in display order, meals first.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.meals.iter().chain(self.snacks.iter())
    }

    pub fn get(&self, key: &SlotKey) -> Option<&Slot> {
        match key.category {
            SlotCategory::Meal => self.meals.get(key.index),
            SlotCategory::Snack => self.snacks.get(key.index),
        }
    }
}

/// Build the day's slots from the three underlying collections.
///
/// Per category the slot count is `max(profile target, logged count,
/// planned count)`, so nothing the user logged or the plan contains is
/// ever hidden by an undercounting target.
pub fn resolve_slots(
    profile: &NutritionProfile,
    logged: &[MealLogEntry],
    planned_meals: &[PlanEntry],
    planned_snacks: &[PlanEntry],
) -> DaySlots {
    // Chronological order decides which logged entry owns which slot.
    let mut ordered: Vec<&MealLogEntry> = logged.iter().collect();
    ordered.sort_by_key(|entry| entry.timestamp);

    let (logged_snacks, logged_meals): (Vec<&MealLogEntry>, Vec<&MealLogEntry>) =
        ordered.into_iter().partition(|entry| entry.is_snack());

    DaySlots {
        meals: resolve_category(
            SlotCategory::Meal,
            profile.meals_per_day,
            &logged_meals,
            planned_meals,
        ),
        snacks: resolve_category(
            SlotCategory::Snack,
            profile.snacks_per_day,
            &logged_snacks,
            planned_snacks,
        ),
    }
}

fn resolve_category(
    category: SlotCategory,
    target: usize,
    logged: &[&MealLogEntry],
    planned: &[PlanEntry],
) -> Vec<Slot> {
    let slot_count = target.max(logged.len()).max(planned.len());
    let mut slots = Vec::with_capacity(slot_count);

    for index in 0..slot_count {
        let logged_entry = logged.get(index).copied();
        let planned_entry = planned.get(index);

        let label = logged_entry
            .map(|entry| format_label(&entry.meal_type))
            .or_else(|| planned_entry.map(|entry| format_label(&entry.meal_type)))
            .unwrap_or_else(|| format!("{} {}", category.fallback_prefix(), index + 1));

        // Logged data wins over planned data for display.
        let (title, kcal) = match (logged_entry, planned_entry) {
            (Some(entry), _) => (
                entry.title().unwrap_or("(no items)").to_string(),
                entry.calories(),
            ),
            (None, Some(entry)) => (entry.title.clone(), entry.calories),
            (None, None) => (String::new(), 0.0),
        };

        slots.push(Slot {
            key: SlotKey::new(category, index),
            label,
            title,
            kcal,
            logged: logged_entry.is_some(),
            planned: planned_entry.cloned(),
        });
    }

    slots
}

/// Turn a raw meal type into a display label: underscores become spaces
/// and each word is capitalized ("morning_snack" -> "Morning Snack").
pub fn format_label(meal_type: &str) -> String {
    meal_type
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoggedItem;
    use chrono::{Duration, Utc};

    fn logged(meal_type: &str, name: &str, kcal: f64, minutes_ago: i64) -> MealLogEntry {
        let mut entry =
            MealLogEntry::new(meal_type).with_items(vec![LoggedItem::new(name, kcal)]);
        entry.timestamp = Utc::now() - Duration::minutes(minutes_ago);
        entry
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label("breakfast"), "Breakfast");
        assert_eq!(format_label("morning_snack"), "Morning Snack");
        assert_eq!(format_label("LUNCH"), "Lunch");
    }

    #[test]
    fn test_slot_count_is_max_of_inputs() {
        // Profile wants 3 meals and 1 snack; 2 meals logged; the plan has
        // 3 meal entries and 1 snack entry, nothing snack-logged.
        let profile = NutritionProfile::default().with_targets(3, 1);
        let logs = vec![
            logged("breakfast", "Oatmeal", 350.0, 120),
            logged("lunch", "Salad", 450.0, 30),
        ];
        let meals = vec![
            PlanEntry::new("breakfast", "Oatmeal").with_macros(350.0, 12.0, 60.0, 8.0),
            PlanEntry::new("lunch", "Salad").with_macros(450.0, 30.0, 20.0, 25.0),
            PlanEntry::new("dinner", "Curry").with_macros(600.0, 25.0, 80.0, 18.0),
        ];
        let snacks = vec![PlanEntry::new("snack", "Apple").with_macros(95.0, 0.5, 25.0, 0.3)];

        let slots = resolve_slots(&profile, &logs, &meals, &snacks);
        assert_eq!(slots.meals.len(), 3);
        assert_eq!(slots.snacks.len(), 1);
        assert!(slots.meals[0].logged);
        assert!(slots.meals[1].logged);
        assert!(!slots.meals[2].logged);
        assert!(!slots.snacks[0].logged);
    }

    #[test]
    fn test_logged_overflow_is_not_hidden() {
        // More meals logged than the target or the plan account for.
        let profile = NutritionProfile::default().with_targets(2, 0);
        let logs = vec![
            logged("breakfast", "Eggs", 300.0, 300),
            logged("lunch", "Wrap", 400.0, 200),
            logged("dinner", "Stew", 550.0, 100),
        ];
        let meals = vec![PlanEntry::new("breakfast", "Eggs")];

        let slots = resolve_slots(&profile, &logs, &meals, &[]);
        assert_eq!(slots.meals.len(), 3);
        // Trailing slot carries logged-only data and no swap affordance.
        assert!(slots.meals[2].logged);
        assert!(slots.meals[2].planned.is_none());
        assert!(!slots.meals[2].can_swap());
        assert_eq!(slots.meals[2].title, "Stew");
    }

    #[test]
    fn test_logged_data_wins_over_planned() {
        let profile = NutritionProfile::default().with_targets(1, 0);
        let logs = vec![logged("breakfast", "Leftover Pizza", 700.0, 10)];
        let meals = vec![PlanEntry::new("breakfast", "Oatmeal").with_macros(350.0, 12.0, 60.0, 8.0)];

        let slots = resolve_slots(&profile, &logs, &meals, &[]);
        assert_eq!(slots.meals[0].title, "Leftover Pizza");
        assert_eq!(slots.meals[0].kcal, 700.0);
        assert!(slots.meals[0].logged);
        // The planned entry is still attached for swap/recipe affordances.
        assert!(slots.meals[0].can_swap());
    }

    #[test]
    fn test_positional_fallback_labels() {
        let profile = NutritionProfile::default().with_targets(2, 2);
        let slots = resolve_slots(&profile, &[], &[], &[]);

        assert_eq!(slots.meals[1].label, "Meal 2");
        assert_eq!(slots.snacks[0].label, "Snack 1");
        assert_eq!(slots.snacks[1].label, "Snack 2");
    }

    #[test]
    fn test_chronological_pairing() {
        // Logged out of order: the earlier meal must land in slot 0.
        let profile = NutritionProfile::default().with_targets(2, 0);
        let logs = vec![
            logged("lunch", "Wrap", 400.0, 30),
            logged("breakfast", "Eggs", 300.0, 240),
        ];

        let slots = resolve_slots(&profile, &logs, &[], &[]);
        assert_eq!(slots.meals[0].title, "Eggs");
        assert_eq!(slots.meals[1].title, "Wrap");
    }

    #[test]
    fn test_snack_slots_use_position_identity() {
        let profile = NutritionProfile::default().with_targets(0, 2);
        let snacks = vec![
            PlanEntry::new("snack", "Apple"),
            PlanEntry::new("snack", "Yogurt"),
        ];

        let slots = resolve_slots(&profile, &[], &[], &snacks);
        assert_eq!(slots.snacks[0].label, slots.snacks[1].label);
        assert_ne!(slots.snacks[0].key, slots.snacks[1].key);
        assert_eq!(slots.snacks[1].key, SlotKey::snack(1));
    }
}
