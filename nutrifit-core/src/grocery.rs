//! Grocery aggregation: parsing free-text ingredient lines, normalizing
//! quantities to grams, and folding a whole day's plan into one list.
//!
//! Lines look like "<quantity> <unit> <item...>". Lines that don't parse
//! are kept as "(unspecified amount)" entries rather than dropped, so the
//! exported list always accounts for every ingredient the plan names.

use std::collections::HashMap;

use crate::models::PlanEntry;

/// Preparation modifiers stripped from item names as whole words.
const PREP_MODIFIERS: [&str; 8] = [
    "grilled", "cooked", "raw", "fresh", "dried", "chopped", "sliced", "diced",
];

const GRAMS_PER_CUP: f64 = 240.0;
const GRAMS_PER_TBSP: f64 = 15.0;
const GRAMS_PER_TSP: f64 = 5.0;
const GRAMS_PER_KG: f64 = 1000.0;
const GRAMS_PER_LB: f64 = 454.0;
const GRAMS_PER_OZ: f64 = 28.0;

/// Gram thresholds for the three output bands.
const SMALL_AMOUNT_G: f64 = 50.0;
const KILOGRAM_BAND_G: f64 = 1000.0;

/// One aggregated bucket. `grams` is `None` for pass-through lines that
/// never matched the quantity/unit pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedItem {
    pub name: String,
    pub grams: Option<f64>,
}

enum ParsedLine {
    Quantified { name: String, grams: f64 },
    Unspecified { text: String },
}

fn unit_to_grams(unit: &str) -> Option<f64> {
    match unit.to_lowercase().trim_end_matches('.') {
        "cup" | "cups" => Some(GRAMS_PER_CUP),
        "tablespoon" | "tablespoons" | "tbsp" => Some(GRAMS_PER_TBSP),
        "teaspoon" | "teaspoons" | "tsp" => Some(GRAMS_PER_TSP),
        "gram" | "grams" | "g" => Some(1.0),
        "kilogram" | "kilograms" | "kg" => Some(GRAMS_PER_KG),
        "pound" | "pounds" | "lb" | "lbs" => Some(GRAMS_PER_LB),
        "ounce" | "ounces" | "oz" => Some(GRAMS_PER_OZ),
        _ => None,
    }
}

/// Strip preparation modifiers (whole words) and stray punctuation from an
/// item name. "chicken breast (grilled)" -> "chicken breast".
fn clean_item_name(raw: &str) -> String {
    let depunctuated: String = raw
        .chars()
        .map(|c| if matches!(c, '(' | ')' | ',') { ' ' } else { c })
        .collect();

    let cleaned = depunctuated
        .split_whitespace()
        .filter(|word| {
            let lower = word.to_lowercase();
            !PREP_MODIFIERS.contains(&lower.as_str())
        })
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.is_empty() {
        raw.trim().to_string()
    } else {
        cleaned
    }
}

fn parse_line(line: &str) -> Option<ParsedLine> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut tokens = trimmed.split_whitespace();
    let quantity = tokens.next().and_then(|t| t.parse::<f64>().ok());
    let factor = tokens.next().and_then(unit_to_grams);
    let rest = tokens.collect::<Vec<_>>().join(" ");

    match (quantity, factor) {
        (Some(quantity), Some(factor)) if !rest.is_empty() => Some(ParsedLine::Quantified {
            name: clean_item_name(&rest),
            grams: quantity * factor,
        }),
        _ => Some(ParsedLine::Unspecified {
            text: clean_item_name(trimmed),
        }),
    }
}

/// Aggregate ingredient lines into buckets keyed by cleaned item name
/// (case-insensitive), preserving first-seen insertion order. Quantified
/// lines sum in grams; unparsable lines pass through once each.
pub fn aggregate_ingredients<'a, I>(lines: I) -> Vec<AggregatedItem>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut items: Vec<AggregatedItem> = Vec::new();
    let mut index: HashMap<(String, bool), usize> = HashMap::new();

    for line in lines {
        let Some(parsed) = parse_line(line) else {
            continue;
        };

        let (name, grams) = match parsed {
            ParsedLine::Quantified { name, grams } => (name, Some(grams)),
            ParsedLine::Unspecified { text } => (text, None),
        };

        let key = (name.to_lowercase(), grams.is_some());
        match index.get(&key) {
            Some(&position) => {
                if let (Some(total), Some(grams)) = (&mut items[position].grams, grams) {
                    *total += grams;
                }
            }
            None => {
                index.insert(key, items.len());
                items.push(AggregatedItem { name, grams });
            }
        }
    }

    items
}

/// Format one aggregated bucket for the grocery list.
pub fn format_item(item: &AggregatedItem) -> String {
    match item.grams {
        Some(grams) if grams < SMALL_AMOUNT_G => format!("{} (small amount)", item.name),
        Some(grams) if grams < KILOGRAM_BAND_G => {
            format!("{}g {}", grams.round() as i64, item.name)
        }
        Some(grams) => format!("{}kg {}", (grams / GRAMS_PER_KG).round() as i64, item.name),
        None => format!("(unspecified amount) {}", item.name),
    }
}

/// Build the formatted grocery list for a full day: every ingredient line
/// of every planned meal and snack, aggregated and formatted.
pub fn build_grocery_list(meals: &[PlanEntry], snacks: &[PlanEntry]) -> Vec<String> {
    let lines = meals
        .iter()
        .chain(snacks.iter())
        .flat_map(|entry| entry.ingredients.iter())
        .map(String::as_str);

    aggregate_ingredients(lines)
        .iter()
        .map(format_item)
        .collect()
}

/// Render the grocery list as CSV for downstream import tooling.
///
/// Format is fixed: header row `item,checked`, then one row per item as
/// `<item-text-with-commas-stripped>,` - the trailing comma is the empty
/// checkbox column and must not be dropped.
pub fn grocery_csv(items: &[String]) -> String {
    let mut out = String::from("item,checked\n");
    for item in items {
        out.push_str(&item.replace(',', ""));
        out.push_str(",\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregates_repeated_ingredient() {
        let items = aggregate_ingredients(["1 cup rice", "2 tbsp olive oil", "1 cup rice"]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "rice");
        assert_eq!(items[0].grams, Some(480.0));
        assert_eq!(items[1].name, "olive oil");
        assert_eq!(items[1].grams, Some(30.0));

        assert_eq!(format_item(&items[0]), "480g rice");
        assert_eq!(format_item(&items[1]), "olive oil (small amount)");
    }

    #[test]
    fn test_modifier_cleanup() {
        let items = aggregate_ingredients(["100 g chicken breast (grilled)"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "chicken breast");
        assert_eq!(items[0].grams, Some(100.0));
        assert_eq!(format_item(&items[0]), "100g chicken breast");
    }

    #[test]
    fn test_unit_normalization() {
        let items = aggregate_ingredients([
            "1 kg potatoes",
            "1 lb beef",
            "2 oz cheese",
            "3 tsp salt",
        ]);
        assert_eq!(items[0].grams, Some(1000.0));
        assert_eq!(items[1].grams, Some(454.0));
        assert_eq!(items[2].grams, Some(56.0));
        assert_eq!(items[3].grams, Some(15.0));
    }

    #[test]
    fn test_output_bands() {
        let small = AggregatedItem {
            name: "cumin".into(),
            grams: Some(10.0),
        };
        let medium = AggregatedItem {
            name: "rice".into(),
            grams: Some(480.0),
        };
        let large = AggregatedItem {
            name: "potatoes".into(),
            grams: Some(1500.0),
        };

        assert_eq!(format_item(&small), "cumin (small amount)");
        assert_eq!(format_item(&medium), "480g rice");
        assert_eq!(format_item(&large), "2kg potatoes");
    }

    #[test]
    fn test_unparsable_lines_pass_through() {
        let items = aggregate_ingredients(["salt to taste", "1 handful spinach", "salt to taste"]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].grams, None);
        assert_eq!(format_item(&items[0]), "(unspecified amount) salt to taste");
        // "handful" is not in the unit vocabulary
        assert_eq!(items[1].grams, None);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let lines = ["1 cup rice", "2 tbsp olive oil", "1 cup rice"];
        let first = aggregate_ingredients(lines);
        let second = aggregate_ingredients(lines);
        assert_eq!(first, second);
    }

    #[test]
    fn test_quantity_monotonicity() {
        let one = aggregate_ingredients(["1 cup rice"])[0].grams.unwrap();
        let two = aggregate_ingredients(["2 cups rice"])[0].grams.unwrap();
        let three = aggregate_ingredients(["3 cups rice"])[0].grams.unwrap();
        assert!(one < two && two < three);
    }

    #[test]
    fn test_case_insensitive_bucketing_keeps_first_seen_name() {
        let items = aggregate_ingredients(["1 cup Rice", "1 cup rice"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Rice");
        assert_eq!(items[0].grams, Some(480.0));
    }

    #[test]
    fn test_build_grocery_list_spans_meals_and_snacks() {
        let meals = vec![PlanEntry::new("breakfast", "Oatmeal")
            .with_ingredients(vec!["1 cup oats".into(), "1 cup milk".into()])];
        let snacks = vec![
            PlanEntry::new("snack", "Oat Bites").with_ingredients(vec!["1 cup oats".into()])
        ];

        let list = build_grocery_list(&meals, &snacks);
        assert_eq!(list[0], "480g oats");
        assert_eq!(list[1], "240g milk");
    }

    #[test]
    fn test_grocery_csv_format() {
        let items = vec![
            "480g rice".to_string(),
            "2kg potatoes, russet".to_string(),
        ];
        let csv = grocery_csv(&items);
        assert_eq!(csv, "item,checked\n480g rice,\n2kg potatoes russet,\n");
    }
}
