//! In-memory [`NutritionApi`] for exercising the coordinators without a
//! network. Records every call so tests can assert that blocked actions
//! never reach the service.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::api::{
    Alternative, DayLog, MealLogRequest, NutritionApi, PlanSnapshot, SavePlanRequest,
    SwapApplyRequest, SwapOutcome, SwapSuggestRequest,
};
use crate::error::NutritionError;
use crate::models::{MacroTotals, MealLogEntry, PlanEntry};

/// A representative day plan: two meals, two identically labeled snacks.
pub(crate) fn snapshot_with(saved: bool) -> PlanSnapshot {
    PlanSnapshot {
        meals: vec![
            PlanEntry::new("breakfast", "Oatmeal")
                .with_macros(350.0, 12.0, 60.0, 8.0)
                .with_ingredients(vec!["1 cup oats".into(), "1 cup milk".into()]),
            PlanEntry::new("lunch", "Chicken Salad")
                .with_macros(520.0, 42.0, 30.0, 24.0)
                .with_ingredients(vec!["100 g chicken breast (grilled)".into()]),
        ],
        snacks: vec![
            PlanEntry::new("snack", "Apple").with_macros(95.0, 0.5, 25.0, 0.3),
            PlanEntry::new("snack", "Yogurt").with_macros(150.0, 12.0, 18.0, 4.0),
        ],
        suggestions: vec!["Front-load protein earlier in the day.".into()],
        water_goal_ml: 2500,
        macros: MacroTotals::new(1115.0, 66.5, 133.0, 36.3),
        grocery_list: vec!["480g oats".into(), "100g chicken breast".into()],
        cached: false,
        saved,
    }
}

pub(crate) struct MockApi {
    plan: Mutex<PlanSnapshot>,
    alternatives: Mutex<Vec<Alternative>>,
    swap_outcome: Mutex<Option<SwapOutcome>>,
    server_logs: Mutex<Vec<MealLogEntry>>,
    fail_once: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<&'static str>>,
}

impl MockApi {
    pub fn new(plan: PlanSnapshot) -> Self {
        Self {
            plan: Mutex::new(plan),
            alternatives: Mutex::new(vec![Alternative::title_only("Shakshuka")]),
            swap_outcome: Mutex::new(None),
            server_logs: Mutex::new(Vec::new()),
            fail_once: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_plan(&self, plan: PlanSnapshot) {
        *self.plan.lock().unwrap() = plan;
    }

    pub fn set_alternatives(&self, alternatives: Vec<Alternative>) {
        *self.alternatives.lock().unwrap() = alternatives;
    }

    pub fn set_swap_outcome(&self, outcome: SwapOutcome) {
        *self.swap_outcome.lock().unwrap() = Some(outcome);
    }

    /// Make the next call to `endpoint` fail with a network error.
    pub fn fail_next(&self, endpoint: &'static str) {
        self.fail_once.lock().unwrap().insert(endpoint);
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|name| **name == endpoint)
            .count()
    }

    fn enter(&self, endpoint: &'static str) -> Result<(), NutritionError> {
        self.calls.lock().unwrap().push(endpoint);
        if self.fail_once.lock().unwrap().remove(endpoint) {
            return Err(NutritionError::Network("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl NutritionApi for MockApi {
    async fn fetch_plan(
        &self,
        _date: NaiveDate,
        _force: bool,
    ) -> Result<PlanSnapshot, NutritionError> {
        self.enter("fetch_plan")?;
        Ok(self.plan.lock().unwrap().clone())
    }

    async fn save_plan(
        &self,
        _date: NaiveDate,
        request: &SavePlanRequest,
    ) -> Result<PlanSnapshot, NutritionError> {
        self.enter("save_plan")?;
        let mut snapshot = self.plan.lock().unwrap().clone();
        snapshot.meals = request.plan.clone();
        snapshot.snacks = request.snacks.clone();
        snapshot.grocery_list = request.grocery_list.clone();
        snapshot.saved = true;
        Ok(snapshot)
    }

    async fn suggest_swaps(
        &self,
        _request: &SwapSuggestRequest,
    ) -> Result<Vec<Alternative>, NutritionError> {
        self.enter("suggest_swaps")?;
        Ok(self.alternatives.lock().unwrap().clone())
    }

    async fn apply_swap(&self, _request: &SwapApplyRequest) -> Result<SwapOutcome, NutritionError> {
        self.enter("apply_swap")?;
        if let Some(outcome) = self.swap_outcome.lock().unwrap().clone() {
            return Ok(outcome);
        }
        let plan = self.plan.lock().unwrap().clone();
        Ok(SwapOutcome {
            meals: plan.meals,
            snacks: plan.snacks,
            saved: plan.saved,
            macros: plan.macros,
            grocery_list: plan.grocery_list,
            water_goal_ml: plan.water_goal_ml,
        })
    }

    async fn create_meal_log(
        &self,
        request: &MealLogRequest,
    ) -> Result<MealLogEntry, NutritionError> {
        self.enter("create_meal_log")?;
        let mut entry = MealLogEntry::new(request.meal_type.clone())
            .with_items(request.items.clone());
        entry.id = Uuid::new_v4();
        entry.timestamp = request.timestamp;
        self.server_logs.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn fetch_day_log(&self, _date: NaiveDate) -> Result<DayLog, NutritionError> {
        self.enter("fetch_day_log")?;
        let entries = self.server_logs.lock().unwrap().clone();
        let totals = entries.iter().fold(MacroTotals::default(), |mut acc, e| {
            acc.calories += e.calories();
            acc
        });
        Ok(DayLog {
            entries,
            totals,
            water_ml: 0,
        })
    }
}
