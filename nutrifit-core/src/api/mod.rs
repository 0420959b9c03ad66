//! The remote nutrition service, behind a trait seam.
//!
//! The wire shapes the server speaks are optional-everywhere; they are
//! validated once, here at the boundary, into the fully populated types
//! below. Code past this module never re-checks for missing fields.

mod cache;
mod http;

pub use cache::PlanCache;
pub use http::{HttpNutritionApi, DEFAULT_WATER_GOAL_ML};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NutritionError;
use crate::models::{LoggedItem, MacroTotals, MealLogEntry, PlanEntry};

/// The day's plan as the server last reported it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub meals: Vec<PlanEntry>,
    pub snacks: Vec<PlanEntry>,
    pub suggestions: Vec<String>,
    pub water_goal_ml: u32,
    pub macros: MacroTotals,
    pub grocery_list: Vec<String>,
    /// True when this snapshot was served from a cache rather than
    /// freshly generated.
    pub cached: bool,
    /// True when the user has persisted this plan.
    pub saved: bool,
}

impl PlanSnapshot {
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty() && self.snacks.is_empty()
    }
}

/// Body for `POST plan/save`.
#[derive(Debug, Clone, Serialize)]
pub struct SavePlanRequest {
    pub plan: Vec<PlanEntry>,
    pub snacks: Vec<PlanEntry>,
    pub grocery_list: Vec<String>,
    pub suggestions: Vec<String>,
    pub plan_macros: MacroTotals,
}

/// Body for `POST swap/suggest`.
#[derive(Debug, Clone, Serialize)]
pub struct SwapSuggestRequest {
    pub meal_type: String,
    pub current_title: String,
    pub alternatives_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_calories: Option<f64>,
    pub slot_index: usize,
    pub is_snack: bool,
}

/// One suggested alternative. The server sends either a bare title string
/// or a detailed object with macros and ingredients; both carry a title.
#[derive(Debug, Clone, PartialEq)]
pub struct Alternative {
    pub title: String,
    pub details: Option<PlanEntry>,
}

impl Alternative {
    pub fn title_only(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            details: None,
        }
    }

    pub fn detailed(entry: PlanEntry) -> Self {
        Self {
            title: entry.title.clone(),
            details: Some(entry),
        }
    }
}

/// The `swap_in` payload for `POST swap/apply`: the detailed alternative
/// when we have it, otherwise a minimal `{title}` wrapper.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SwapIn {
    Detailed(PlanEntry),
    Minimal { title: String },
}

impl From<&Alternative> for SwapIn {
    fn from(alternative: &Alternative) -> Self {
        match &alternative.details {
            Some(entry) => SwapIn::Detailed(entry.clone()),
            None => SwapIn::Minimal {
                title: alternative.title.clone(),
            },
        }
    }
}

/// Body for `POST swap/apply`.
#[derive(Debug, Clone, Serialize)]
pub struct SwapApplyRequest {
    pub meal_type: String,
    pub current_title: String,
    pub swap_in: SwapIn,
    pub slot_index: usize,
    pub is_snack: bool,
}

/// Response of `POST swap/apply`: full replacement state, never a patch.
#[derive(Debug, Clone)]
pub struct SwapOutcome {
    pub meals: Vec<PlanEntry>,
    pub snacks: Vec<PlanEntry>,
    pub saved: bool,
    pub macros: MacroTotals,
    pub grocery_list: Vec<String>,
    pub water_goal_ml: u32,
}

/// Body for `POST meal-log`.
#[derive(Debug, Clone, Serialize)]
pub struct MealLogRequest {
    pub meal_type: String,
    pub timestamp: DateTime<Utc>,
    pub items: Vec<LoggedItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The authoritative logged-meals picture for one day, fetched during
/// reconciliation.
#[derive(Debug, Clone, Default)]
pub struct DayLog {
    pub entries: Vec<MealLogEntry>,
    pub totals: MacroTotals,
    pub water_ml: u32,
}

/// The remote nutrition service.
///
/// Object-safe so sessions can hold `Arc<dyn NutritionApi>` and tests can
/// substitute an in-memory implementation.
#[async_trait]
pub trait NutritionApi: Send + Sync {
    /// Load or regenerate the plan for a day. `force` skips caches and
    /// asks the agent for fresh content.
    async fn fetch_plan(&self, date: NaiveDate, force: bool)
        -> Result<PlanSnapshot, NutritionError>;

    /// Persist the plan. The response mirrors the plan shape with a
    /// server-recomputed water goal.
    async fn save_plan(
        &self,
        date: NaiveDate,
        request: &SavePlanRequest,
    ) -> Result<PlanSnapshot, NutritionError>;

    /// Ask for up to `alternatives_count` swap alternatives.
    async fn suggest_swaps(
        &self,
        request: &SwapSuggestRequest,
    ) -> Result<Vec<Alternative>, NutritionError>;

    /// Apply a swap; the response replaces the whole plan.
    async fn apply_swap(&self, request: &SwapApplyRequest) -> Result<SwapOutcome, NutritionError>;

    /// Create a meal log entry.
    async fn create_meal_log(
        &self,
        request: &MealLogRequest,
    ) -> Result<MealLogEntry, NutritionError>;

    /// Fetch the authoritative logged-meals list and totals for a day.
    async fn fetch_day_log(&self, date: NaiveDate) -> Result<DayLog, NutritionError>;
}
