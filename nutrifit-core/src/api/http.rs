//! HTTP implementation of [`NutritionApi`] over the fitness backend.
//!
//! Raw responses are optional-everywhere; `wire` holds the serde shapes
//! and the validation that turns them into the crate's snapshot types
//! with explicit fallbacks.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{
    Alternative, DayLog, MealLogRequest, NutritionApi, PlanCache, PlanSnapshot, SavePlanRequest,
    SwapApplyRequest, SwapOutcome, SwapSuggestRequest,
};
use crate::error::NutritionError;
use crate::models::{LoggedItem, MacroTotals, MealLogEntry, PlanEntry};

/// Fallback when the server omits a water goal.
pub const DEFAULT_WATER_GOAL_ML: u32 = 2000;

/// Initial plan loads drive a spinner; bound them.
const PLAN_LOAD_TIMEOUT: Duration = Duration::from_secs(10);
/// Deadline for mutating calls (save/swap/log).
const MUTATION_TIMEOUT: Duration = Duration::from_secs(20);

/// HTTP client for the nutrition endpoints.
pub struct HttpNutritionApi {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    cache: PlanCache,
}

impl HttpNutritionApi {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, cache: PlanCache) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            cache,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        deadline: Duration,
    ) -> Result<T, NutritionError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .bearer_auth(&self.api_key)
            .timeout(deadline)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, deadline))?;
        decode(response, deadline).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        deadline: Duration,
    ) -> Result<T, NutritionError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .timeout(deadline)
            .json(body)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, deadline))?;
        decode(response, deadline).await
    }
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    deadline: Duration,
) -> Result<T, NutritionError> {
    let status = response.status();
    if !status.is_success() {
        return Err(NutritionError::ServerStatus {
            status: status.as_u16(),
        });
    }
    response
        .json()
        .await
        .map_err(|e| map_reqwest_error(e, deadline))
}

fn map_reqwest_error(error: reqwest::Error, deadline: Duration) -> NutritionError {
    if error.is_timeout() {
        NutritionError::Timeout(deadline)
    } else {
        NutritionError::Network(error.to_string())
    }
}

#[async_trait]
impl NutritionApi for HttpNutritionApi {
    async fn fetch_plan(
        &self,
        date: NaiveDate,
        force: bool,
    ) -> Result<PlanSnapshot, NutritionError> {
        let key = date.to_string();
        if !force {
            if let Some(mut snapshot) = self.cache.get(&key) {
                debug!(date = %date, "plan served from local cache");
                snapshot.cached = true;
                return Ok(snapshot);
            }
        }

        let raw: wire::PlanResponse = self
            .get_json(
                "/plan",
                &[("date", key.clone()), ("force", force.to_string())],
                PLAN_LOAD_TIMEOUT,
            )
            .await?;
        let snapshot = raw.validate();
        debug!(
            date = %date,
            meals = snapshot.meals.len(),
            snacks = snapshot.snacks.len(),
            saved = snapshot.saved,
            "plan loaded"
        );
        self.cache.put(key, snapshot.clone());
        Ok(snapshot)
    }

    async fn save_plan(
        &self,
        date: NaiveDate,
        request: &SavePlanRequest,
    ) -> Result<PlanSnapshot, NutritionError> {
        let raw: wire::PlanResponse = self
            .post_json("/plan/save", request, MUTATION_TIMEOUT)
            .await?;
        let mut snapshot = raw.validate();
        // The save response mirrors the plan shape; it is saved by
        // definition even if the server omits the flag.
        snapshot.saved = true;
        self.cache.put(date.to_string(), snapshot.clone());
        Ok(snapshot)
    }

    async fn suggest_swaps(
        &self,
        request: &SwapSuggestRequest,
    ) -> Result<Vec<Alternative>, NutritionError> {
        let raw: wire::SwapSuggestResponse = self
            .post_json("/swap/suggest", request, MUTATION_TIMEOUT)
            .await?;
        Ok(raw.validate())
    }

    async fn apply_swap(&self, request: &SwapApplyRequest) -> Result<SwapOutcome, NutritionError> {
        let raw: wire::SwapApplyResponse = self
            .post_json("/swap/apply", request, MUTATION_TIMEOUT)
            .await?;
        // The plan changed server-side; cached snapshots are stale now.
        // The session holds the authoritative copy from this response.
        Ok(raw.validate())
    }

    async fn create_meal_log(
        &self,
        request: &MealLogRequest,
    ) -> Result<MealLogEntry, NutritionError> {
        let raw: wire::LogEntry = self.post_json("/meal-log", request, MUTATION_TIMEOUT).await?;
        Ok(raw.validate())
    }

    async fn fetch_day_log(&self, date: NaiveDate) -> Result<DayLog, NutritionError> {
        let raw: wire::DayLogResponse = self
            .get_json(
                "/meal-log",
                &[("date", date.to_string())],
                MUTATION_TIMEOUT,
            )
            .await?;
        Ok(raw.validate())
    }
}

/// Raw wire shapes and their one-time validation.
mod wire {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    pub struct PlanResponse {
        pub plan: Option<Vec<Entry>>,
        pub snacks: Option<Vec<Entry>>,
        pub suggestions: Option<Vec<String>>,
        pub water_goal_ml: Option<u32>,
        pub plan_macros: Option<Macros>,
        pub grocery_list: Option<Vec<String>>,
        pub cached: Option<bool>,
        pub saved: Option<bool>,
    }

    impl PlanResponse {
        pub fn validate(self) -> PlanSnapshot {
            let water_goal_ml = self.water_goal_ml.unwrap_or_else(|| {
                warn!("plan response missing water goal, using default");
                DEFAULT_WATER_GOAL_ML
            });
            PlanSnapshot {
                meals: validate_entries(self.plan, "meal"),
                snacks: validate_entries(self.snacks, "snack"),
                suggestions: self.suggestions.unwrap_or_default(),
                water_goal_ml,
                macros: self.plan_macros.map(Macros::validate).unwrap_or_default(),
                grocery_list: self.grocery_list.unwrap_or_default(),
                cached: self.cached.unwrap_or(false),
                saved: self.saved.unwrap_or(false),
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct Entry {
        pub meal_type: Option<String>,
        pub title: Option<String>,
        pub calories: Option<f64>,
        pub protein_g: Option<f64>,
        pub carbs_g: Option<f64>,
        pub fats_g: Option<f64>,
        pub ingredients: Option<Vec<String>>,
        pub steps: Option<Vec<String>>,
    }

    impl Entry {
        /// Entries without a title are unusable and dropped; every other
        /// field has a named fallback.
        pub fn validate(self, fallback_meal_type: &str) -> Option<PlanEntry> {
            let title = self.title.filter(|t| !t.trim().is_empty())?;
            let meal_type = self
                .meal_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| fallback_meal_type.to_string());
            Some(
                PlanEntry::new(meal_type, title)
                    .with_macros(
                        self.calories.unwrap_or(0.0),
                        self.protein_g.unwrap_or(0.0),
                        self.carbs_g.unwrap_or(0.0),
                        self.fats_g.unwrap_or(0.0),
                    )
                    .with_ingredients(self.ingredients.unwrap_or_default())
                    .with_steps(self.steps.unwrap_or_default()),
            )
        }
    }

    fn validate_entries(entries: Option<Vec<Entry>>, fallback_meal_type: &str) -> Vec<PlanEntry> {
        entries
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| entry.validate(fallback_meal_type))
            .collect()
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct Macros {
        pub calories: Option<f64>,
        pub protein_g: Option<f64>,
        pub carbs_g: Option<f64>,
        pub fats_g: Option<f64>,
    }

    impl Macros {
        pub fn validate(self) -> MacroTotals {
            MacroTotals::new(
                self.calories.unwrap_or(0.0),
                self.protein_g.unwrap_or(0.0),
                self.carbs_g.unwrap_or(0.0),
                self.fats_g.unwrap_or(0.0),
            )
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct SwapSuggestResponse {
        pub alternatives: Option<Vec<RawAlternative>>,
    }

    impl SwapSuggestResponse {
        pub fn validate(self) -> Vec<Alternative> {
            self.alternatives
                .unwrap_or_default()
                .into_iter()
                .filter_map(RawAlternative::validate)
                .collect()
        }
    }

    /// Alternatives arrive either as bare titles or detailed objects.
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub enum RawAlternative {
        Detailed(Entry),
        Title(String),
    }

    impl RawAlternative {
        pub fn validate(self) -> Option<Alternative> {
            match self {
                RawAlternative::Detailed(entry) => {
                    entry.validate("meal").map(Alternative::detailed)
                }
                RawAlternative::Title(title) if !title.trim().is_empty() => {
                    Some(Alternative::title_only(title))
                }
                RawAlternative::Title(_) => None,
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct SwapApplyResponse {
        pub plan: Option<Vec<Entry>>,
        pub snacks: Option<Vec<Entry>>,
        pub saved: Option<bool>,
        pub plan_macros: Option<Macros>,
        pub grocery_list: Option<Vec<String>>,
        pub water_goal_ml: Option<u32>,
    }

    impl SwapApplyResponse {
        pub fn validate(self) -> SwapOutcome {
            SwapOutcome {
                meals: validate_entries(self.plan, "meal"),
                snacks: validate_entries(self.snacks, "snack"),
                saved: self.saved.unwrap_or(false),
                macros: self.plan_macros.map(Macros::validate).unwrap_or_default(),
                grocery_list: self.grocery_list.unwrap_or_default(),
                water_goal_ml: self.water_goal_ml.unwrap_or(DEFAULT_WATER_GOAL_ML),
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct LogEntry {
        pub id: Option<Uuid>,
        pub meal_type: Option<String>,
        pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
        pub items: Option<Vec<LogItem>>,
        pub notes: Option<String>,
    }

    impl LogEntry {
        pub fn validate(self) -> MealLogEntry {
            let mut entry = MealLogEntry::new(
                self.meal_type
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| "meal".to_string()),
            )
            .with_items(
                self.items
                    .unwrap_or_default()
                    .into_iter()
                    .map(LogItem::validate)
                    .collect(),
            );
            if let Some(id) = self.id {
                entry.id = id;
            }
            if let Some(timestamp) = self.timestamp {
                entry.timestamp = timestamp;
            }
            entry.notes = self.notes.filter(|n| !n.trim().is_empty());
            entry
        }
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct LogItem {
        pub name: Option<String>,
        pub calories: Option<f64>,
        pub protein_g: Option<f64>,
        pub carbs_g: Option<f64>,
        pub fats_g: Option<f64>,
    }

    impl LogItem {
        pub fn validate(self) -> LoggedItem {
            LoggedItem::new(
                self.name.unwrap_or_else(|| "(unnamed)".to_string()),
                self.calories.unwrap_or(0.0),
            )
            .with_macros(
                self.protein_g.unwrap_or(0.0),
                self.carbs_g.unwrap_or(0.0),
                self.fats_g.unwrap_or(0.0),
            )
        }
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct DayLogResponse {
        pub logs: Option<Vec<LogEntry>>,
        pub totals: Option<Macros>,
        pub water_ml: Option<u32>,
    }

    impl DayLogResponse {
        pub fn validate(self) -> DayLog {
            DayLog {
                entries: self
                    .logs
                    .unwrap_or_default()
                    .into_iter()
                    .map(LogEntry::validate)
                    .collect(),
                totals: self.totals.map(Macros::validate).unwrap_or_default(),
                water_ml: self.water_ml.unwrap_or(0),
            }
        }
    }
}
