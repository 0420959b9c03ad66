//! The per-day plan session: authoritative local state plus the
//! operations that mutate it.
//!
//! Every mutating operation (refresh, save, swap apply, meal log) runs
//! through a single async gate, so a save and a swap can never race and
//! the last response can never silently overwrite a newer one. Snapshot
//! state sits behind a short-held sync lock that is never held across an
//! await.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use tokio::sync::broadcast;
use tracing::debug;

use crate::api::{DayLog, NutritionApi, PlanSnapshot, SavePlanRequest, SwapOutcome};
use crate::error::NutritionError;
use crate::grocery::build_grocery_list;
use crate::lifecycle::{PlanLifecycle, PlanState};
use crate::models::{MacroTotals, MealLogEntry, NutritionProfile, PlanEntry};
use crate::slots::{resolve_slots, DaySlots};

/// Notifications for observers outside the nutrition screen (dashboards,
/// progress views).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NutritionEvent {
    /// The plan, macros, grocery list, or water goal changed.
    PlanUpdated { date: NaiveDate },
    /// A meal-log attempt completed and the day was reconciled.
    MealLogged { date: NaiveDate },
}

#[derive(Debug, Default)]
pub(crate) struct DayState {
    pub lifecycle: PlanLifecycle,
    pub meals: Vec<PlanEntry>,
    pub snacks: Vec<PlanEntry>,
    pub suggestions: Vec<String>,
    pub plan_macros: MacroTotals,
    pub water_goal_ml: u32,
    pub grocery: Vec<String>,
    pub logged: Vec<MealLogEntry>,
    pub day_totals: MacroTotals,
    pub water_ml: u32,
}

impl DayState {
    pub fn plan_is_empty(&self) -> bool {
        self.meals.is_empty() && self.snacks.is_empty()
    }

    /// Replace plan-side state from a server snapshot. The server's
    /// grocery list wins; when it is absent the list is recomputed from
    /// the plan so it never goes stale.
    pub fn apply_snapshot(&mut self, snapshot: PlanSnapshot) {
        let empty = snapshot.is_empty();
        self.lifecycle.apply_refresh(snapshot.saved, empty);
        self.grocery = if snapshot.grocery_list.is_empty() && !empty {
            build_grocery_list(&snapshot.meals, &snapshot.snacks)
        } else {
            snapshot.grocery_list
        };
        self.meals = snapshot.meals;
        self.snacks = snapshot.snacks;
        self.suggestions = snapshot.suggestions;
        self.plan_macros = snapshot.macros;
        self.water_goal_ml = snapshot.water_goal_ml;
    }

    /// Replace plan-side state from a swap response.
    pub fn apply_swap_outcome(&mut self, outcome: SwapOutcome) {
        self.lifecycle.apply_swap(outcome.saved);
        self.grocery = if outcome.grocery_list.is_empty() {
            build_grocery_list(&outcome.meals, &outcome.snacks)
        } else {
            outcome.grocery_list
        };
        self.meals = outcome.meals;
        self.snacks = outcome.snacks;
        self.plan_macros = outcome.macros;
        self.water_goal_ml = outcome.water_goal_ml;
    }

    /// Replace logged-side state from the authoritative day log.
    pub fn apply_day_log(&mut self, day_log: DayLog) {
        self.logged = day_log.entries;
        self.logged.sort_by_key(|entry| entry.timestamp);
        self.day_totals = day_log.totals;
        self.water_ml = day_log.water_ml;
    }
}

/// One user's nutrition state for one day.
pub struct PlanSession {
    pub(crate) api: Arc<dyn NutritionApi>,
    profile: NutritionProfile,
    date: NaiveDate,
    /// Serializes mutating operations; one session is one plan identity.
    pub(crate) ops: tokio::sync::Mutex<()>,
    pub(crate) state: Mutex<DayState>,
    events: broadcast::Sender<NutritionEvent>,
}

impl PlanSession {
    pub fn new(api: Arc<dyn NutritionApi>, profile: NutritionProfile, date: NaiveDate) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            api,
            profile,
            date,
            ops: tokio::sync::Mutex::new(()),
            state: Mutex::new(DayState::default()),
            events,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn profile(&self) -> &NutritionProfile {
        &self.profile
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NutritionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: NutritionEvent) {
        // Nobody listening is fine; the send result only reports that.
        let _ = self.events.send(event);
    }

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, DayState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn plan_state(&self) -> PlanState {
        self.lock_state().lifecycle.state()
    }

    pub fn plan_is_empty(&self) -> bool {
        self.lock_state().plan_is_empty()
    }

    /// Rebuild the display slots from current state. Derived data;
    /// recomputed on every call, never cached.
    pub fn slots(&self) -> DaySlots {
        let day = self.lock_state();
        resolve_slots(&self.profile, &day.logged, &day.meals, &day.snacks)
    }

    pub fn plan_macros(&self) -> MacroTotals {
        self.lock_state().plan_macros
    }

    pub fn day_totals(&self) -> MacroTotals {
        self.lock_state().day_totals
    }

    pub fn water_goal_ml(&self) -> u32 {
        self.lock_state().water_goal_ml
    }

    pub fn water_ml(&self) -> u32 {
        self.lock_state().water_ml
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.lock_state().suggestions.clone()
    }

    pub fn grocery_list(&self) -> Vec<String> {
        self.lock_state().grocery.clone()
    }

    pub fn logged_meals(&self) -> Vec<MealLogEntry> {
        self.lock_state().logged.clone()
    }

    /// Load or reload the day: plan first, then the authoritative logged
    /// picture. Either both replace local state or neither does.
    pub async fn refresh(&self, force: bool) -> Result<PlanState, NutritionError> {
        let _guard = self.ops.lock().await;
        let snapshot = self.api.fetch_plan(self.date, force).await?;
        let day_log = self.api.fetch_day_log(self.date).await?;

        let state = {
            let mut day = self.lock_state();
            day.apply_snapshot(snapshot);
            day.apply_day_log(day_log);
            day.lifecycle.state()
        };
        debug!(date = %self.date, state = %state, "day refreshed");
        self.emit(NutritionEvent::PlanUpdated { date: self.date });
        Ok(state)
    }

    /// Regenerate the plan: a forced refresh. The regenerated content is
    /// unconfirmed, so a previously saved plan comes back `generated`
    /// unless the server marks it saved.
    pub async fn regenerate(&self) -> Result<PlanState, NutritionError> {
        self.refresh(true).await
    }

    /// Persist the current plan. Legal only from `generated`, with a
    /// non-empty plan; on failure local state is untouched.
    pub async fn save(&self) -> Result<PlanState, NutritionError> {
        let _guard = self.ops.lock().await;

        let request = {
            let day = self.lock_state();
            day.lifecycle.ensure_can_save()?;
            if day.plan_is_empty() {
                return Err(NutritionError::validation("Cannot save an empty plan."));
            }
            SavePlanRequest {
                plan: day.meals.clone(),
                snacks: day.snacks.clone(),
                grocery_list: day.grocery.clone(),
                suggestions: day.suggestions.clone(),
                plan_macros: day.plan_macros,
            }
        };

        let snapshot = self.api.save_plan(self.date, &request).await?;

        let state = {
            let mut day = self.lock_state();
            day.apply_snapshot(snapshot);
            day.lifecycle.complete_save();
            day.lifecycle.state()
        };
        debug!(date = %self.date, "plan saved");
        self.emit(NutritionEvent::PlanUpdated { date: self.date });
        Ok(state)
    }

    /// Render the grocery list as CSV. Export is gated the same way as
    /// logging: the plan must be saved.
    pub fn export_grocery_csv(&self) -> Result<String, NutritionError> {
        let day = self.lock_state();
        day.lifecycle.ensure_can_log()?;
        Ok(crate::grocery::grocery_csv(&day.grocery))
    }

    /// Re-fetch the authoritative day log and replace the local copy.
    /// This is the only rollback mechanism after an optimistic insert.
    pub(crate) async fn reconcile_day(&self) -> Result<(), NutritionError> {
        let day_log = self.api.fetch_day_log(self.date).await?;
        let mut day = self.lock_state();
        day.apply_day_log(day_log);
        Ok(())
    }
}
