//! Meal logging: turning a resolved slot into a persisted log entry.
//!
//! The flow is optimistic: a temporary entry appears in the local
//! collection before the create call resolves, and a reconciliation
//! fetch afterwards replaces the local picture with server truth. The
//! reconciliation is the only rollback mechanism - a failed confirmation
//! is corrected by replacement, never by manually removing the entry.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::MealLogRequest;
use crate::error::NutritionError;
use crate::models::{MealLogEntry, PlanEntry, SlotCategory};
use crate::session::{NutritionEvent, PlanSession};
use crate::swap::meal_type_matches;

/// Resolve which planned entry a log action refers to.
///
/// A supplied in-range index into the category's own array wins - for
/// snacks this is the only unambiguous identity. The fallback is the
/// first case-insensitive meal-type match across meals and snacks
/// combined.
fn resolve_log_entry<'a>(
    meals: &'a [PlanEntry],
    snacks: &'a [PlanEntry],
    meal_type: &str,
    slot_index: Option<usize>,
) -> Result<&'a PlanEntry, NutritionError> {
    let source = match SlotCategory::of(meal_type) {
        SlotCategory::Meal => meals,
        SlotCategory::Snack => snacks,
    };

    if let Some(entry) = slot_index.and_then(|index| source.get(index)) {
        return Ok(entry);
    }

    meals
        .iter()
        .chain(snacks.iter())
        .find(|entry| meal_type_matches(&entry.meal_type, meal_type))
        .ok_or_else(|| {
            NutritionError::validation(format!("No planned entry matches '{}'.", meal_type))
        })
}

impl PlanSession {
    /// Log the planned content of a slot as eaten.
    ///
    /// Blocks locally (no network call, no state change) unless the plan
    /// is saved and non-empty. On success returns the id of the
    /// reconciled entry; on confirmation failure the error is returned
    /// after the reconciliation pass has restored server truth.
    pub async fn log_meal(
        &self,
        meal_type: &str,
        slot_index: Option<usize>,
    ) -> Result<Uuid, NutritionError> {
        let _guard = self.ops.lock().await;

        // Validation and the optimistic insert happen before any
        // network traffic.
        let (temp_id, request) = {
            let mut day = self.lock_state();
            day.lifecycle.ensure_can_log()?;
            if day.plan_is_empty() {
                return Err(NutritionError::validation(
                    "No planned meals available to log.",
                ));
            }

            let entry = resolve_log_entry(&day.meals, &day.snacks, meal_type, slot_index)?;
            let optimistic = MealLogEntry::from_plan_entry(entry);
            let request = MealLogRequest {
                meal_type: optimistic.meal_type.clone(),
                timestamp: optimistic.timestamp,
                items: optimistic.items.clone(),
                notes: None,
            };
            let temp_id = optimistic.id;
            day.logged.push(optimistic);
            (temp_id, request)
        };
        debug!(meal_type, ?slot_index, %temp_id, "optimistic log entry inserted");

        // Confirmation, then reconciliation regardless of its outcome.
        let created = self.api.create_meal_log(&request).await;
        if let Err(e) = self.reconcile_day().await {
            // Server truth is unreachable; the optimistic entry stays
            // until the next successful refresh replaces it.
            warn!(error = %e, "reconciliation after meal log failed");
        }
        self.emit(NutritionEvent::MealLogged { date: self.date() });

        match created {
            Ok(entry) => Ok(entry.id),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::PlanState;
    use crate::models::NutritionProfile;
    use crate::testing::{snapshot_with, MockApi};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn session(api: Arc<MockApi>) -> PlanSession {
        PlanSession::new(
            api,
            NutritionProfile::default().with_targets(2, 2),
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        )
    }

    #[test]
    fn test_resolve_prefers_index_for_snacks() {
        let meals = vec![PlanEntry::new("breakfast", "Oatmeal")];
        let snacks = vec![
            PlanEntry::new("snack", "Apple"),
            PlanEntry::new("snack", "Yogurt"),
        ];

        let entry = resolve_log_entry(&meals, &snacks, "Snack", Some(1)).unwrap();
        assert_eq!(entry.title, "Yogurt");
    }

    #[test]
    fn test_resolve_falls_back_across_both_arrays() {
        let meals = vec![PlanEntry::new("breakfast", "Oatmeal")];
        let snacks = vec![PlanEntry::new("afternoon_snack", "Apple")];

        let entry = resolve_log_entry(&meals, &snacks, "Afternoon Snack", None).unwrap();
        assert_eq!(entry.title, "Apple");

        assert!(resolve_log_entry(&meals, &snacks, "dinner", None).is_err());
    }

    #[tokio::test]
    async fn test_log_blocked_before_save() {
        let api = Arc::new(MockApi::new(snapshot_with(false)));
        let session = session(api.clone());
        session.refresh(false).await.unwrap();
        assert_eq!(session.plan_state(), PlanState::Generated);

        let err = session.log_meal("breakfast", Some(0)).await.unwrap_err();
        assert!(err.is_validation());
        // Zero side effects: nothing logged, no network call made.
        assert!(session.logged_meals().is_empty());
        assert_eq!(api.call_count("create_meal_log"), 0);
        assert_eq!(api.call_count("fetch_day_log"), 1); // the refresh only
    }

    #[tokio::test]
    async fn test_log_happy_path_reconciles() {
        let api = Arc::new(MockApi::new(snapshot_with(true)));
        let session = session(api.clone());
        session.refresh(false).await.unwrap();

        session.log_meal("breakfast", Some(0)).await.unwrap();

        assert_eq!(api.call_count("create_meal_log"), 1);
        // The reconciliation fetch replaced the optimistic entry with
        // server truth (the mock echoes created entries back).
        let logged = session.logged_meals();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].title(), Some("Oatmeal"));

        let slots = session.slots();
        assert!(slots.meals[0].logged);
    }

    #[tokio::test]
    async fn test_log_emits_meal_logged() {
        let api = Arc::new(MockApi::new(snapshot_with(true)));
        let session = session(api);
        session.refresh(false).await.unwrap();
        let mut events = session.subscribe();

        session.log_meal("breakfast", Some(0)).await.unwrap();

        let seen: Vec<_> = std::iter::from_fn(|| events.try_recv().ok()).collect();
        assert!(seen
            .iter()
            .any(|event| matches!(event, NutritionEvent::MealLogged { .. })));
    }

    #[tokio::test]
    async fn test_failed_confirmation_rolls_back_via_reconciliation() {
        let api = Arc::new(MockApi::new(snapshot_with(true)));
        api.fail_next("create_meal_log");
        let session = session(api.clone());
        session.refresh(false).await.unwrap();

        let err = session.log_meal("breakfast", Some(0)).await.unwrap_err();
        assert!(!err.is_validation());

        // The reconciliation pass replaced the optimistic entry with the
        // server's (empty) truth rather than manually removing it.
        assert!(session.logged_meals().is_empty());
        assert_eq!(api.call_count("fetch_day_log"), 2);
    }

    #[tokio::test]
    async fn test_log_snack_by_position() {
        let api = Arc::new(MockApi::new(snapshot_with(true)));
        let session = session(api.clone());
        session.refresh(false).await.unwrap();

        session.log_meal("Snack", Some(1)).await.unwrap();

        let logged = session.logged_meals();
        assert_eq!(logged.len(), 1);
        // Slot index 1 of the snacks array, not the first "Snack" label.
        assert_eq!(logged[0].title(), Some("Yogurt"));
    }
}
