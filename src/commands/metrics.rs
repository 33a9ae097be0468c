use tauri::State;

use crate::db::repositories::{PlanRepository, SettingsRepository, SlotRepository, TaskRepository};
use crate::error::AppError;
use crate::services::metrics_service::{compute_metrics, compute_range, MetricsRange, PlanMetrics};

use super::{run_blocking, AppState, CommandResult};

/// `GET /metrics/plan?range=day|week|month&date=YYYY-MM-DD` (spec.md §6,
/// §4.11). `date` anchors the range and defaults to today in the owner's
/// timezone.
#[tauri::command]
pub async fn metrics_plan(
    state: State<'_, AppState>,
    owner_id: String,
    range: MetricsRange,
    date: Option<String>,
) -> CommandResult<PlanMetrics> {
    let db = state.inner().db();
    let clock = state.inner().clock();
    run_blocking(move || {
        let now_iso = chrono::Utc::now().to_rfc3339();
        let settings =
            db.with_connection(|conn| SettingsRepository::get_or_default(conn, &owner_id, &now_iso))?;
        let tz = crate::services::clock::parse_offset(&settings.timezone);

        let anchor = match date {
            Some(ref raw) => chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|err| AppError::validation(format!("invalid date '{raw}': {err}")))?,
            None => clock.now(tz).date_naive(),
        };
        let (range_start, range_end) = compute_range(range, anchor);

        let plan = db.with_connection(|conn| PlanRepository::get_latest(conn, &owner_id))?;
        let tasks = db.with_connection(|conn| TaskRepository::list(conn, &owner_id))?;
        let slots = db.with_connection(|conn| SlotRepository::list(conn, &owner_id))?;

        Ok(compute_metrics(
            plan.as_ref(),
            &settings,
            &slots,
            &tasks,
            range,
            &range_start.format("%Y-%m-%d").to_string(),
            &range_end.format("%Y-%m-%d").to_string(),
        ))
    })
    .await
}
