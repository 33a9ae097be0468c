use tauri::State;

use crate::db::repositories::{FeedbackRepository, HabitRepository, PlanRepository, SettingsRepository, SlotRepository, TaskRepository};
use crate::error::AppError;
use crate::models::plan::{PlanRecord, SessionStatusUpdateInput};
use crate::services::feedback_tuner::tune_settings;
use crate::services::ics_emitter::plan_to_ics;
use crate::services::planning_service::build_plan;

use super::{run_blocking, AppState, CommandResult};

const DEFAULT_PLAN_HISTORY_LIMIT: i64 = 10;

/// `GET /plan/latest` (spec.md §6): 200 latest plan, 404 if none exists yet.
#[tauri::command]
pub async fn plan_latest(state: State<'_, AppState>, owner_id: String) -> CommandResult<PlanRecord> {
    let db = state.inner().db();
    run_blocking(move || {
        db.with_connection(|conn| PlanRepository::get_latest(conn, &owner_id)?.ok_or_else(AppError::not_found))
    })
    .await
}

/// Recent plan history, newest first (SPEC_FULL.md §2 "Plan history").
#[tauri::command]
pub async fn plan_history(
    state: State<'_, AppState>,
    owner_id: String,
    limit: Option<i64>,
) -> CommandResult<Vec<PlanRecord>> {
    let db = state.inner().db();
    let limit = limit.unwrap_or(DEFAULT_PLAN_HISTORY_LIMIT).clamp(1, 100);
    run_blocking(move || db.with_connection(|conn| PlanRepository::list_recent(conn, &owner_id, limit))).await
}

/// `POST /plan/rebuild` (spec.md §6): runs the full planner pipeline
/// (C2-C9) against the owner's current tasks/habits/slots and persists the
/// result under the next `planVersion`. Rejects when the owner has neither
/// tasks nor slots, mirroring the HTTP layer's 400 (spec.md §7).
#[tauri::command]
pub async fn plan_rebuild(state: State<'_, AppState>, owner_id: String) -> CommandResult<PlanRecord> {
    let db = state.inner().db();
    let clock = state.inner().clock();
    run_blocking(move || {
        let tasks = db.with_connection(|conn| TaskRepository::list(conn, &owner_id))?;
        let slots = db.with_connection(|conn| SlotRepository::list(conn, &owner_id))?;
        if tasks.is_empty() && slots.is_empty() {
            return Err(AppError::validation(
                "cannot rebuild a plan with zero tasks and zero slots",
            ));
        }
        let habits = db.with_connection(|conn| HabitRepository::list(conn, &owner_id))?;
        let now_iso = chrono::Utc::now().to_rfc3339();
        let stored_settings =
            db.with_connection(|conn| SettingsRepository::get_or_default(conn, &owner_id, &now_iso))?;
        let feedback = db.with_connection(|conn| FeedbackRepository::list(conn, &owner_id))?;
        let effective_settings = tune_settings(&stored_settings, &feedback);

        let tz = crate::services::clock::parse_offset(&effective_settings.timezone);
        let now = clock.now(tz);

        db.with_connection_mut(|conn| {
            PlanRepository::save_with_next_version(conn, &owner_id, |previous_version| {
                build_plan(
                    now,
                    &owner_id,
                    tasks.clone(),
                    slots.clone(),
                    habits.clone(),
                    &effective_settings,
                    previous_version,
                )
            })
        })
    })
    .await
}

/// `PATCH /plan/sessions/{id}/status` (spec.md §6): 200 `{ok:true}` | 404.
#[tauri::command]
pub async fn plan_session_status_update(
    state: State<'_, AppState>,
    owner_id: String,
    session_id: String,
    payload: SessionStatusUpdateInput,
) -> CommandResult<bool> {
    let db = state.inner().db();
    run_blocking(move || {
        let updated = db.with_connection(|conn| {
            PlanRepository::update_session_status(conn, &owner_id, &session_id, payload.status)
        })?;
        if updated.is_some() {
            Ok(true)
        } else {
            Err(AppError::not_found())
        }
    })
    .await
}

/// `GET /plan/export/ics` (spec.md §6, §4.10): the `text/calendar` body the
/// HTTP layer wraps with `Content-Disposition: attachment`.
#[tauri::command]
pub async fn plan_export_ics(state: State<'_, AppState>, owner_id: String) -> CommandResult<String> {
    let db = state.inner().db();
    run_blocking(move || {
        let plan =
            db.with_connection(|conn| PlanRepository::get_latest(conn, &owner_id)?.ok_or_else(AppError::not_found))?;
        Ok(plan_to_ics(&plan))
    })
    .await
}
