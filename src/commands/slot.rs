use chrono::Utc;
use tauri::State;
use uuid::Uuid;

use crate::db::repositories::SlotRepository;
use crate::error::{AppError, AppResult};
use crate::models::slot::{FreeSlot, FreeSlotCreateInput};
use crate::services::time_util::parse_hhmm;

use super::{run_blocking, AppState, CommandResult};

#[tauri::command]
pub async fn slots_list(state: State<'_, AppState>, owner_id: String) -> CommandResult<Vec<FreeSlot>> {
    let db = state.inner().db();
    run_blocking(move || db.with_connection(|conn| SlotRepository::list(conn, &owner_id))).await
}

#[tauri::command]
pub async fn slots_create(
    state: State<'_, AppState>,
    owner_id: String,
    payload: FreeSlotCreateInput,
) -> CommandResult<FreeSlot> {
    let db = state.inner().db();
    run_blocking(move || {
        let slot = build_slot(owner_id, payload)?;
        db.with_connection(|conn| {
            SlotRepository::upsert(conn, &slot)?;
            Ok(slot)
        })
    })
    .await
}

#[tauri::command]
pub async fn slots_delete(
    state: State<'_, AppState>,
    owner_id: String,
    id: String,
) -> CommandResult<()> {
    let db = state.inner().db();
    run_blocking(move || db.with_connection(|conn| SlotRepository::delete(conn, &owner_id, &id))).await
}

/// Builds a `FreeSlot` with `capacityMinutes` recomputed from `startTime`/
/// `endTime` on write (spec.md §3 FreeSlot invariants). Rejects inverted
/// hours at the boundary rather than letting the planner's slot cleaner
/// silently drop them (spec.md §7 "input validation").
fn build_slot(owner_id: String, input: FreeSlotCreateInput) -> AppResult<FreeSlot> {
    if input.weekday > 6 {
        return Err(AppError::validation("weekday must be 0-6"));
    }
    let (Some(start), Some(end)) = (parse_hhmm(&input.start_time), parse_hhmm(&input.end_time)) else {
        return Err(AppError::validation("startTime/endTime must be HH:MM"));
    };
    if end <= start {
        return Err(AppError::validation("endTime must be after startTime"));
    }
    let mut slot = FreeSlot {
        id: Uuid::new_v4().to_string(),
        owner_id,
        weekday: input.weekday,
        start_time: input.start_time,
        end_time: input.end_time,
        capacity_minutes: 0,
        created_at: Utc::now().to_rfc3339(),
    };
    slot.recompute_capacity();
    Ok(slot)
}
