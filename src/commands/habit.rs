use chrono::Utc;
use tauri::State;
use uuid::Uuid;

use crate::db::repositories::{HabitRepository, PlanRepository};
use crate::error::{AppError, AppResult};
use crate::models::habit::{Habit, HabitCadence, HabitCreateInput};

use super::{run_blocking, AppState, CommandResult};

#[tauri::command]
pub async fn habits_list(state: State<'_, AppState>, owner_id: String) -> CommandResult<Vec<Habit>> {
    let db = state.inner().db();
    run_blocking(move || db.with_connection(|conn| HabitRepository::list(conn, &owner_id))).await
}

#[tauri::command]
pub async fn habits_create(
    state: State<'_, AppState>,
    owner_id: String,
    payload: HabitCreateInput,
) -> CommandResult<Habit> {
    let db = state.inner().db();
    run_blocking(move || {
        let habit = build_habit(owner_id, payload)?;
        db.with_connection(|conn| {
            HabitRepository::upsert(conn, &habit)?;
            Ok(habit)
        })
    })
    .await
}

/// Deletes the habit and cascades into every stored plan of the owner
/// (spec.md §3 Habit lifecycle, §4.9 `removeHabitFromPlans`).
#[tauri::command]
pub async fn habits_delete(
    state: State<'_, AppState>,
    owner_id: String,
    id: String,
) -> CommandResult<()> {
    let db = state.inner().db();
    run_blocking(move || {
        db.with_connection(|conn| {
            HabitRepository::delete(conn, &owner_id, &id)?;
            PlanRepository::remove_habit_from_plans(conn, &owner_id, &id)
        })
    })
    .await
}

fn build_habit(owner_id: String, input: HabitCreateInput) -> AppResult<Habit> {
    if input.minutes < 1 {
        return Err(AppError::validation("habit minutes must be >= 1"));
    }
    if matches!(input.cadence, HabitCadence::Weekly) && input.weekday.is_none() {
        return Err(AppError::validation("weekly habits require a weekday"));
    }
    if let Some(weekday) = input.weekday {
        if weekday > 6 {
            return Err(AppError::validation("weekday must be 0-6"));
        }
    }
    Ok(Habit {
        id: Uuid::new_v4().to_string(),
        owner_id,
        name: input.name,
        cadence: input.cadence,
        weekday: input.weekday,
        minutes: input.minutes,
        preset: input.preset,
        preferred_start: input.preferred_start,
        energy_window: input.energy_window,
        created_at: Utc::now().to_rfc3339(),
    })
}
