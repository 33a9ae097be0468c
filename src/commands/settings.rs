use chrono::Utc;
use tauri::State;

use crate::db::repositories::SettingsRepository;
use crate::error::{AppError, AppResult};
use crate::models::settings::{Settings, SettingsUpdateInput};

use super::{run_blocking, AppState, CommandResult};

/// Materializes and persists defaults on first read, per owner
/// (spec.md §2 "Owner-scoped settings defaults").
#[tauri::command]
pub async fn settings_get(state: State<'_, AppState>, owner_id: String) -> CommandResult<Settings> {
    let db = state.inner().db();
    run_blocking(move || {
        let now = Utc::now().to_rfc3339();
        db.with_connection(|conn| SettingsRepository::get_or_default(conn, &owner_id, &now))
    })
    .await
}

#[tauri::command]
pub async fn settings_update(
    state: State<'_, AppState>,
    owner_id: String,
    payload: SettingsUpdateInput,
) -> CommandResult<Settings> {
    let db = state.inner().db();
    run_blocking(move || {
        let now = Utc::now().to_rfc3339();
        db.with_connection(|conn| {
            let mut settings = SettingsRepository::get_or_default(conn, &owner_id, &now)?;
            apply_update(&mut settings, payload)?;
            settings.last_updated = now;
            SettingsRepository::upsert(conn, &settings)?;
            Ok(settings)
        })
    })
    .await
}

fn apply_update(settings: &mut Settings, input: SettingsUpdateInput) -> AppResult<()> {
    if let Some(daily_limit) = input.daily_limit_minutes {
        if !(30..=720).contains(&daily_limit) {
            return Err(AppError::validation("dailyLimitMinutes must be between 30 and 720"));
        }
        settings.daily_limit_minutes = daily_limit;
    }
    if let Some(buffer_percent) = input.buffer_percent {
        if !(0.0..=0.5).contains(&buffer_percent) {
            return Err(AppError::validation("bufferPercent must be between 0.0 and 0.5"));
        }
        settings.buffer_percent = buffer_percent;
    }
    if let Some(break_preset) = input.break_preset {
        if break_preset.focus < 1 || break_preset.rest < 0 {
            return Err(AppError::validation(
                "breakPreset.focus must be >= 1 and breakPreset.rest must be >= 0",
            ));
        }
        settings.break_preset = break_preset;
    }
    if let Some(timezone) = input.timezone {
        settings.timezone = timezone;
    }
    Ok(())
}
