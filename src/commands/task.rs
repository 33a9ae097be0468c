use chrono::Utc;
use tauri::State;
use uuid::Uuid;

use crate::db::repositories::{PlanRepository, TaskRepository};
use crate::error::{AppError, AppResult};
use crate::models::task::{Task, TaskCreateInput, TaskMilestone, TaskUpdateInput};

use super::{run_blocking, AppState, CommandResult};

#[tauri::command]
pub async fn tasks_list(state: State<'_, AppState>, owner_id: String) -> CommandResult<Vec<Task>> {
    let db = state.inner().db();
    run_blocking(move || db.with_connection(|conn| TaskRepository::list(conn, &owner_id))).await
}

#[tauri::command]
pub async fn tasks_create(
    state: State<'_, AppState>,
    owner_id: String,
    payload: TaskCreateInput,
) -> CommandResult<Task> {
    let db = state.inner().db();
    run_blocking(move || {
        let now = Utc::now().to_rfc3339();
        let task = build_task(owner_id, payload, now)?;
        db.with_connection(|conn| {
            TaskRepository::upsert(conn, &task)?;
            Ok(task)
        })
    })
    .await
}

#[tauri::command]
pub async fn tasks_update(
    state: State<'_, AppState>,
    owner_id: String,
    id: String,
    payload: TaskUpdateInput,
) -> CommandResult<Task> {
    let db = state.inner().db();
    run_blocking(move || {
        db.with_connection(|conn| {
            let mut task = TaskRepository::get(conn, &owner_id, &id)?.ok_or_else(AppError::not_found)?;
            apply_update(&mut task, payload)?;
            task.updated_at = Utc::now().to_rfc3339();
            TaskRepository::upsert(conn, &task)?;
            Ok(task)
        })
    })
    .await
}

/// Deletes the task and cascades into every stored plan of the owner
/// (spec.md §3 Task lifecycle, §4.9 `removeTaskFromPlans`).
#[tauri::command]
pub async fn tasks_delete(
    state: State<'_, AppState>,
    owner_id: String,
    id: String,
) -> CommandResult<()> {
    let db = state.inner().db();
    run_blocking(move || {
        db.with_connection(|conn| {
            TaskRepository::delete(conn, &owner_id, &id)?;
            PlanRepository::remove_task_from_plans(conn, &owner_id, &id)
        })
    })
    .await
}

fn build_task(owner_id: String, input: TaskCreateInput, now: String) -> AppResult<Task> {
    validate_difficulty(input.difficulty)?;
    if let Some(importance) = input.importance {
        validate_importance(importance)?;
    }
    validate_deadline(&input.deadline, &now)?;

    let milestones = input
        .milestones
        .map(|list| {
            list.into_iter()
                .map(|m| {
                    if m.minutes_estimate < 5 {
                        return Err(AppError::validation("milestone minutesEstimate must be >= 5"));
                    }
                    Ok(TaskMilestone {
                        id: Uuid::new_v4().to_string(),
                        title: m.title,
                        minutes_estimate: m.minutes_estimate,
                    })
                })
                .collect::<AppResult<Vec<_>>>()
        })
        .transpose()?;

    Ok(Task {
        id: Uuid::new_v4().to_string(),
        owner_id,
        subject: input.subject,
        title: input.title,
        deadline: input.deadline,
        timezone: input.timezone.unwrap_or_else(|| "+07:00".to_string()),
        difficulty: input.difficulty,
        importance: input.importance,
        estimated_minutes: input.estimated_minutes,
        progress_minutes: 0,
        duration_estimate_min: input.duration_estimate_min,
        duration_estimate_max: input.duration_estimate_max,
        duration_unit: input.duration_unit,
        content_focus: input.content_focus,
        success_criteria: input.success_criteria.unwrap_or_default(),
        milestones,
        notes: input.notes,
        created_at: now.clone(),
        updated_at: now,
    })
}

fn apply_update(task: &mut Task, input: TaskUpdateInput) -> AppResult<()> {
    if let Some(title) = input.title {
        task.title = title;
    }
    if let Some(deadline) = input.deadline {
        task.deadline = deadline;
    }
    if let Some(difficulty) = input.difficulty {
        validate_difficulty(difficulty)?;
        task.difficulty = difficulty;
    }
    if let Some(importance) = input.importance {
        if let Some(value) = importance {
            validate_importance(value)?;
        }
        task.importance = importance;
    }
    if let Some(estimated_minutes) = input.estimated_minutes {
        task.estimated_minutes = estimated_minutes;
    }
    if let Some(progress_minutes) = input.progress_minutes {
        if progress_minutes > task.estimated_minutes {
            return Err(AppError::validation("progressMinutes cannot exceed estimatedMinutes"));
        }
        task.progress_minutes = progress_minutes;
    }
    if let Some(content_focus) = input.content_focus {
        task.content_focus = content_focus;
    }
    if let Some(success_criteria) = input.success_criteria {
        task.success_criteria = success_criteria;
    }
    if let Some(milestones) = input.milestones {
        task.milestones = milestones
            .map(|list| {
                list.into_iter()
                    .map(|m| {
                        if m.minutes_estimate < 5 {
                            return Err(AppError::validation("milestone minutesEstimate must be >= 5"));
                        }
                        Ok(TaskMilestone {
                            id: Uuid::new_v4().to_string(),
                            title: m.title,
                            minutes_estimate: m.minutes_estimate,
                        })
                    })
                    .collect::<AppResult<Vec<_>>>()
            })
            .transpose()?;
    }
    if let Some(notes) = input.notes {
        task.notes = notes;
    }
    Ok(())
}

fn validate_difficulty(value: u8) -> AppResult<()> {
    if (1..=5).contains(&value) {
        Ok(())
    } else {
        Err(AppError::validation("difficulty must be between 1 and 5"))
    }
}

fn validate_importance(value: u8) -> AppResult<()> {
    if (1..=3).contains(&value) {
        Ok(())
    } else {
        Err(AppError::validation("importance must be 1, 2 or 3"))
    }
}

fn validate_deadline(deadline: &str, now: &str) -> AppResult<()> {
    let deadline = crate::services::time_util::parse_datetime(deadline)?;
    let now = crate::services::time_util::parse_datetime(now)?;
    if deadline <= now {
        return Err(AppError::validation("deadline must be in the future"));
    }
    Ok(())
}
