use chrono::Utc;
use tauri::State;
use uuid::Uuid;

use crate::db::repositories::FeedbackRepository;
use crate::models::feedback::{Feedback, FeedbackCreateInput};

use super::{run_blocking, AppState, CommandResult};

#[tauri::command]
pub async fn feedback_list(state: State<'_, AppState>, owner_id: String) -> CommandResult<Vec<Feedback>> {
    let db = state.inner().db();
    run_blocking(move || db.with_connection(|conn| FeedbackRepository::list(conn, &owner_id))).await
}

#[tauri::command]
pub async fn feedback_submit(
    state: State<'_, AppState>,
    owner_id: String,
    payload: FeedbackCreateInput,
) -> CommandResult<Feedback> {
    let db = state.inner().db();
    run_blocking(move || {
        let feedback = Feedback {
            id: Uuid::new_v4().to_string(),
            owner_id,
            label: payload.label,
            note: payload.note,
            plan_version: payload.plan_version,
            submitted_at: Utc::now().to_rfc3339(),
        };
        db.with_connection(|conn| {
            FeedbackRepository::insert(conn, &feedback)?;
            Ok(feedback)
        })
    })
    .await
}
