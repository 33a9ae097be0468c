use std::convert::TryFrom;

use chrono::Utc;
use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::AppResult;
use crate::models::plan::{PlanRecord, PlanSuggestion, Session, SessionStatus};
use crate::models::task::Task;

const BASE_SELECT: &str = r#"
    SELECT id, owner_id, plan_version, sessions, unscheduled_tasks, suggestions, generated_at
    FROM plans
"#;

impl TryFrom<&Row<'_>> for PlanRecord {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        let sessions_json: String = row.get("sessions")?;
        let unscheduled_json: String = row.get("unscheduled_tasks")?;
        let suggestions_json: String = row.get("suggestions")?;
        let sessions: Vec<Session> = serde_json::from_str(&sessions_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))?;
        let unscheduled_tasks: Vec<Task> = serde_json::from_str(&unscheduled_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))?;
        let suggestions: Vec<PlanSuggestion> = serde_json::from_str(&suggestions_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))?;
        Ok(Self {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            plan_version: row.get("plan_version")?,
            sessions,
            unscheduled_tasks,
            suggestions,
            generated_at: row.get("generated_at")?,
        })
    }
}

pub struct PlanRepository;

impl PlanRepository {
    pub fn get_latest(conn: &Connection, owner_id: &str) -> AppResult<Option<PlanRecord>> {
        let mut stmt = conn.prepare(&format!(
            "{BASE_SELECT} WHERE owner_id = ?1 ORDER BY plan_version DESC LIMIT 1"
        ))?;
        let plan = stmt
            .query_row([owner_id], |row| PlanRecord::try_from(row))
            .optional()?;
        Ok(plan)
    }

    /// Lists the owner's most recent `limit` plans, newest first (spec.md §2.1).
    pub fn list_recent(conn: &Connection, owner_id: &str, limit: i64) -> AppResult<Vec<PlanRecord>> {
        let mut stmt = conn.prepare(&format!(
            "{BASE_SELECT} WHERE owner_id = ?1 ORDER BY plan_version DESC LIMIT ?2"
        ))?;
        let rows = stmt
            .query_map(rusqlite::params![owner_id, limit], |row| PlanRecord::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn previous_version(conn: &Connection, owner_id: &str) -> AppResult<Option<i64>> {
        let version: Option<i64> = conn
            .query_row(
                "SELECT MAX(plan_version) FROM plans WHERE owner_id = ?1",
                [owner_id],
                |row| row.get(0),
            )
            .optional()?
            .flatten();
        Ok(version)
    }

    /// Computes the next `planVersion` and persists `build` under a single
    /// transaction, giving the monotonic version guarantee of spec.md §5
    /// without a dedicated sequence table (SPEC_FULL.md §3.10).
    pub fn save_with_next_version(
        conn: &mut Connection,
        owner_id: &str,
        build: impl FnOnce(Option<i64>) -> PlanRecord,
    ) -> AppResult<PlanRecord> {
        let tx = conn.transaction()?;
        let previous = Self::previous_version(&tx, owner_id)?;
        let plan = build(previous);

        tx.execute(
            r#"
                INSERT INTO plans (
                    id, owner_id, plan_version, sessions, unscheduled_tasks, suggestions, generated_at
                ) VALUES (
                    :id, :owner_id, :plan_version, :sessions, :unscheduled_tasks, :suggestions, :generated_at
                )
            "#,
            named_params! {
                ":id": plan.id,
                ":owner_id": plan.owner_id,
                ":plan_version": plan.plan_version,
                ":sessions": serde_json::to_string(&plan.sessions)?,
                ":unscheduled_tasks": serde_json::to_string(&plan.unscheduled_tasks)?,
                ":suggestions": serde_json::to_string(&plan.suggestions)?,
                ":generated_at": plan.generated_at,
            },
        )?;
        tx.commit()?;
        Ok(plan)
    }

    /// Updates one session's status on the owner's latest plan
    /// (spec.md §4.9). Returns `None` if no session with that id exists.
    pub fn update_session_status(
        conn: &Connection,
        owner_id: &str,
        session_id: &str,
        status: SessionStatus,
    ) -> AppResult<Option<PlanRecord>> {
        let Some(mut plan) = Self::get_latest(conn, owner_id)? else {
            return Ok(None);
        };
        let Some(session) = plan.sessions.iter_mut().find(|s| s.id == session_id) else {
            return Ok(None);
        };
        session.status = status;
        session.completed_at = if status == SessionStatus::Done {
            Some(Utc::now().to_rfc3339())
        } else {
            None
        };

        conn.execute(
            "UPDATE plans SET sessions = ?1 WHERE id = ?2",
            rusqlite::params![serde_json::to_string(&plan.sessions)?, plan.id],
        )?;
        Ok(Some(plan))
    }

    /// Strips every session referencing `task_id` (and matching unscheduled
    /// entries) from every stored plan of `owner_id` (spec.md §4.9, §8
    /// property #4). Does not rebuild or bump any plan version.
    pub fn remove_task_from_plans(conn: &Connection, owner_id: &str, task_id: &str) -> AppResult<()> {
        let mut stmt = conn.prepare(&format!("{BASE_SELECT} WHERE owner_id = ?1"))?;
        let plans = stmt
            .query_map([owner_id], |row| PlanRecord::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;

        for mut plan in plans {
            let sessions_before = plan.sessions.len();
            let unscheduled_before = plan.unscheduled_tasks.len();
            plan.sessions.retain(|s| s.task_id.as_deref() != Some(task_id));
            plan.unscheduled_tasks.retain(|t| t.id != task_id);
            if plan.sessions.len() != sessions_before || plan.unscheduled_tasks.len() != unscheduled_before {
                conn.execute(
                    "UPDATE plans SET sessions = ?1, unscheduled_tasks = ?2 WHERE id = ?3",
                    rusqlite::params![
                        serde_json::to_string(&plan.sessions)?,
                        serde_json::to_string(&plan.unscheduled_tasks)?,
                        plan.id,
                    ],
                )?;
            }
        }
        Ok(())
    }

    /// Strips every session referencing `habit_id` from every stored plan
    /// of `owner_id` (spec.md §4.9, §8 property #4).
    pub fn remove_habit_from_plans(conn: &Connection, owner_id: &str, habit_id: &str) -> AppResult<()> {
        let mut stmt = conn.prepare(&format!("{BASE_SELECT} WHERE owner_id = ?1"))?;
        let plans = stmt
            .query_map([owner_id], |row| PlanRecord::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;

        for mut plan in plans {
            let before = plan.sessions.len();
            plan.sessions.retain(|s| s.habit_id.as_deref() != Some(habit_id));
            if plan.sessions.len() != before {
                conn.execute(
                    "UPDATE plans SET sessions = ?1 WHERE id = ?2",
                    rusqlite::params![serde_json::to_string(&plan.sessions)?, plan.id],
                )?;
            }
        }
        Ok(())
    }
}
