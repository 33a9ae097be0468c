use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::AppResult;
use crate::models::task::{Task, TaskMilestone};

const BASE_SELECT: &str = r#"
    SELECT
        id, owner_id, subject, title, deadline, timezone, difficulty, importance,
        estimated_minutes, progress_minutes, duration_estimate_min, duration_estimate_max,
        duration_unit, content_focus, success_criteria, milestones, notes,
        created_at, updated_at
    FROM tasks
"#;

#[derive(Debug, Clone)]
struct TaskRow {
    id: String,
    owner_id: String,
    subject: String,
    title: String,
    deadline: String,
    timezone: String,
    difficulty: u8,
    importance: Option<u8>,
    estimated_minutes: i64,
    progress_minutes: i64,
    duration_estimate_min: Option<i64>,
    duration_estimate_max: Option<i64>,
    duration_unit: Option<String>,
    content_focus: Option<String>,
    success_criteria: String,
    milestones: Option<String>,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<&Row<'_>> for TaskRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            subject: row.get("subject")?,
            title: row.get("title")?,
            deadline: row.get("deadline")?,
            timezone: row.get("timezone")?,
            difficulty: row.get("difficulty")?,
            importance: row.get("importance")?,
            estimated_minutes: row.get("estimated_minutes")?,
            progress_minutes: row.get("progress_minutes")?,
            duration_estimate_min: row.get("duration_estimate_min")?,
            duration_estimate_max: row.get("duration_estimate_max")?,
            duration_unit: row.get("duration_unit")?,
            content_focus: row.get("content_focus")?,
            success_criteria: row.get("success_criteria")?,
            milestones: row.get("milestones")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

impl TaskRow {
    fn into_task(self) -> AppResult<Task> {
        let success_criteria: Vec<String> = serde_json::from_str(&self.success_criteria)?;
        let milestones: Option<Vec<TaskMilestone>> = match self.milestones {
            Some(raw) => serde_json::from_str(&raw)?,
            None => None,
        };
        Ok(Task {
            id: self.id,
            owner_id: self.owner_id,
            subject: self.subject,
            title: self.title,
            deadline: self.deadline,
            timezone: self.timezone,
            difficulty: self.difficulty,
            importance: self.importance,
            estimated_minutes: self.estimated_minutes,
            progress_minutes: self.progress_minutes,
            duration_estimate_min: self.duration_estimate_min,
            duration_estimate_max: self.duration_estimate_max,
            duration_unit: self.duration_unit,
            content_focus: self.content_focus,
            success_criteria,
            milestones,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    fn from_task(task: &Task) -> AppResult<Self> {
        Ok(Self {
            id: task.id.clone(),
            owner_id: task.owner_id.clone(),
            subject: task.subject.clone(),
            title: task.title.clone(),
            deadline: task.deadline.clone(),
            timezone: task.timezone.clone(),
            difficulty: task.difficulty,
            importance: task.importance,
            estimated_minutes: task.estimated_minutes,
            progress_minutes: task.progress_minutes,
            duration_estimate_min: task.duration_estimate_min,
            duration_estimate_max: task.duration_estimate_max,
            duration_unit: task.duration_unit.clone(),
            content_focus: task.content_focus.clone(),
            success_criteria: serde_json::to_string(&task.success_criteria)?,
            milestones: match &task.milestones {
                Some(m) => Some(serde_json::to_string(m)?),
                None => None,
            },
            notes: task.notes.clone(),
            created_at: task.created_at.clone(),
            updated_at: task.updated_at.clone(),
        })
    }
}

pub struct TaskRepository;

impl TaskRepository {
    pub fn list(conn: &Connection, owner_id: &str) -> AppResult<Vec<Task>> {
        let mut stmt = conn.prepare(&format!("{BASE_SELECT} WHERE owner_id = ?1 ORDER BY deadline ASC"))?;
        let rows = stmt
            .query_map([owner_id], |row| TaskRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(TaskRow::into_task).collect()
    }

    pub fn get(conn: &Connection, owner_id: &str, id: &str) -> AppResult<Option<Task>> {
        let mut stmt = conn.prepare(&format!("{BASE_SELECT} WHERE owner_id = ?1 AND id = ?2"))?;
        let row = stmt
            .query_row([owner_id, id], |row| TaskRow::try_from(row))
            .optional()?;
        row.map(TaskRow::into_task).transpose()
    }

    pub fn upsert(conn: &Connection, task: &Task) -> AppResult<()> {
        let row = TaskRow::from_task(task)?;
        conn.execute(
            r#"
                INSERT INTO tasks (
                    id, owner_id, subject, title, deadline, timezone, difficulty, importance,
                    estimated_minutes, progress_minutes, duration_estimate_min, duration_estimate_max,
                    duration_unit, content_focus, success_criteria, milestones, notes,
                    created_at, updated_at
                ) VALUES (
                    :id, :owner_id, :subject, :title, :deadline, :timezone, :difficulty, :importance,
                    :estimated_minutes, :progress_minutes, :duration_estimate_min, :duration_estimate_max,
                    :duration_unit, :content_focus, :success_criteria, :milestones, :notes,
                    :created_at, :updated_at
                )
                ON CONFLICT(id) DO UPDATE SET
                    subject = excluded.subject,
                    title = excluded.title,
                    deadline = excluded.deadline,
                    timezone = excluded.timezone,
                    difficulty = excluded.difficulty,
                    importance = excluded.importance,
                    estimated_minutes = excluded.estimated_minutes,
                    progress_minutes = excluded.progress_minutes,
                    duration_estimate_min = excluded.duration_estimate_min,
                    duration_estimate_max = excluded.duration_estimate_max,
                    duration_unit = excluded.duration_unit,
                    content_focus = excluded.content_focus,
                    success_criteria = excluded.success_criteria,
                    milestones = excluded.milestones,
                    notes = excluded.notes,
                    updated_at = excluded.updated_at
            "#,
            named_params! {
                ":id": row.id,
                ":owner_id": row.owner_id,
                ":subject": row.subject,
                ":title": row.title,
                ":deadline": row.deadline,
                ":timezone": row.timezone,
                ":difficulty": row.difficulty,
                ":importance": row.importance,
                ":estimated_minutes": row.estimated_minutes,
                ":progress_minutes": row.progress_minutes,
                ":duration_estimate_min": row.duration_estimate_min,
                ":duration_estimate_max": row.duration_estimate_max,
                ":duration_unit": row.duration_unit,
                ":content_focus": row.content_focus,
                ":success_criteria": row.success_criteria,
                ":milestones": row.milestones,
                ":notes": row.notes,
                ":created_at": row.created_at,
                ":updated_at": row.updated_at,
            },
        )?;
        Ok(())
    }

    pub fn delete(conn: &Connection, owner_id: &str, id: &str) -> AppResult<()> {
        conn.execute(
            "DELETE FROM tasks WHERE owner_id = ?1 AND id = ?2",
            [owner_id, id],
        )?;
        Ok(())
    }
}
