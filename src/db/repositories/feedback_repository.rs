use std::convert::TryFrom;

use rusqlite::{named_params, Connection, Row};

use crate::error::AppResult;
use crate::models::feedback::{Feedback, FeedbackLabel};

const BASE_SELECT: &str = r#"
    SELECT id, owner_id, label, note, plan_version, submitted_at
    FROM feedback
"#;

struct FeedbackRow {
    id: String,
    owner_id: String,
    label: String,
    note: Option<String>,
    plan_version: i64,
    submitted_at: String,
}

impl TryFrom<&Row<'_>> for FeedbackRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            label: row.get("label")?,
            note: row.get("note")?,
            plan_version: row.get("plan_version")?,
            submitted_at: row.get("submitted_at")?,
        })
    }
}

impl FeedbackRow {
    fn into_feedback(self) -> Feedback {
        let label = match self.label.as_str() {
            "too_dense" => FeedbackLabel::TooDense,
            "too_easy" => FeedbackLabel::TooEasy,
            "need_more_time" => FeedbackLabel::NeedMoreTime,
            "evening_focus" => FeedbackLabel::EveningFocus,
            _ => FeedbackLabel::Custom,
        };
        Feedback {
            id: self.id,
            owner_id: self.owner_id,
            label,
            note: self.note,
            plan_version: self.plan_version,
            submitted_at: self.submitted_at,
        }
    }

    fn label_str(label: FeedbackLabel) -> &'static str {
        match label {
            FeedbackLabel::TooDense => "too_dense",
            FeedbackLabel::TooEasy => "too_easy",
            FeedbackLabel::NeedMoreTime => "need_more_time",
            FeedbackLabel::EveningFocus => "evening_focus",
            FeedbackLabel::Custom => "custom",
        }
    }
}

pub struct FeedbackRepository;

impl FeedbackRepository {
    pub fn list(conn: &Connection, owner_id: &str) -> AppResult<Vec<Feedback>> {
        let mut stmt =
            conn.prepare(&format!("{BASE_SELECT} WHERE owner_id = ?1 ORDER BY submitted_at ASC"))?;
        let rows = stmt
            .query_map([owner_id], |row| FeedbackRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().map(FeedbackRow::into_feedback).collect())
    }

    pub fn insert(conn: &Connection, feedback: &Feedback) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO feedback (id, owner_id, label, note, plan_version, submitted_at)
                VALUES (:id, :owner_id, :label, :note, :plan_version, :submitted_at)
            "#,
            named_params! {
                ":id": feedback.id,
                ":owner_id": feedback.owner_id,
                ":label": FeedbackRow::label_str(feedback.label),
                ":note": feedback.note,
                ":plan_version": feedback.plan_version,
                ":submitted_at": feedback.submitted_at,
            },
        )?;
        Ok(())
    }
}
