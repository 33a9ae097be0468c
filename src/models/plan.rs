use serde::{Deserialize, Serialize};

use crate::models::task::Task;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionSource {
    Task,
    Habit,
    Break,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Done,
    Skipped,
}

/// A scheduled atom inside a `PlanRecord` (spec.md §3 "Session").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub source: SessionSource,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub habit_id: Option<String>,
    pub subject: String,
    pub title: String,
    pub planned_start: String,
    pub planned_end: String,
    pub minutes: i64,
    #[serde(default)]
    pub buffer_minutes: i64,
    pub status: SessionStatus,
    #[serde(default)]
    pub checklist: Option<Vec<String>>,
    #[serde(default)]
    pub success_criteria: Option<Vec<String>>,
    #[serde(default)]
    pub milestone_title: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    pub plan_version: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanSuggestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl PlanSuggestion {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// An immutable output of one rebuild (spec.md §3 "PlanRecord").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanRecord {
    pub id: String,
    pub owner_id: String,
    pub plan_version: i64,
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub unscheduled_tasks: Vec<Task>,
    #[serde(default)]
    pub suggestions: Vec<PlanSuggestion>,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusUpdateInput {
    pub status: SessionStatus,
}
