use serde::{Deserialize, Serialize};

/// A unit of study work owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub owner_id: String,
    pub subject: String,
    pub title: String,
    /// ISO-8601 instant with explicit offset.
    pub deadline: String,
    pub timezone: String,
    pub difficulty: u8,
    pub importance: Option<u8>,
    pub estimated_minutes: i64,
    #[serde(default)]
    pub progress_minutes: i64,
    /// Advisory duration range; not consumed by the scheduler.
    #[serde(default)]
    pub duration_estimate_min: Option<i64>,
    #[serde(default)]
    pub duration_estimate_max: Option<i64>,
    #[serde(default)]
    pub duration_unit: Option<String>,
    #[serde(default)]
    pub content_focus: Option<String>,
    #[serde(default)]
    pub success_criteria: Vec<String>,
    #[serde(default)]
    pub milestones: Option<Vec<TaskMilestone>>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskMilestone {
    pub id: String,
    pub title: String,
    pub minutes_estimate: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreateInput {
    pub subject: String,
    pub title: String,
    pub deadline: String,
    #[serde(default)]
    pub timezone: Option<String>,
    pub difficulty: u8,
    #[serde(default)]
    pub importance: Option<u8>,
    pub estimated_minutes: i64,
    #[serde(default)]
    pub duration_estimate_min: Option<i64>,
    #[serde(default)]
    pub duration_estimate_max: Option<i64>,
    #[serde(default)]
    pub duration_unit: Option<String>,
    #[serde(default)]
    pub content_focus: Option<String>,
    #[serde(default)]
    pub success_criteria: Option<Vec<String>>,
    #[serde(default)]
    pub milestones: Option<Vec<TaskMilestoneInput>>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskMilestoneInput {
    pub title: String,
    pub minutes_estimate: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub importance: Option<Option<u8>>,
    #[serde(default)]
    pub estimated_minutes: Option<i64>,
    #[serde(default)]
    pub progress_minutes: Option<i64>,
    #[serde(default)]
    pub content_focus: Option<Option<String>>,
    #[serde(default)]
    pub success_criteria: Option<Vec<String>>,
    #[serde(default)]
    pub milestones: Option<Option<Vec<TaskMilestoneInput>>>,
    #[serde(default)]
    pub notes: Option<Option<String>>,
}
