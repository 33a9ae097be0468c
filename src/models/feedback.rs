use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLabel {
    TooDense,
    TooEasy,
    NeedMoreTime,
    EveningFocus,
    Custom,
}

/// A labelled post-plan note used to tune the next rebuild (spec.md §4.8).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub owner_id: String,
    pub label: FeedbackLabel,
    #[serde(default)]
    pub note: Option<String>,
    pub plan_version: i64,
    pub submitted_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackCreateInput {
    pub label: FeedbackLabel,
    #[serde(default)]
    pub note: Option<String>,
    pub plan_version: i64,
}

impl Default for FeedbackLabel {
    fn default() -> Self {
        FeedbackLabel::Custom
    }
}
