use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BreakPreset {
    pub focus: i64,
    pub rest: i64,
    pub label: String,
}

impl Default for BreakPreset {
    fn default() -> Self {
        Self {
            focus: 45,
            rest: 10,
            label: "Deep work 45/10".to_string(),
        }
    }
}

/// Per-owner planner configuration (spec.md §3 "Settings").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub owner_id: String,
    pub daily_limit_minutes: i64,
    pub buffer_percent: f64,
    pub break_preset: BreakPreset,
    pub timezone: String,
    pub last_updated: String,
}

impl Settings {
    pub fn defaults(owner_id: impl Into<String>, last_updated: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            daily_limit_minutes: 180,
            buffer_percent: 0.15,
            break_preset: BreakPreset::default(),
            timezone: "+07:00".to_string(),
            last_updated: last_updated.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdateInput {
    #[serde(default)]
    pub daily_limit_minutes: Option<i64>,
    #[serde(default)]
    pub buffer_percent: Option<f64>,
    #[serde(default)]
    pub break_preset: Option<BreakPreset>,
    #[serde(default)]
    pub timezone: Option<String>,
}
