use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HabitCadence {
    Daily,
    Weekly,
}

/// A recurring practice the user wants time carved out for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub cadence: HabitCadence,
    /// Only meaningful when `cadence == Weekly`. 0 = Sunday.
    #[serde(default)]
    pub weekday: Option<u8>,
    pub minutes: i64,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub preferred_start: Option<String>,
    #[serde(default)]
    pub energy_window: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HabitCreateInput {
    pub name: String,
    pub cadence: HabitCadence,
    #[serde(default)]
    pub weekday: Option<u8>,
    pub minutes: i64,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub preferred_start: Option<String>,
    #[serde(default)]
    pub energy_window: Option<String>,
}

impl Default for HabitCadence {
    fn default() -> Self {
        HabitCadence::Daily
    }
}
