use serde::{Deserialize, Serialize};

/// A recurring weekly availability window, e.g. "Monday 08:00-12:00".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FreeSlot {
    pub id: String,
    pub owner_id: String,
    /// 0 = Sunday, per storage convention (spec.md §9).
    pub weekday: u8,
    /// `HH:MM` local time.
    pub start_time: String,
    pub end_time: String,
    pub capacity_minutes: i64,
    pub created_at: String,
}

impl FreeSlot {
    /// Recomputes `capacityMinutes` from `startTime`/`endTime`, as required on write.
    pub fn recompute_capacity(&mut self) {
        if let (Some(start), Some(end)) = (
            crate::services::time_util::parse_hhmm(&self.start_time),
            crate::services::time_util::parse_hhmm(&self.end_time),
        ) {
            self.capacity_minutes = (end - start).max(0) as i64;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FreeSlotCreateInput {
    pub weekday: u8,
    pub start_time: String,
    pub end_time: String,
}
