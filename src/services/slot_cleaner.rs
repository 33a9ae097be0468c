use std::collections::BTreeMap;

use tracing::debug;

use crate::models::slot::FreeSlot;
use crate::services::time_util::{format_hhmm, parse_hhmm};

const MAX_SLOT_MINUTES: i64 = 180;
const OVERLONG_THRESHOLD_MINUTES: i64 = 720;

pub struct CleanSlotsResult {
    pub slots: Vec<FreeSlot>,
    pub warnings: Vec<String>,
}

/// Deduplicates, repairs and merges a weekly slot pattern (spec.md §4.1).
///
/// Deterministic: output is grouped by weekday then sorted by start time
/// within each group.
pub fn clean_slots(slots: &[FreeSlot]) -> CleanSlotsResult {
    let mut warnings = Vec::new();
    let mut grouped: BTreeMap<u8, Vec<FreeSlot>> = BTreeMap::new();

    for slot in slots {
        let (Some(start), Some(end)) = (parse_hhmm(&slot.start_time), parse_hhmm(&slot.end_time))
        else {
            warnings.push(format!(
                "slot {}-{} has an unparseable time",
                slot.start_time, slot.end_time
            ));
            continue;
        };
        if end <= start {
            warnings.push(format!(
                "slot {}-{} has inverted hours",
                slot.start_time, slot.end_time
            ));
            continue;
        }
        let duration = end - start;
        if duration >= OVERLONG_THRESHOLD_MINUTES {
            warnings.push(format!(
                "slot {}-{} too long, capped at {MAX_SLOT_MINUTES}",
                slot.start_time, slot.end_time
            ));
        }
        let safe_duration = duration.min(MAX_SLOT_MINUTES);
        let mut cleaned = slot.clone();
        cleaned.start_time = format_hhmm(start);
        cleaned.end_time = format_hhmm(start + safe_duration);
        cleaned.capacity_minutes = safe_duration;
        grouped.entry(slot.weekday).or_default().push(cleaned);
    }

    let mut sanitized = Vec::new();
    for (weekday, mut day_slots) in grouped {
        day_slots.sort_by_key(|s| parse_hhmm(&s.start_time).unwrap_or(0));
        let before_count = day_slots.len();

        let mut iter = day_slots.into_iter();
        let mut current = match iter.next() {
            Some(slot) => slot,
            None => continue,
        };
        let mut merged_for_day = Vec::new();

        for next in iter {
            let current_start = parse_hhmm(&current.start_time).unwrap_or(0);
            let current_end = parse_hhmm(&current.end_time).unwrap_or(0);
            let next_start = parse_hhmm(&next.start_time).unwrap_or(0);
            let next_end = parse_hhmm(&next.end_time).unwrap_or(0);

            if next_start <= current_end {
                let merged_start = current_start.min(next_start);
                let merged_end = current_end.max(next_end);
                current.start_time = format_hhmm(merged_start);
                current.end_time = format_hhmm(merged_end);
                current.capacity_minutes = merged_end - merged_start;
            } else {
                merged_for_day.push(current);
                current = next;
            }
        }
        merged_for_day.push(current);

        if merged_for_day.len() < before_count {
            warnings.push(format!("merged overlapping slots on day {weekday}"));
        }
        debug!(target: "app::planner::slots", weekday, before_count, after_count = merged_for_day.len(), "cleaned slot group");
        sanitized.extend(merged_for_day);
    }

    CleanSlotsResult {
        slots: sanitized,
        warnings,
    }
}
