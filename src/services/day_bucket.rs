use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone};

use crate::models::settings::Settings;
use crate::models::slot::FreeSlot;
use crate::services::time_util::{parse_hhmm, storage_weekday};

/// One concrete `[start, end]` allocation source on a specific date.
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub used: i64,
}

impl Segment {
    pub fn capacity_minutes(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_minutes()
    }
}

/// One calendar day with its allocatable segments and daily cap (spec.md C3).
#[derive(Debug, Clone)]
pub struct DayBucket {
    pub iso_date: String,
    pub weekday: u8,
    pub segments: Vec<Segment>,
    pub allowed_minutes: i64,
    pub used: i64,
}

/// Projects a cleaned weekly slot pattern onto `[now.date(), end.date()]`,
/// applying daily caps and the buffer discount. Buckets with no usable
/// segments are discarded; see spec.md §4.2.
pub fn build_buckets(
    now: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    slots: &[FreeSlot],
    settings: &Settings,
) -> Vec<DayBucket> {
    let mut buckets = Vec::new();
    let today = now.date_naive();
    let last_date = end.date_naive();

    let mut cursor = today;
    while cursor <= last_date {
        let weekday = storage_weekday(cursor.weekday());
        let mut segments = Vec::new();

        for slot in slots.iter().filter(|s| s.weekday == weekday) {
            let (Some(start_min), Some(end_min)) =
                (parse_hhmm(&slot.start_time), parse_hhmm(&slot.end_time))
            else {
                continue;
            };
            let mut seg_start = day_instant(cursor, start_min, *now.offset());
            let seg_end = day_instant(cursor, end_min, *now.offset());
            if cursor == today && seg_start < now {
                seg_start = now;
            }
            segments.push(Segment {
                start: seg_start,
                end: seg_end,
                used: 0,
            });
        }

        let total_minutes: i64 = segments
            .iter()
            .map(|s| s.capacity_minutes().max(0))
            .sum();
        let allowed_minutes = (total_minutes as f64 * (1.0 - settings.buffer_percent)).floor() as i64;
        let allowed_minutes = allowed_minutes.min(settings.daily_limit_minutes).max(0);

        if !segments.is_empty() {
            buckets.push(DayBucket {
                iso_date: cursor.format("%Y-%m-%d").to_string(),
                weekday,
                segments,
                allowed_minutes,
                used: 0,
            });
        }

        cursor += Duration::days(1);
    }

    buckets
}

fn day_instant(date: NaiveDate, minutes_since_midnight: i64, offset: FixedOffset) -> DateTime<FixedOffset> {
    let naive = date.and_hms_opt(0, 0, 0).expect("midnight is always valid")
        + Duration::minutes(minutes_since_midnight);
    offset
        .from_local_datetime(&naive)
        .single()
        .expect("fixed offsets never produce ambiguous local times")
}
