use chrono::{DateTime, FixedOffset};

use crate::services::day_bucket::DayBucket;
use crate::services::time_util::add_minutes;

pub const MIN_SESSION_MINUTES: i64 = 25;
pub const MAX_SESSION_MINUTES: i64 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub minutes: i64,
}

/// Greedy placement of one minute-chunk into the first segment of `bucket`
/// that can take it (spec.md §4.4). Callers wanting to place N minutes call
/// this repeatedly until it returns `None`; the allocator never suspends a
/// partial session across calls.
pub fn allocate(
    bucket: &mut DayBucket,
    remaining: i64,
    chunk_preference: i64,
    allow_shorter_than_min: bool,
) -> Option<Placement> {
    if bucket.used >= bucket.allowed_minutes {
        return None;
    }

    for segment in bucket.segments.iter_mut() {
        let seg_capacity = segment.capacity_minutes() - segment.used;
        if seg_capacity <= 0 {
            continue;
        }
        let remaining_today = bucket.allowed_minutes - bucket.used;
        let chunk = chunk_preference
            .min(remaining)
            .min(seg_capacity)
            .min(MAX_SESSION_MINUTES)
            .min(remaining_today);

        if !allow_shorter_than_min && chunk < MIN_SESSION_MINUTES && remaining > MIN_SESSION_MINUTES {
            continue;
        }

        let minutes = if chunk == 0 {
            remaining.min(seg_capacity)
        } else {
            chunk
        };
        if minutes <= 0 {
            continue;
        }

        let start = add_minutes(segment.start, segment.used);
        let end = add_minutes(start, minutes);
        segment.used += minutes;
        bucket.used += minutes;

        return Some(Placement { start, end, minutes });
    }

    None
}
