use chrono::{FixedOffset, TimeZone};
use studyflow_core_lib::models::settings::Settings;
use studyflow_core_lib::models::slot::FreeSlot;
use studyflow_core_lib::services::allocator::{allocate, MAX_SESSION_MINUTES, MIN_SESSION_MINUTES};
use studyflow_core_lib::services::day_bucket::build_buckets;

fn slot(weekday: u8, start: &str, end: &str) -> FreeSlot {
    let mut s = FreeSlot {
        id: format!("{weekday}-{start}"),
        owner_id: "owner-1".into(),
        weekday,
        start_time: start.into(),
        end_time: end.into(),
        capacity_minutes: 0,
        created_at: "2025-01-01T00:00:00+07:00".into(),
    };
    s.recompute_capacity();
    s
}

/// Drains a whole week of buckets with repeated allocate() calls, confirming
/// the allocator never exceeds a bucket's daily cap and never emits a chunk
/// outside [MIN_SESSION_MINUTES, MAX_SESSION_MINUTES] once draining starts.
#[test]
fn allocate_across_a_week_of_buckets_respects_session_bounds() {
    let tz = FixedOffset::east_opt(7 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2025, 3, 10, 7, 0, 0).unwrap(); // Monday
    let end = now + chrono::Duration::days(6);

    let slots: Vec<FreeSlot> = (1..=5).map(|d| slot(d, "08:00", "11:00")).collect();
    let settings = Settings::defaults("owner-1", "2025-01-01T00:00:00+07:00");
    let mut buckets = build_buckets(now, end, &slots, &settings);
    assert_eq!(buckets.len(), 5);

    let mut placements = Vec::new();
    for bucket in buckets.iter_mut() {
        loop {
            match allocate(bucket, 200, 100, false) {
                Some(p) => placements.push(p),
                None => break,
            }
        }
    }

    assert!(!placements.is_empty());
    for p in &placements {
        assert!(p.minutes <= MAX_SESSION_MINUTES);
        assert!(p.minutes >= MIN_SESSION_MINUTES || p.minutes == 0);
    }
    for bucket in &buckets {
        assert!(bucket.used <= bucket.allowed_minutes);
    }
}

#[test]
fn a_bucket_with_multiple_segments_is_drained_segment_by_segment() {
    let tz = FixedOffset::east_opt(7 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(); // Monday
    let slots = vec![
        slot(1, "08:00", "09:00"),
        slot(1, "14:00", "15:30"),
    ];
    let mut settings = Settings::defaults("owner-1", "2025-01-01T00:00:00+07:00");
    settings.buffer_percent = 0.0;
    let mut buckets = build_buckets(now, now, &slots, &settings);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].segments.len(), 2);

    let first = allocate(&mut buckets[0], 200, 60, false).expect("first segment has room");
    assert_eq!(first.minutes, 60);
    let second = allocate(&mut buckets[0], 200, 90, false).expect("second segment has room");
    assert_eq!(second.minutes, 90);
}
