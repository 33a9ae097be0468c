use chrono::{FixedOffset, TimeZone};
use studyflow_core_lib::db::repositories::SlotRepository;
use studyflow_core_lib::db::DbPool;
use studyflow_core_lib::models::settings::Settings;
use studyflow_core_lib::models::slot::FreeSlot;
use studyflow_core_lib::services::day_bucket::build_buckets;
use studyflow_core_lib::services::slot_cleaner::clean_slots;
use tempfile::tempdir;

fn slot(id: &str, weekday: u8, start: &str, end: &str) -> FreeSlot {
    let mut s = FreeSlot {
        id: id.into(),
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

#[test]
fn overlapping_slots_round_trip_through_storage_and_merge() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("slots.sqlite")).expect("db pool");

    pool.with_connection(|conn| {
        SlotRepository::upsert(conn, &slot("a", 1, "08:00", "10:00"))?;
        SlotRepository::upsert(conn, &slot("b", 1, "09:30", "11:00"))?;
        Ok(())
    })
    .expect("seed slots");

    let stored = pool.with_connection(|conn| SlotRepository::list(conn, "owner-1")).unwrap();
    assert_eq!(stored.len(), 2);

    let cleaned = clean_slots(&stored);
    assert_eq!(cleaned.slots.len(), 1);
    assert_eq!(cleaned.slots[0].start_time, "08:00");
    assert_eq!(cleaned.slots[0].end_time, "11:00");
}

#[test]
fn cleaned_slots_feed_day_buckets_with_capped_capacity() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("slots.sqlite")).expect("db pool");

    pool.with_connection(|conn| SlotRepository::upsert(conn, &slot("over", 1, "06:00", "20:00"))).unwrap();

    let stored = pool.with_connection(|conn| SlotRepository::list(conn, "owner-1")).unwrap();
    let cleaned = clean_slots(&stored);
    assert!(cleaned.warnings.iter().any(|w| w.contains("too long")));

    let tz = FixedOffset::east_opt(7 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(); // Monday
    let settings = Settings::defaults("owner-1", "2025-01-01T00:00:00+07:00");
    let buckets = build_buckets(now, now, &cleaned.slots, &settings);

    assert_eq!(buckets.len(), 1);
    assert!(buckets[0].allowed_minutes <= 180);
}

#[test]
fn an_inverted_slot_is_dropped_before_reaching_the_allocator() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("slots.sqlite")).expect("db pool");

    pool.with_connection(|conn| SlotRepository::upsert(conn, &slot("bad", 1, "12:00", "10:00"))).unwrap();

    let stored = pool.with_connection(|conn| SlotRepository::list(conn, "owner-1")).unwrap();
    let cleaned = clean_slots(&stored);

    assert!(cleaned.slots.is_empty());
    assert_eq!(cleaned.warnings.len(), 1);
}
