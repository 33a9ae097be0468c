use chrono::{FixedOffset, TimeZone};
use studyflow_core_lib::db::repositories::{SettingsRepository, SlotRepository, TaskRepository};
use studyflow_core_lib::db::DbPool;
use studyflow_core_lib::models::settings::Settings;
use studyflow_core_lib::models::slot::FreeSlot;
use studyflow_core_lib::models::task::Task;
use studyflow_core_lib::services::planning_service::build_plan;
use tempfile::tempdir;

fn task(id: &str, estimated_minutes: i64, deadline: &str) -> Task {
    Task {
        id: id.into(),
        owner_id: "owner-1".into(),
        subject: "Biology".into(),
        title: "Cell structures".into(),
        deadline: deadline.into(),
        timezone: "+07:00".into(),
        difficulty: 3,
        importance: Some(2),
        estimated_minutes,
        progress_minutes: 0,
        duration_estimate_min: None,
        duration_estimate_max: None,
        duration_unit: None,
        content_focus: None,
        success_criteria: vec!["Explain mitosis".into()],
        milestones: None,
        notes: None,
        created_at: "2025-01-01T00:00:00+07:00".into(),
        updated_at: "2025-01-01T00:00:00+07:00".into(),
    }
}

fn slot(weekday: u8) -> FreeSlot {
    let mut s = FreeSlot {
        id: format!("slot-{weekday}"),
        owner_id: "owner-1".into(),
        weekday,
        start_time: "08:00".into(),
        end_time: "12:00".into(),
        capacity_minutes: 0,
        created_at: "2025-01-01T00:00:00+07:00".into(),
    };
    s.recompute_capacity();
    s
}

#[test]
fn rebuild_places_tasks_and_persists_through_repositories() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("planning.sqlite")).expect("db pool");

    let tz = FixedOffset::east_opt(7 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2025, 3, 10, 7, 0, 0).unwrap(); // Monday

    pool.with_connection(|conn| {
        TaskRepository::upsert(conn, &task("task-1", 90, "2025-03-15T00:00:00+07:00"))?;
        SlotRepository::upsert(conn, &slot(1))?; // Monday
        SlotRepository::upsert(conn, &slot(2))?; // Tuesday
        Ok(())
    })
    .expect("seed tasks and slots");

    let settings = pool
        .with_connection(|conn| SettingsRepository::get_or_default(conn, "owner-1", "2025-01-01T00:00:00+07:00"))
        .expect("settings");

    let tasks = pool.with_connection(|conn| TaskRepository::list(conn, "owner-1")).unwrap();
    let slots = pool.with_connection(|conn| SlotRepository::list(conn, "owner-1")).unwrap();

    let plan = build_plan(now, "owner-1", tasks, slots, vec![], &settings, None);

    assert_eq!(plan.plan_version, 1);
    assert!(plan.unscheduled_tasks.is_empty());
    let task_minutes: i64 = plan
        .sessions
        .iter()
        .filter(|s| s.task_id.as_deref() == Some("task-1"))
        .map(|s| s.minutes)
        .sum();
    assert_eq!(task_minutes, 90);
}

#[test]
fn rebuild_reports_unscheduled_task_past_every_slot_deadline() {
    let tz = FixedOffset::east_opt(7 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2025, 3, 10, 7, 0, 0).unwrap();

    let settings = Settings::defaults("owner-1", "2025-01-01T00:00:00+07:00");
    let tasks = vec![task("task-late", 60, "2025-03-10T07:30:00+07:00")];
    let slots = vec![slot(2)]; // Tuesday only, deadline is Monday

    let plan = build_plan(now, "owner-1", tasks, slots, vec![], &settings, Some(3));

    assert_eq!(plan.plan_version, 4);
    assert_eq!(plan.unscheduled_tasks.len(), 1);
    assert!(plan
        .suggestions
        .iter()
        .any(|s| s.message.contains("does not fall within")));
}
