use chrono::NaiveDate;
use studyflow_core_lib::db::repositories::{PlanRepository, SettingsRepository, SlotRepository, TaskRepository};
use studyflow_core_lib::db::DbPool;
use studyflow_core_lib::models::plan::{PlanRecord, PlanSuggestion, Session, SessionSource, SessionStatus};
use studyflow_core_lib::services::metrics_service::{compute_metrics, compute_range, MetricsRange};
use tempfile::tempdir;

fn session(id: &str, status: SessionStatus, day: &str) -> Session {
    Session {
        id: id.into(),
        source: SessionSource::Task,
        task_id: Some("task-1".into()),
        habit_id: None,
        subject: "Physics".into(),
        title: "Kinematics".into(),
        planned_start: format!("{day}T08:00:00+07:00"),
        planned_end: format!("{day}T09:00:00+07:00"),
        minutes: 60,
        buffer_minutes: 0,
        status,
        checklist: None,
        success_criteria: None,
        milestone_title: None,
        completed_at: None,
        plan_version: 1,
    }
}

fn plan(sessions: Vec<Session>) -> PlanRecord {
    PlanRecord {
        id: "plan-1".into(),
        owner_id: "owner-1".into(),
        plan_version: 1,
        sessions,
        unscheduled_tasks: vec![],
        suggestions: vec![PlanSuggestion::new("increase_free_time", "example")],
        generated_at: "2025-03-10T00:00:00+00:00".into(),
    }
}

#[test]
fn metrics_for_a_stored_plan_reflect_completion_in_range() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("metrics.sqlite")).expect("db pool");

    let sessions = vec![
        session("s1", SessionStatus::Done, "2025-03-10"),
        session("s2", SessionStatus::Pending, "2025-03-11"),
        session("s3", SessionStatus::Done, "2025-03-20"), // outside the week range
    ];
    let seed = plan(sessions);
    pool.with_connection_mut(|conn| {
        PlanRepository::save_with_next_version(conn, "owner-1", |_| seed.clone())
    })
    .expect("persist plan");

    let settings = pool
        .with_connection(|conn| SettingsRepository::get_or_default(conn, "owner-1", "2025-01-01T00:00:00+07:00"))
        .unwrap();
    let tasks = pool.with_connection(|conn| TaskRepository::list(conn, "owner-1")).unwrap();
    let slots = pool.with_connection(|conn| SlotRepository::list(conn, "owner-1")).unwrap();
    let stored = pool.with_connection(|conn| PlanRepository::get_latest(conn, "owner-1")).unwrap();

    let anchor = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(); // Wednesday
    let (range_start, range_end) = compute_range(MetricsRange::Week, anchor);

    let metrics = compute_metrics(
        stored.as_ref(),
        &settings,
        &slots,
        &tasks,
        MetricsRange::Week,
        &range_start.format("%Y-%m-%d").to_string(),
        &range_end.format("%Y-%m-%d").to_string(),
    );

    assert_eq!(metrics.total_sessions, 2);
    assert_eq!(metrics.done_sessions, 1);
    assert_eq!(metrics.completion_rate, 50.0);
    assert_eq!(metrics.plan_version, Some(1));
}

#[test]
fn metrics_before_any_plan_exists_reports_a_zeroed_result() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("metrics.sqlite")).expect("db pool");

    let settings = pool
        .with_connection(|conn| SettingsRepository::get_or_default(conn, "owner-1", "2025-01-01T00:00:00+07:00"))
        .unwrap();
    let stored = pool.with_connection(|conn| PlanRepository::get_latest(conn, "owner-1")).unwrap();

    let anchor = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
    let (range_start, range_end) = compute_range(MetricsRange::Day, anchor);

    let metrics = compute_metrics(
        stored.as_ref(),
        &settings,
        &[],
        &[],
        MetricsRange::Day,
        &range_start.format("%Y-%m-%d").to_string(),
        &range_end.format("%Y-%m-%d").to_string(),
    );

    assert_eq!(metrics.total_sessions, 0);
    assert_eq!(metrics.plan_version, None);
}
