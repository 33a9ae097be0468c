use studyflow_core_lib::db::repositories::PlanRepository;
use studyflow_core_lib::db::DbPool;
use studyflow_core_lib::models::plan::{PlanRecord, Session, SessionSource, SessionStatus};
use tempfile::tempdir;

fn bare_session(id: &str) -> Session {
    Session {
        id: id.into(),
        source: SessionSource::Task,
        task_id: Some("task-1".into()),
        habit_id: None,
        subject: "History".into(),
        title: "Reading".into(),
        planned_start: "2025-03-10T08:00:00+07:00".into(),
        planned_end: "2025-03-10T08:30:00+07:00".into(),
        minutes: 30,
        buffer_minutes: 0,
        status: SessionStatus::Pending,
        checklist: None,
        success_criteria: None,
        milestone_title: None,
        completed_at: None,
        plan_version: 1,
    }
}

fn build(version: i64, sessions: Vec<Session>) -> PlanRecord {
    PlanRecord {
        id: format!("plan-{version}"),
        owner_id: "owner-1".into(),
        plan_version: version,
        sessions,
        unscheduled_tasks: vec![],
        suggestions: vec![],
        generated_at: "2025-03-10T00:00:00+00:00".into(),
    }
}

#[test]
fn each_rebuild_increments_plan_version_and_keeps_history() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("plans.sqlite")).expect("db pool");

    for _ in 0..3 {
        pool.with_connection_mut(|conn| {
            PlanRepository::save_with_next_version(conn, "owner-1", |previous| {
                build(previous.unwrap_or(0) + 1, vec![bare_session("s1")])
            })
        })
        .expect("persist plan");
    }

    let latest = pool
        .with_connection(|conn| PlanRepository::get_latest(conn, "owner-1"))
        .unwrap()
        .expect("a plan exists");
    assert_eq!(latest.plan_version, 3);

    let history = pool
        .with_connection(|conn| PlanRepository::list_recent(conn, "owner-1", 10))
        .unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].plan_version, 3);
    assert_eq!(history[2].plan_version, 1);
}

#[test]
fn updating_a_session_status_marks_completed_at_and_persists() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("plans.sqlite")).expect("db pool");

    pool.with_connection_mut(|conn| {
        PlanRepository::save_with_next_version(conn, "owner-1", |_| build(1, vec![bare_session("s1")]))
    })
    .expect("persist plan");

    let updated = pool
        .with_connection(|conn| PlanRepository::update_session_status(conn, "owner-1", "s1", SessionStatus::Done))
        .unwrap()
        .expect("session exists");
    let session = updated.sessions.iter().find(|s| s.id == "s1").unwrap();
    assert_eq!(session.status, SessionStatus::Done);
    assert!(session.completed_at.is_some());

    let reloaded = pool
        .with_connection(|conn| PlanRepository::get_latest(conn, "owner-1"))
        .unwrap()
        .expect("plan exists");
    let reloaded_session = reloaded.sessions.iter().find(|s| s.id == "s1").unwrap();
    assert_eq!(reloaded_session.status, SessionStatus::Done);
}

#[test]
fn updating_an_unknown_session_returns_none() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("plans.sqlite")).expect("db pool");

    pool.with_connection_mut(|conn| {
        PlanRepository::save_with_next_version(conn, "owner-1", |_| build(1, vec![bare_session("s1")]))
    })
    .expect("persist plan");

    let result = pool
        .with_connection(|conn| PlanRepository::update_session_status(conn, "owner-1", "missing", SessionStatus::Done))
        .unwrap();
    assert!(result.is_none());
}
