use studyflow_core_lib::db::repositories::PlanRepository;
use studyflow_core_lib::db::DbPool;
use studyflow_core_lib::models::plan::{PlanRecord, Session, SessionSource, SessionStatus};
use studyflow_core_lib::models::task::Task;
use tempfile::tempdir;

fn session(id: &str, source: SessionSource, task_id: Option<&str>, habit_id: Option<&str>) -> Session {
    Session {
        id: id.into(),
        source,
        task_id: task_id.map(String::from),
        habit_id: habit_id.map(String::from),
        subject: "Art".into(),
        title: "Sketching".into(),
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

fn unscheduled_task(id: &str) -> Task {
    Task {
        id: id.into(),
        owner_id: "owner-1".into(),
        subject: "Art".into(),
        title: "Portfolio piece".into(),
        deadline: "2025-04-01T00:00:00+07:00".into(),
        timezone: "+07:00".into(),
        difficulty: 2,
        importance: None,
        estimated_minutes: 60,
        progress_minutes: 0,
        duration_estimate_min: None,
        duration_estimate_max: None,
        duration_unit: None,
        content_focus: None,
        success_criteria: vec![],
        milestones: None,
        notes: None,
        created_at: "2025-01-01T00:00:00+07:00".into(),
        updated_at: "2025-01-01T00:00:00+07:00".into(),
    }
}

/// Deleting a task must strip its scheduled sessions AND its unscheduled
/// entry from every stored plan, even when only the unscheduled half of a
/// plan references that task.
#[test]
fn removing_a_task_clears_both_sessions_and_unscheduled_entries() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("cascade.sqlite")).expect("db pool");

    let plan_with_session = PlanRecord {
        id: "plan-a".into(),
        owner_id: "owner-1".into(),
        plan_version: 1,
        sessions: vec![session("s1", SessionSource::Task, Some("task-1"), None)],
        unscheduled_tasks: vec![],
        suggestions: vec![],
        generated_at: "2025-03-10T00:00:00+00:00".into(),
    };
    pool.with_connection_mut(|conn| {
        PlanRepository::save_with_next_version(conn, "owner-1", |_| plan_with_session)
    })
    .unwrap();

    PlanRepository::remove_task_from_plans(
        &pool.get_connection().unwrap(),
        "owner-1",
        "task-1",
    )
    .unwrap();

    let after = pool
        .with_connection(|conn| PlanRepository::get_latest(conn, "owner-1"))
        .unwrap()
        .expect("plan still exists");
    assert!(after.sessions.is_empty());

    // A second plan where the task only ever appears as unscheduled (no
    // session) must also be cleared, exercising the half of the cascade
    // that a naive before/after-retain comparison would miss.
    let plan_with_unscheduled_only = PlanRecord {
        id: "plan-b".into(),
        owner_id: "owner-2".into(),
        plan_version: 1,
        sessions: vec![],
        unscheduled_tasks: vec![unscheduled_task("task-2")],
        suggestions: vec![],
        generated_at: "2025-03-10T00:00:00+00:00".into(),
    };
    pool.with_connection_mut(|conn| {
        PlanRepository::save_with_next_version(conn, "owner-2", |_| plan_with_unscheduled_only)
    })
    .unwrap();

    PlanRepository::remove_task_from_plans(
        &pool.get_connection().unwrap(),
        "owner-2",
        "task-2",
    )
    .unwrap();

    let after_b = pool
        .with_connection(|conn| PlanRepository::get_latest(conn, "owner-2"))
        .unwrap()
        .expect("plan still exists");
    assert!(after_b.unscheduled_tasks.is_empty());
}

#[test]
fn removing_a_habit_clears_its_sessions_only() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("cascade.sqlite")).expect("db pool");

    let seed = PlanRecord {
        id: "plan-a".into(),
        owner_id: "owner-1".into(),
        plan_version: 1,
        sessions: vec![
            session("s1", SessionSource::Habit, None, Some("habit-1")),
            session("s2", SessionSource::Task, Some("task-1"), None),
        ],
        unscheduled_tasks: vec![],
        suggestions: vec![],
        generated_at: "2025-03-10T00:00:00+00:00".into(),
    };
    pool.with_connection_mut(|conn| PlanRepository::save_with_next_version(conn, "owner-1", |_| seed))
        .unwrap();

    PlanRepository::remove_habit_from_plans(&pool.get_connection().unwrap(), "owner-1", "habit-1").unwrap();

    let after = pool
        .with_connection(|conn| PlanRepository::get_latest(conn, "owner-1"))
        .unwrap()
        .expect("plan still exists");
    assert_eq!(after.sessions.len(), 1);
    assert_eq!(after.sessions[0].id, "s2");
}
