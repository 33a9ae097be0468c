use studyflow_core_lib::db::repositories::PlanRepository;
use studyflow_core_lib::db::DbPool;
use studyflow_core_lib::models::plan::{PlanRecord, Session, SessionSource, SessionStatus};
use studyflow_core_lib::services::ics_emitter::plan_to_ics;
use tempfile::tempdir;

fn session(id: &str, source: SessionSource, subject: &str) -> Session {
    Session {
        id: id.into(),
        source,
        task_id: Some("task-1".into()),
        habit_id: None,
        subject: subject.into(),
        title: "Derivatives".into(),
        planned_start: "2025-03-10T08:00:00+07:00".into(),
        planned_end: "2025-03-10T08:45:00+07:00".into(),
        minutes: 45,
        buffer_minutes: 0,
        status: SessionStatus::Pending,
        checklist: None,
        success_criteria: Some(vec!["Solve problem set 4".into()]),
        milestone_title: None,
        completed_at: None,
        plan_version: 1,
    }
}

#[test]
fn exported_ics_for_a_stored_plan_has_crlf_line_endings_and_skips_breaks() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("ics.sqlite")).expect("db pool");

    let seed = PlanRecord {
        id: "plan-1".into(),
        owner_id: "owner-1".into(),
        plan_version: 1,
        sessions: vec![
            session("s1", SessionSource::Task, "Math"),
            session("s2", SessionSource::Break, "Break"),
        ],
        unscheduled_tasks: vec![],
        suggestions: vec![],
        generated_at: "2025-03-10T01:00:00+00:00".into(),
    };
    pool.with_connection_mut(|conn| PlanRepository::save_with_next_version(conn, "owner-1", |_| seed))
        .expect("persist plan");

    let stored = pool
        .with_connection(|conn| PlanRepository::get_latest(conn, "owner-1"))
        .unwrap()
        .expect("plan exists");

    let ics = plan_to_ics(&stored);

    assert!(ics.contains("\r\n"));
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
    assert!(ics.contains("UID:s1@studyflow"));
    assert!(!ics.contains("UID:s2@studyflow"));
    assert!(ics.starts_with("BEGIN:VCALENDAR"));
    assert!(ics.trim_end().ends_with("END:VCALENDAR"));
}
