use chrono::{FixedOffset, TimeZone};
use studyflow_core_lib::models::habit::{Habit, HabitCadence};
use studyflow_core_lib::models::plan::SessionSource;
use studyflow_core_lib::models::settings::Settings;
use studyflow_core_lib::models::slot::FreeSlot;
use studyflow_core_lib::models::task::Task;
use studyflow_core_lib::services::planning_service::build_plan;

fn task(estimated_minutes: i64) -> Task {
    Task {
        id: "task-1".into(),
        owner_id: "owner-1".into(),
        subject: "Chemistry".into(),
        title: "Stoichiometry practice".into(),
        deadline: "2025-03-15T00:00:00+07:00".into(),
        timezone: "+07:00".into(),
        difficulty: 4,
        importance: Some(3),
        estimated_minutes,
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

fn habit() -> Habit {
    Habit {
        id: "habit-1".into(),
        owner_id: "owner-1".into(),
        name: "Morning reading".into(),
        cadence: HabitCadence::Daily,
        weekday: None,
        minutes: 20,
        preset: None,
        preferred_start: None,
        energy_window: None,
        created_at: "2025-01-01T00:00:00+07:00".into(),
    }
}

fn slot(weekday: u8) -> FreeSlot {
    let mut s = FreeSlot {
        id: format!("slot-{weekday}"),
        owner_id: "owner-1".into(),
        weekday,
        start_time: "08:00".into(),
        end_time: "11:00".into(),
        capacity_minutes: 0,
        created_at: "2025-01-01T00:00:00+07:00".into(),
    };
    s.recompute_capacity();
    s
}

/// A full plan-build (habits scheduled first, then tasks back-to-back in the
/// same bucket) should end up with break sessions wedged between them.
#[test]
fn a_rebuilt_plan_inserts_breaks_between_back_to_back_sessions() {
    let tz = FixedOffset::east_opt(7 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(); // Monday

    let mut settings = Settings::defaults("owner-1", "2025-01-01T00:00:00+07:00");
    settings.buffer_percent = 0.0;

    let plan = build_plan(
        now,
        "owner-1",
        vec![task(120)],
        vec![slot(1)],
        vec![habit()],
        &settings,
        None,
    );

    assert!(plan.sessions.iter().any(|s| s.source == SessionSource::Break));
    assert!(plan.sessions.iter().any(|s| s.source == SessionSource::Habit));
    assert!(plan.sessions.iter().any(|s| s.source == SessionSource::Task));

    // Sessions on the day must be contiguous: each session's start equals
    // the previous session's end once breaks are accounted for.
    let mut day: Vec<_> = plan.sessions.iter().collect();
    day.sort_by(|a, b| a.planned_start.cmp(&b.planned_start));
    for pair in day.windows(2) {
        assert_eq!(pair[0].planned_end, pair[1].planned_start);
    }
}
