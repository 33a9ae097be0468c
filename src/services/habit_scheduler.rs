use uuid::Uuid;

use crate::models::habit::{Habit, HabitCadence};
use crate::models::plan::{PlanSuggestion, Session, SessionSource, SessionStatus};
use crate::services::allocator::allocate;
use crate::services::day_bucket::DayBucket;
use crate::services::time_util::format_datetime;

/// Emits habit sessions across buckets honoring cadence (spec.md §4.5).
pub fn schedule_habits(
    buckets: &mut [DayBucket],
    habits: &[Habit],
    buffer_percent: f64,
    plan_version: i64,
) -> (Vec<Session>, Vec<PlanSuggestion>) {
    let mut sessions = Vec::new();
    let mut suggestions = Vec::new();

    for bucket in buckets.iter_mut() {
        for habit in habits {
            let eligible = match habit.cadence {
                HabitCadence::Daily => true,
                HabitCadence::Weekly => habit.weekday == Some(bucket.weekday),
            };
            if !eligible {
                continue;
            }

            let mut remaining = habit.minutes;
            let mut placed_any = false;

            loop {
                let Some(placement) = allocate(bucket, remaining, habit.minutes, true) else {
                    break;
                };
                placed_any = true;
                let buffer_minutes = (placement.minutes as f64 * buffer_percent * 0.5).round() as i64;
                sessions.push(Session {
                    id: Uuid::new_v4().to_string(),
                    source: SessionSource::Habit,
                    task_id: None,
                    habit_id: Some(habit.id.clone()),
                    subject: "Habit".to_string(),
                    title: habit.name.clone(),
                    planned_start: format_datetime(placement.start),
                    planned_end: format_datetime(placement.end),
                    minutes: placement.minutes,
                    buffer_minutes,
                    status: SessionStatus::Pending,
                    checklist: None,
                    success_criteria: Some(vec![format!(
                        "Sustain {} minutes",
                        placement.minutes
                    )]),
                    milestone_title: None,
                    completed_at: None,
                    plan_version,
                });
                remaining -= placement.minutes;
                if remaining <= 0 {
                    break;
                }
            }

            if !placed_any {
                suggestions.push(PlanSuggestion::new(
                    "increase_free_time",
                    format!(
                        "insufficient slot for habit {} on {}",
                        habit.name, bucket.iso_date
                    ),
                ));
            }
        }
    }

    (sessions, suggestions)
}
