use chrono::{DateTime, Duration, FixedOffset, Utc};
use uuid::Uuid;

use crate::models::habit::Habit;
use crate::models::plan::{PlanRecord, PlanSuggestion};
use crate::models::settings::Settings;
use crate::models::slot::FreeSlot;
use crate::models::task::Task;
use crate::services::break_interleaver::interleave_breaks;
use crate::services::day_bucket::build_buckets;
use crate::services::habit_scheduler::schedule_habits;
use crate::services::prioritizer::prioritize;
use crate::services::slot_cleaner::clean_slots;
use crate::services::task_scheduler::schedule_tasks;
use crate::services::time_util::parse_datetime;

const HABIT_ONLY_WINDOW_DAYS: i64 = 14;

/// Builds one `PlanRecord` from the owner's current tasks/habits/slots at
/// `now` (spec.md §4, orchestrating C2–C9). Pure: callers own persistence.
pub fn build_plan(
    now: DateTime<FixedOffset>,
    owner_id: &str,
    tasks: Vec<Task>,
    free_slots: Vec<FreeSlot>,
    habits: Vec<Habit>,
    settings: &Settings,
    previous_plan_version: Option<i64>,
) -> PlanRecord {
    let cleaned = clean_slots(&free_slots);
    let plan_version = previous_plan_version.unwrap_or(0) + 1;

    let future_tasks: Vec<Task> = tasks
        .into_iter()
        .filter(|t| parse_datetime(&t.deadline).map(|dl| dl > now).unwrap_or(false))
        .collect();
    let prioritized = prioritize(future_tasks);

    let mut latest_deadline = now;
    for task in &prioritized {
        if let Ok(dl) = parse_datetime(&task.deadline) {
            if dl > latest_deadline {
                latest_deadline = dl;
            }
        }
    }
    if prioritized.is_empty() && !habits.is_empty() {
        latest_deadline = now + Duration::days(HABIT_ONLY_WINDOW_DAYS);
    }

    let mut buckets = if prioritized.is_empty() && habits.is_empty() {
        Vec::new()
    } else {
        build_buckets(now, latest_deadline, &cleaned.slots, settings)
    };

    let (habit_sessions, habit_suggestions) =
        schedule_habits(&mut buckets, &habits, settings.buffer_percent, plan_version);

    let total_capacity: i64 = buckets.iter().map(|b| b.allowed_minutes).sum();
    let total_demand: i64 = prioritized
        .iter()
        .map(|t| (t.estimated_minutes - t.progress_minutes).max(0))
        .sum();

    let mut suggestions: Vec<PlanSuggestion> = habit_suggestions;
    if total_capacity < total_demand {
        suggestions.push(PlanSuggestion::new(
            "increase_free_time",
            "Not enough free time to fit every task. Add a slot or raise the daily limit.",
        ));
    }
    for warning in &cleaned.warnings {
        suggestions.push(PlanSuggestion::new("increase_free_time", warning.clone()));
    }

    let task_result = schedule_tasks(&mut buckets, prioritized, settings, plan_version);
    suggestions.extend(task_result.suggestions);

    let mut sessions = habit_sessions;
    sessions.extend(task_result.sessions);
    let sessions = interleave_breaks(sessions, settings, plan_version);

    PlanRecord {
        id: Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        plan_version,
        sessions,
        unscheduled_tasks: task_result.unscheduled,
        suggestions,
        generated_at: now.with_timezone(&Utc).to_rfc3339(),
    }
}
