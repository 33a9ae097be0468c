use uuid::Uuid;

use crate::models::plan::{PlanSuggestion, Session, SessionSource, SessionStatus};
use crate::models::settings::Settings;
use crate::models::task::Task;
use crate::services::allocator::allocate;
use crate::services::day_bucket::DayBucket;
use crate::services::time_util::{format_datetime, parse_datetime};

pub struct TaskScheduleResult {
    pub sessions: Vec<Session>,
    pub unscheduled: Vec<Task>,
    pub suggestions: Vec<PlanSuggestion>,
}

/// Places prioritized tasks into day buckets, splitting by milestone when
/// present (spec.md §4.6). `tasks` must already be deadline/importance
/// ordered (see [`crate::services::prioritizer::prioritize`]).
pub fn schedule_tasks(
    buckets: &mut [DayBucket],
    tasks: Vec<Task>,
    settings: &Settings,
    plan_version: i64,
) -> TaskScheduleResult {
    let mut sessions = Vec::new();
    let mut unscheduled = Vec::new();
    let mut suggestions = Vec::new();
    let focus_chunk = settings.break_preset.focus;

    for task in tasks {
        let mut remaining = (task.estimated_minutes - task.progress_minutes).max(0);
        let deadline = match parse_datetime(&task.deadline) {
            Ok(dl) => dl,
            Err(_) => {
                unscheduled.push(task);
                continue;
            }
        };

        let eligible: Vec<usize> = buckets
            .iter()
            .enumerate()
            .filter(|(_, b)| bucket_end_of_day(b) <= deadline)
            .map(|(i, _)| i)
            .collect();

        if eligible.is_empty() {
            suggestions.push(PlanSuggestion::new(
                "increase_free_time",
                format!("task \"{}\" does not fall within any slot", task.title),
            ));
            unscheduled.push(task);
            continue;
        }

        let base_criteria = if task.success_criteria.is_empty() {
            vec!["Complete study session".to_string()]
        } else {
            task.success_criteria.clone()
        };
        let checklist = task.content_focus.as_deref().map(|focus| {
            focus
                .lines()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
        });

        if let Some(milestones) = task.milestones.clone() {
            for milestone in milestones {
                let mut ms_remaining = milestone.minutes_estimate.min(remaining);
                for &idx in &eligible {
                    if ms_remaining <= 0 {
                        break;
                    }
                    ms_remaining = place_into_bucket(
                        &mut buckets[idx],
                        ms_remaining,
                        milestone.minutes_estimate,
                        true,
                        &mut sessions,
                        &task,
                        &base_criteria,
                        &checklist,
                        Some(milestone.title.clone()),
                        settings.buffer_percent,
                        plan_version,
                        &mut remaining,
                    );
                }
            }
        } else {
            for &idx in &eligible {
                if remaining <= 0 {
                    break;
                }
                let local_remaining = remaining;
                place_into_bucket(
                    &mut buckets[idx],
                    local_remaining,
                    focus_chunk,
                    false,
                    &mut sessions,
                    &task,
                    &base_criteria,
                    &checklist,
                    None,
                    settings.buffer_percent,
                    plan_version,
                    &mut remaining,
                );
            }
        }

        if remaining > 0 {
            suggestions.push(PlanSuggestion::new(
                "reduce_duration",
                format!(
                    "task \"{}\" is short {} minutes; shrink its scope or add a slot",
                    task.title, remaining
                ),
            ));
            unscheduled.push(task);
        }
    }

    TaskScheduleResult {
        sessions,
        unscheduled,
        suggestions,
    }
}

/// Drains `local_remaining` minutes from `bucket`, emitting one session per
/// allocator placement, and returns the minutes still unplaced locally while
/// also decrementing the task-wide `remaining` counter.
#[allow(clippy::too_many_arguments)]
fn place_into_bucket(
    bucket: &mut DayBucket,
    mut local_remaining: i64,
    chunk_pref: i64,
    allow_shorter_than_min: bool,
    sessions: &mut Vec<Session>,
    task: &Task,
    base_criteria: &[String],
    checklist: &Option<Vec<String>>,
    milestone_title: Option<String>,
    buffer_percent: f64,
    plan_version: i64,
    task_remaining: &mut i64,
) -> i64 {
    while local_remaining > 0 {
        let Some(placement) = allocate(bucket, local_remaining, chunk_pref, allow_shorter_than_min)
        else {
            break;
        };
        let buffer_minutes = (placement.minutes as f64 * buffer_percent).round() as i64;
        sessions.push(Session {
            id: Uuid::new_v4().to_string(),
            source: SessionSource::Task,
            task_id: Some(task.id.clone()),
            habit_id: None,
            subject: task.subject.clone(),
            title: task.title.clone(),
            planned_start: format_datetime(placement.start),
            planned_end: format_datetime(placement.end),
            minutes: placement.minutes,
            buffer_minutes,
            status: SessionStatus::Pending,
            checklist: checklist.clone(),
            success_criteria: Some(base_criteria.to_vec()),
            milestone_title: milestone_title.clone(),
            completed_at: None,
            plan_version,
        });
        local_remaining -= placement.minutes;
        *task_remaining -= placement.minutes;
    }
    local_remaining
}

fn bucket_end_of_day(bucket: &DayBucket) -> chrono::DateTime<chrono::FixedOffset> {
    use chrono::TimeZone;
    let s = &bucket.segments[0];
    let date = s.start.date_naive();
    (*s.start.offset())
        .from_local_datetime(&date.and_hms_opt(23, 59, 0).expect("valid time"))
        .single()
        .expect("fixed offsets never produce ambiguous local times")
}
