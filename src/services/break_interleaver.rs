use std::collections::BTreeMap;

use uuid::Uuid;

use crate::models::plan::{Session, SessionSource, SessionStatus};
use crate::models::settings::Settings;
use crate::services::time_util::{add_minutes, diff_minutes, parse_datetime};

const GAP_TOLERANCE_MINUTES: i64 = 5;
const HEAVY_LOAD_MINUTES: i64 = 90;
const HEAVY_LOAD_EXTRA_REST: i64 = 5;

/// Inserts break sessions between consecutive focus/habit sessions on the
/// same day when the gap between them is small enough to be "back to back"
/// (spec.md §4.7). Sessions on separate days are never bridged.
pub fn interleave_breaks(sessions: Vec<Session>, settings: &Settings, plan_version: i64) -> Vec<Session> {
    if sessions.is_empty() {
        return sessions;
    }

    let mut by_day: BTreeMap<String, Vec<Session>> = BTreeMap::new();
    for session in sessions {
        let key = session.planned_start.get(0..10).unwrap_or("").to_string();
        by_day.entry(key).or_default().push(session);
    }

    let rest_base = if settings.break_preset.rest > 0 {
        settings.break_preset.rest
    } else {
        5
    };
    let break_label = if settings.break_preset.label.is_empty() {
        "Break".to_string()
    } else {
        settings.break_preset.label.clone()
    };

    let mut result = Vec::new();
    for (_, mut day_sessions) in by_day {
        day_sessions.sort_by(|a, b| a.planned_start.cmp(&b.planned_start));
        let mut offset = 0i64;

        for i in 0..day_sessions.len() {
            let mut session = day_sessions[i].clone();
            let Ok(start) = parse_datetime(&session.planned_start) else {
                result.push(session);
                continue;
            };
            let Ok(end) = parse_datetime(&session.planned_end) else {
                result.push(session);
                continue;
            };
            let shifted_start = add_minutes(start, offset);
            let shifted_end = add_minutes(end, offset);
            session.planned_start = crate::services::time_util::format_datetime(shifted_start);
            session.planned_end = crate::services::time_util::format_datetime(shifted_end);
            result.push(session.clone());

            if session.source == SessionSource::Break {
                continue;
            }

            let Some(next) = day_sessions.get(i + 1) else {
                continue;
            };
            if next.source == SessionSource::Break {
                continue;
            }
            let Ok(next_start) = parse_datetime(&next.planned_start) else {
                continue;
            };
            let gap = diff_minutes(end, next_start);
            if gap > GAP_TOLERANCE_MINUTES {
                continue;
            }

            let contiguous_load = session.minutes + next.minutes;
            let rest_minutes = if contiguous_load >= HEAVY_LOAD_MINUTES {
                rest_base + HEAVY_LOAD_EXTRA_REST
            } else {
                rest_base
            };
            let break_start = shifted_end;
            let break_end = add_minutes(break_start, rest_minutes);
            result.push(Session {
                id: Uuid::new_v4().to_string(),
                source: SessionSource::Break,
                task_id: None,
                habit_id: None,
                subject: "Break".to_string(),
                title: break_label.clone(),
                planned_start: crate::services::time_util::format_datetime(break_start),
                planned_end: crate::services::time_util::format_datetime(break_end),
                minutes: rest_minutes,
                buffer_minutes: 0,
                status: SessionStatus::Pending,
                checklist: None,
                success_criteria: Some(vec!["Rest".to_string()]),
                milestone_title: None,
                completed_at: None,
                plan_version,
            });
            offset += rest_minutes;
        }
    }

    result.sort_by(|a, b| a.planned_start.cmp(&b.planned_start));
    result
}
