use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::plan::{PlanRecord, SessionSource, SessionStatus};
use crate::models::settings::Settings;
use crate::models::slot::FreeSlot;
use crate::models::task::Task;

const OVERLOAD_PENALTY_PER_DAY: i64 = 10;
const OVERLOAD_PENALTY_CAP: i64 = 30;
const SHORTAGE_PENALTY_CAP: i64 = 25;
const MISSING_BREAK_PENALTY_PER_DAY: i64 = 5;
const MISSING_BREAK_PENALTY_CAP: i64 = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricsRange {
    Day,
    Week,
    Month,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetrics {
    pub range: MetricsRange,
    pub range_start: String,
    pub range_end: String,
    pub total_sessions: i64,
    pub done_sessions: i64,
    pub completion_rate: f64,
    pub feasibility_score: i64,
    pub feasibility_reasons: Vec<String>,
    pub plan_version: Option<i64>,
}

/// Computes `[rangeStart, rangeEnd)` (end exclusive) from an anchor date,
/// week starting Monday (spec.md §4.11).
pub fn compute_range(range: MetricsRange, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    match range {
        MetricsRange::Day => (anchor, anchor + Duration::days(1)),
        MetricsRange::Week => {
            let days_since_monday = anchor.weekday().num_days_from_monday() as i64;
            let start = anchor - Duration::days(days_since_monday);
            (start, start + Duration::days(7))
        }
        MetricsRange::Month => {
            let start = anchor.with_day(1).expect("day 1 is always valid");
            let next_month = if start.month() == 12 {
                NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
            }
            .expect("first of a month is always valid");
            (start, next_month)
        }
    }
}

/// Computes completion rate and a 0-100 feasibility score with reasons for
/// the given plan over `[range_start, range_end)` (spec.md §4.12).
pub fn compute_metrics(
    plan: Option<&PlanRecord>,
    settings: &Settings,
    slots: &[FreeSlot],
    tasks: &[Task],
    range: MetricsRange,
    range_start_date: &str,
    range_end_date: &str,
) -> PlanMetrics {
    let Some(plan) = plan else {
        return PlanMetrics {
            range,
            range_start: range_start_date.to_string(),
            range_end: range_end_date.to_string(),
            total_sessions: 0,
            done_sessions: 0,
            completion_rate: 0.0,
            feasibility_score: 0,
            feasibility_reasons: vec!["No plan yet — generate one first.".to_string()],
            plan_version: None,
        };
    };

    let in_range: Vec<_> = plan
        .sessions
        .iter()
        .filter(|s| s.source != SessionSource::Break)
        .filter(|s| {
            let day = s.planned_start.get(0..10).unwrap_or("");
            day >= range_start_date && day < range_end_date
        })
        .collect();

    let total = in_range.len() as i64;
    let done = in_range
        .iter()
        .filter(|s| s.status == SessionStatus::Done)
        .count() as i64;
    let completion_rate = if total > 0 {
        ((done as f64 / total as f64) * 1000.0).round() / 10.0
    } else {
        0.0
    };

    let mut by_day: BTreeMap<String, i64> = BTreeMap::new();
    for s in &in_range {
        let day = s.planned_start.get(0..10).unwrap_or("").to_string();
        *by_day.entry(day).or_insert(0) += s.minutes;
    }

    let total_slot_minutes: i64 = slots.iter().map(|s| s.capacity_minutes).sum();
    let total_demand: i64 = tasks
        .iter()
        .map(|t| (t.estimated_minutes - t.progress_minutes).max(0))
        .sum();

    let mut score: i64 = 100;
    let mut reasons = Vec::new();

    let overloaded: Vec<(&String, &i64)> = by_day
        .iter()
        .filter(|(_, &mins)| mins > settings.daily_limit_minutes)
        .collect();
    if !overloaded.is_empty() {
        let penalty = (overloaded.len() as i64 * OVERLOAD_PENALTY_PER_DAY).min(OVERLOAD_PENALTY_CAP);
        score -= penalty;
        let max_minutes = overloaded.iter().map(|(_, &m)| m).max().unwrap_or(0);
        reasons.push(format!(
            "Overloaded: {} day(s) exceed {}m/day (max {}m)",
            overloaded.len(),
            settings.daily_limit_minutes,
            max_minutes
        ));
    }

    if total_slot_minutes > 0 && total_demand > total_slot_minutes {
        let shortage_pct = (total_demand - total_slot_minutes) as f64 / total_demand as f64;
        let penalty = ((shortage_pct * 40.0) as i64).min(SHORTAGE_PENALTY_CAP);
        score -= penalty;
        reasons.push(format!(
            "Short on slots: need {total_demand}m but only {total_slot_minutes}m is free"
        ));
    }

    let break_days: BTreeSet<String> = plan
        .sessions
        .iter()
        .filter(|s| s.source == SessionSource::Break)
        .map(|s| s.planned_start.get(0..10).unwrap_or("").to_string())
        .collect();
    let focus_days: BTreeSet<String> = by_day.keys().cloned().collect();
    let missing_breaks: Vec<_> = focus_days.difference(&break_days).collect();
    if !missing_breaks.is_empty() {
        let penalty =
            (missing_breaks.len() as i64 * MISSING_BREAK_PENALTY_PER_DAY).min(MISSING_BREAK_PENALTY_CAP);
        score -= penalty;
        reasons.push(format!(
            "Missing rest sessions on {} day(s)",
            missing_breaks.len()
        ));
    }

    let feasibility_score = score.clamp(0, 100);

    PlanMetrics {
        range,
        range_start: range_start_date.to_string(),
        range_end: range_end_date.to_string(),
        total_sessions: total,
        done_sessions: done,
        completion_rate,
        feasibility_score,
        feasibility_reasons: reasons,
        plan_version: Some(plan.plan_version),
    }
}
