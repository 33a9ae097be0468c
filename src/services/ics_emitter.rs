use chrono::Utc;

use crate::models::plan::{PlanRecord, SessionSource};
use crate::services::time_util::parse_datetime;

const CRLF: &str = "\r\n";
const PALETTE: [&str; 6] = ["#6EE7B7", "#93C5FD", "#FCD34D", "#FCA5A5", "#C4B5FD", "#F9A8D4"];

/// Renders a plan's non-break sessions as an RFC 5545 calendar (spec.md §4.11).
pub fn plan_to_ics(plan: &PlanRecord) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//StudyFlow//Planner 1.0//VI".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
    ];

    let stamp = format_instant(&plan.generated_at);

    for session in &plan.sessions {
        if session.source == SessionSource::Break {
            continue;
        }
        let description = match &session.success_criteria {
            Some(criteria) if !criteria.is_empty() => criteria.join(" \u{2022} "),
            _ => "Complete study session".to_string(),
        };
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}@studyflow", session.id));
        lines.push(format!("DTSTAMP:{stamp}"));
        lines.push(format!("DTSTART:{}", format_instant(&session.planned_start)));
        lines.push(format!("DTEND:{}", format_instant(&session.planned_end)));
        lines.push(format!("SUMMARY:{} \u{b7} {}", session.subject, session.title));
        lines.push(format!("DESCRIPTION:{description}"));
        lines.push(format!("CATEGORIES:{}", session.subject));
        lines.push(format!("COLOR:{}", palette_color(&session.subject)));
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());
    lines.join(CRLF)
}

fn palette_color(subject: &str) -> &'static str {
    let sum: u32 = subject.chars().map(|c| c as u32).sum();
    PALETTE[(sum as usize) % PALETTE.len()]
}

fn format_instant(iso: &str) -> String {
    match parse_datetime(iso) {
        Ok(dt) => dt.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string(),
        Err(_) => iso.to_string(),
    }
}
