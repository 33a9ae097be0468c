use crate::models::task::Task;
use crate::services::time_util::parse_datetime;

/// Orders tasks ascending by `(deadline, -importance, -difficulty, -estimatedMinutes)`.
/// Missing importance is treated as 0. The sort is total and stable (spec.md §4.3).
pub fn prioritize(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| {
        let deadline_a = parse_datetime(&a.deadline).map(|d| d.timestamp()).unwrap_or(i64::MAX);
        let deadline_b = parse_datetime(&b.deadline).map(|d| d.timestamp()).unwrap_or(i64::MAX);
        deadline_a
            .cmp(&deadline_b)
            .then_with(|| b.importance.unwrap_or(0).cmp(&a.importance.unwrap_or(0)))
            .then_with(|| b.difficulty.cmp(&a.difficulty))
            .then_with(|| b.estimated_minutes.cmp(&a.estimated_minutes))
    });
    tasks
}
