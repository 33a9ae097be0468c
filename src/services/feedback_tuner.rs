use crate::models::feedback::{Feedback, FeedbackLabel};
use crate::models::settings::Settings;

const MAX_BUFFER_PERCENT: f64 = 0.5;
const MIN_BUFFER_PERCENT: f64 = 0.05;
const BUFFER_STEP_UP: f64 = 0.1;
const BUFFER_STEP_DOWN: f64 = 0.05;
const MAX_DAILY_LIMIT_MINUTES: i64 = 600;
const DAILY_LIMIT_STEP: i64 = 30;

/// Nudges settings per the most recently submitted feedback entry before a
/// rebuild (spec.md §4.8). Feedback older than the latest is ignored; the
/// effect never compounds across multiple stale entries.
pub fn tune_settings(settings: &Settings, feedback: &[Feedback]) -> Settings {
    let mut tuned = settings.clone();

    let Some(latest) = feedback.iter().max_by_key(|f| f.submitted_at.clone()) else {
        return tuned;
    };

    match latest.label {
        FeedbackLabel::TooDense => {
            tuned.buffer_percent = (tuned.buffer_percent + BUFFER_STEP_UP).min(MAX_BUFFER_PERCENT);
        }
        FeedbackLabel::TooEasy => {
            tuned.buffer_percent = (tuned.buffer_percent - BUFFER_STEP_DOWN).max(MIN_BUFFER_PERCENT);
        }
        FeedbackLabel::NeedMoreTime => {
            tuned.daily_limit_minutes =
                (tuned.daily_limit_minutes + DAILY_LIMIT_STEP).min(MAX_DAILY_LIMIT_MINUTES);
        }
        FeedbackLabel::EveningFocus | FeedbackLabel::Custom => {}
    }

    tuned
}
