use chrono::{DateTime, FixedOffset, Utc};

/// Supplies "now" in a caller-chosen offset. Pure helper used throughout the
/// planner so tests can run against a fixed instant (spec.md C1).
pub trait Clock: Send + Sync {
    fn now(&self, tz: FixedOffset) -> DateTime<FixedOffset>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self, tz: FixedOffset) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&tz)
    }
}

/// A clock that always returns the same instant, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self, tz: FixedOffset) -> DateTime<FixedOffset> {
        self.0.with_timezone(&tz)
    }
}

/// Parses a settings `timezone` string (`+HH:MM`/`-HH:MM`) into a `FixedOffset`,
/// falling back to UTC+7 (spec.md's stated default) on malformed input.
pub fn parse_offset(timezone: &str) -> FixedOffset {
    parse_offset_opt(timezone).unwrap_or_else(default_offset)
}

fn parse_offset_opt(timezone: &str) -> Option<FixedOffset> {
    let (sign, rest) = match timezone.as_bytes().first()? {
        b'+' => (1, &timezone[1..]),
        b'-' => (-1, &timezone[1..]),
        _ => return None,
    };
    let mut parts = rest.splitn(2, ':');
    let hours: i32 = parts.next()?.parse().ok()?;
    let minutes: i32 = parts.next().unwrap_or("0").parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

pub fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).expect("UTC+7 is a valid offset")
}
