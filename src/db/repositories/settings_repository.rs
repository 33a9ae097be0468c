use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::AppResult;
use crate::models::settings::{BreakPreset, Settings};

const BASE_SELECT: &str = r#"
    SELECT owner_id, daily_limit_minutes, buffer_percent, break_focus_minutes,
           break_rest_minutes, break_label, timezone, last_updated
    FROM settings
"#;

impl TryFrom<&Row<'_>> for Settings {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            owner_id: row.get("owner_id")?,
            daily_limit_minutes: row.get("daily_limit_minutes")?,
            buffer_percent: row.get("buffer_percent")?,
            break_preset: BreakPreset {
                focus: row.get("break_focus_minutes")?,
                rest: row.get("break_rest_minutes")?,
                label: row.get("break_label")?,
            },
            timezone: row.get("timezone")?,
            last_updated: row.get("last_updated")?,
        })
    }
}

pub struct SettingsRepository;

impl SettingsRepository {
    /// Returns the owner's settings, materializing and persisting the
    /// default row on first read (spec.md §2).
    pub fn get_or_default(conn: &Connection, owner_id: &str, now_iso: &str) -> AppResult<Settings> {
        let mut stmt = conn.prepare(&format!("{BASE_SELECT} WHERE owner_id = ?1"))?;
        let existing = stmt
            .query_row([owner_id], |row| Settings::try_from(row))
            .optional()?;

        match existing {
            Some(settings) => Ok(settings),
            None => {
                let defaults = Settings::defaults(owner_id, now_iso);
                Self::upsert(conn, &defaults)?;
                Ok(defaults)
            }
        }
    }

    pub fn upsert(conn: &Connection, settings: &Settings) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO settings (
                    owner_id, daily_limit_minutes, buffer_percent, break_focus_minutes,
                    break_rest_minutes, break_label, timezone, last_updated
                ) VALUES (
                    :owner_id, :daily_limit_minutes, :buffer_percent, :break_focus_minutes,
                    :break_rest_minutes, :break_label, :timezone, :last_updated
                )
                ON CONFLICT(owner_id) DO UPDATE SET
                    daily_limit_minutes = excluded.daily_limit_minutes,
                    buffer_percent = excluded.buffer_percent,
                    break_focus_minutes = excluded.break_focus_minutes,
                    break_rest_minutes = excluded.break_rest_minutes,
                    break_label = excluded.break_label,
                    timezone = excluded.timezone,
                    last_updated = excluded.last_updated
            "#,
            named_params! {
                ":owner_id": settings.owner_id,
                ":daily_limit_minutes": settings.daily_limit_minutes,
                ":buffer_percent": settings.buffer_percent,
                ":break_focus_minutes": settings.break_preset.focus,
                ":break_rest_minutes": settings.break_preset.rest,
                ":break_label": settings.break_preset.label,
                ":timezone": settings.timezone,
                ":last_updated": settings.last_updated,
            },
        )?;
        Ok(())
    }
}
