use std::convert::TryFrom;

use rusqlite::{named_params, Connection, Row};

use crate::error::AppResult;
use crate::models::habit::{Habit, HabitCadence};

const BASE_SELECT: &str = r#"
    SELECT id, owner_id, name, cadence, weekday, minutes, preset, preferred_start,
           energy_window, created_at
    FROM habits
"#;

struct HabitRow {
    id: String,
    owner_id: String,
    name: String,
    cadence: String,
    weekday: Option<u8>,
    minutes: i64,
    preset: Option<String>,
    preferred_start: Option<String>,
    energy_window: Option<String>,
    created_at: String,
}

impl TryFrom<&Row<'_>> for HabitRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            name: row.get("name")?,
            cadence: row.get("cadence")?,
            weekday: row.get("weekday")?,
            minutes: row.get("minutes")?,
            preset: row.get("preset")?,
            preferred_start: row.get("preferred_start")?,
            energy_window: row.get("energy_window")?,
            created_at: row.get("created_at")?,
        })
    }
}

impl HabitRow {
    fn into_habit(self) -> AppResult<Habit> {
        let cadence = match self.cadence.as_str() {
            "weekly" => HabitCadence::Weekly,
            _ => HabitCadence::Daily,
        };
        Ok(Habit {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            cadence,
            weekday: self.weekday,
            minutes: self.minutes,
            preset: self.preset,
            preferred_start: self.preferred_start,
            energy_window: self.energy_window,
            created_at: self.created_at,
        })
    }

    fn cadence_str(habit: &Habit) -> &'static str {
        match habit.cadence {
            HabitCadence::Daily => "daily",
            HabitCadence::Weekly => "weekly",
        }
    }
}

pub struct HabitRepository;

impl HabitRepository {
    pub fn list(conn: &Connection, owner_id: &str) -> AppResult<Vec<Habit>> {
        let mut stmt = conn.prepare(&format!("{BASE_SELECT} WHERE owner_id = ?1 ORDER BY created_at ASC"))?;
        let rows = stmt
            .query_map([owner_id], |row| HabitRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(HabitRow::into_habit).collect()
    }

    pub fn upsert(conn: &Connection, habit: &Habit) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO habits (
                    id, owner_id, name, cadence, weekday, minutes, preset, preferred_start,
                    energy_window, created_at
                ) VALUES (
                    :id, :owner_id, :name, :cadence, :weekday, :minutes, :preset, :preferred_start,
                    :energy_window, :created_at
                )
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    cadence = excluded.cadence,
                    weekday = excluded.weekday,
                    minutes = excluded.minutes,
                    preset = excluded.preset,
                    preferred_start = excluded.preferred_start,
                    energy_window = excluded.energy_window
            "#,
            named_params! {
                ":id": habit.id,
                ":owner_id": habit.owner_id,
                ":name": habit.name,
                ":cadence": HabitRow::cadence_str(habit),
                ":weekday": habit.weekday,
                ":minutes": habit.minutes,
                ":preset": habit.preset,
                ":preferred_start": habit.preferred_start,
                ":energy_window": habit.energy_window,
                ":created_at": habit.created_at,
            },
        )?;
        Ok(())
    }

    pub fn delete(conn: &Connection, owner_id: &str, id: &str) -> AppResult<()> {
        conn.execute(
            "DELETE FROM habits WHERE owner_id = ?1 AND id = ?2",
            [owner_id, id],
        )?;
        Ok(())
    }
}
