use std::convert::TryFrom;

use rusqlite::{named_params, Connection, Row};

use crate::error::AppResult;
use crate::models::slot::FreeSlot;

const BASE_SELECT: &str = r#"
    SELECT id, owner_id, weekday, start_time, end_time, capacity_minutes, created_at
    FROM free_slots
"#;

impl TryFrom<&Row<'_>> for FreeSlot {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            weekday: row.get("weekday")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            capacity_minutes: row.get("capacity_minutes")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub struct SlotRepository;

impl SlotRepository {
    pub fn list(conn: &Connection, owner_id: &str) -> AppResult<Vec<FreeSlot>> {
        let mut stmt = conn.prepare(&format!("{BASE_SELECT} WHERE owner_id = ?1 ORDER BY weekday ASC, start_time ASC"))?;
        let rows = stmt
            .query_map([owner_id], |row| FreeSlot::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn upsert(conn: &Connection, slot: &FreeSlot) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO free_slots (
                    id, owner_id, weekday, start_time, end_time, capacity_minutes, created_at
                ) VALUES (
                    :id, :owner_id, :weekday, :start_time, :end_time, :capacity_minutes, :created_at
                )
                ON CONFLICT(id) DO UPDATE SET
                    weekday = excluded.weekday,
                    start_time = excluded.start_time,
                    end_time = excluded.end_time,
                    capacity_minutes = excluded.capacity_minutes
            "#,
            named_params! {
                ":id": slot.id,
                ":owner_id": slot.owner_id,
                ":weekday": slot.weekday,
                ":start_time": slot.start_time,
                ":end_time": slot.end_time,
                ":capacity_minutes": slot.capacity_minutes,
                ":created_at": slot.created_at,
            },
        )?;
        Ok(())
    }

    pub fn delete(conn: &Connection, owner_id: &str, id: &str) -> AppResult<()> {
        conn.execute(
            "DELETE FROM free_slots WHERE owner_id = ?1 AND id = ?2",
            [owner_id, id],
        )?;
        Ok(())
    }
}
