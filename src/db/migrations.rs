use rusqlite::Connection;
use tracing::info;

use crate::error::AppResult;

const USER_VERSION: i32 = 1;

/// Applies any schema changes layered on top of `schema.sql`, bumping
/// `PRAGMA user_version` as it goes. `schema.sql` itself is idempotent
/// (`CREATE TABLE IF NOT EXISTS`) and always re-applied on connect, so v1
/// only needs to cover additive changes not expressible there.
pub fn run(conn: &Connection) -> AppResult<()> {
    let mut current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version < 1 {
        info!(target: "app::db", version = current_version, "running migration v1");
        migrate_to_v1(conn)?;
        current_version = 1;
        conn.execute(&format!("PRAGMA user_version = {current_version}"), [])?;
    }

    debug_assert_eq!(current_version, USER_VERSION);
    Ok(())
}

fn migrate_to_v1(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_tasks_owner_deadline ON tasks (owner_id, deadline);",
    )?;
    Ok(())
}
