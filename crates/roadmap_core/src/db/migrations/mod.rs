//! Ordered schema steps for the key/value store.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct Step {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

// Versions are strictly increasing; never edit a released step.
const STEPS: &[Step] = &[Step {
    version: 1,
    name: "kv_store",
    sql: include_str!("0001_kv_store.sql"),
}];

/// Highest schema version this build can write.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to `latest_version()` inside one transaction.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&Step> = STEPS.iter().filter(|step| step.version > found).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;
    Ok(())
}
