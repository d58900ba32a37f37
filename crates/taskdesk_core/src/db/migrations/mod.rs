//! Schema steps for the key-value table.
//!
//! # Invariants
//! - Step versions start at 1 and increase by one.
//! - All pending steps commit together, or none do.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Step {
    version: u32,
    sql: &'static str,
}

const STEPS: &[Step] = &[Step {
    version: 1,
    sql: include_str!("0001_kv_entries.sql"),
}];

/// Schema versions before and after a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub from: u32,
    pub to: u32,
}

impl MigrationOutcome {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    STEPS.len() as u32
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `SchemaTooNew` when the file is ahead of this build.
/// - `Migration` when a step fails; the transaction is rolled back.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<MigrationOutcome> {
    run_steps(conn, STEPS)
}

fn run_steps(conn: &mut Connection, steps: &[Step]) -> DbResult<MigrationOutcome> {
    let from = schema_version(conn)?;
    let supported = steps.len() as u32;
    if from > supported {
        return Err(DbError::SchemaTooNew {
            found: from,
            supported,
        });
    }

    let pending = &steps[from as usize..];
    if pending.is_empty() {
        return Ok(MigrationOutcome { from, to: from });
    }

    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migration {
                version: step.version,
                source,
            })?;
        debug!("event=db_migrate_step module=db status=ok version={}", step.version);
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from={from} to={supported}");
    Ok(MigrationOutcome {
        from,
        to: supported,
    })
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
