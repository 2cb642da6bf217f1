use super::schema::SCHEMA;
use rusqlite::{Connection, Result};

/// Create every table the app needs. Safe to call on every start.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
