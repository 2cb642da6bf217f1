use crate::constants::DEFAULT_ACTIVITY_STATUS;
use rusqlite::{params, Connection, Result, Row};
use serde::{Deserialize, Serialize};

/// A planned or completed activity.
///
/// `category` is a plain label copied from a category name at selection time. It is not a
/// foreign key: deleting or renaming the category leaves it untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Option<i64>,
    pub name: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, 24-hour.
    pub start_time: Option<String>,
    /// `HH:MM`, 24-hour.
    pub end_time: Option<String>,
    pub status: String,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,
}

const COLUMNS: &str = "id, name, date, start_time, end_time, status, category, priority, notes";

impl Activity {
    pub fn new(name: &str, date: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            date: date.to_string(),
            start_time: None,
            end_time: None,
            status: DEFAULT_ACTIVITY_STATUS.to_string(),
            category: None,
            priority: None,
            notes: None,
        }
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            date: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            status: row
                .get::<_, Option<String>>(5)?
                .unwrap_or_else(|| DEFAULT_ACTIVITY_STATUS.to_string()),
            category: row.get(6)?,
            priority: row.get(7)?,
            notes: row.get(8)?,
        })
    }

    pub fn save(&mut self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO activities (name, date, start_time, end_time, status, category, priority, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                self.name,
                self.date,
                self.start_time,
                self.end_time,
                self.status,
                self.category,
                self.priority,
                self.notes,
            ],
        )?;
        self.id = Some(conn.last_insert_rowid());
        Ok(())
    }

    /// Overwrite every mutable column of row `id`. Returns false when no such row exists.
    pub fn update(conn: &Connection, id: i64, fields: &Activity) -> Result<bool> {
        let rows_affected = conn.execute(
            "UPDATE activities
             SET name = ?1, date = ?2, start_time = ?3, end_time = ?4,
                 status = ?5, category = ?6, priority = ?7, notes = ?8
             WHERE id = ?9",
            params![
                fields.name,
                fields.date,
                fields.start_time,
                fields.end_time,
                fields.status,
                fields.category,
                fields.priority,
                fields.notes,
                id,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let rows_affected = conn.execute("DELETE FROM activities WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }

    #[cfg(test)]
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM activities WHERE id = ?1"))?;
        let mut rows = stmt.query(params![id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn find_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM activities ORDER BY id"))?;
        let rows = stmt.query_map([], Self::from_row)?;

        rows.collect()
    }
}
