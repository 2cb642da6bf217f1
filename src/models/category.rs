use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, Result, Row};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category priority. Stored as its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{other}', expected High, Medium or Low")),
        }
    }
}

impl ToSql for Priority {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Priority {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse().map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub priority: Priority,
    pub notes: Option<String>,
}

impl Category {
    pub fn new(name: &str, priority: Priority, notes: Option<&str>) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            priority,
            notes: notes.map(|s| s.to_string()),
        }
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            priority: row.get::<_, Option<Priority>>(2)?.unwrap_or_default(),
            notes: row.get(3)?,
        })
    }

    pub fn save(&mut self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO categories (name, priority, notes) VALUES (?1, ?2, ?3)",
            params![self.name, self.priority, self.notes],
        )?;
        self.id = Some(conn.last_insert_rowid());
        Ok(())
    }

    /// Overwrite every mutable column of row `id`. Returns false when no such row exists.
    pub fn update(conn: &Connection, id: i64, fields: &Category) -> Result<bool> {
        let rows_affected = conn.execute(
            "UPDATE categories SET name = ?1, priority = ?2, notes = ?3 WHERE id = ?4",
            params![fields.name, fields.priority, fields.notes, id],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let rows_affected = conn.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }

    #[cfg(test)]
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT id, name, priority, notes FROM categories WHERE id = ?1")?;
        let mut rows = stmt.query(params![id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn find_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT id, name, priority, notes FROM categories ORDER BY id")?;
        let rows = stmt.query_map([], Self::from_row)?;

        rows.collect()
    }
}
