use rusqlite::{params, Connection, Result, Row};
use serde::{Deserialize, Serialize};

/// A locally registered account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_number: String,
    pub birth_day: String,
    pub gender: String,
    pub user_name: String,
    /// Salted digest, never the clear-text password.
    #[serde(skip_serializing)]
    pub password: String,
    pub photo_uri: Option<String>,
    pub cloud_id: Option<String>,
    pub synced: bool,
}

/// Registration form contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_number: String,
    pub birth_day: String,
    pub gender: String,
    pub user_name: String,
    pub password: String,
    pub photo_uri: Option<String>,
}

const COLUMNS: &str = "id, first_name, last_name, email, mobile_number, birth_day, gender, \
                       user_name, password, photo_uri, cloud_id, synced";

impl User {
    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            email: row.get(3)?,
            mobile_number: row.get(4)?,
            birth_day: row.get(5)?,
            gender: row.get(6)?,
            user_name: row.get(7)?,
            password: row.get(8)?,
            photo_uri: row.get(9)?,
            cloud_id: row.get(10)?,
            synced: row.get::<_, Option<i32>>(11)?.unwrap_or(0) != 0,
        })
    }

    /// Insert a new user with an already hashed password. Returns the new id.
    pub fn insert(conn: &Connection, user: &NewUser, password_digest: &str) -> Result<i64> {
        conn.execute(
            "INSERT INTO users
                (first_name, last_name, email, mobile_number, birth_day, gender, user_name, password, photo_uri)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user.first_name,
                user.last_name,
                user.email,
                user.mobile_number,
                user.birth_day,
                user.gender,
                user.user_name,
                password_digest,
                user.photo_uri.as_deref().filter(|uri| !uri.is_empty()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM users WHERE id = ?1"))?;
        let mut rows = stmt.query(params![id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Users whose user name or e-mail equals `identifier`.
    pub fn find_by_login(conn: &Connection, identifier: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM users WHERE user_name = ?1 OR email = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![identifier], Self::from_row)?;

        rows.collect()
    }

    /// The first registered user; the profile screen shows this one.
    pub fn find_first(conn: &Connection) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM users ORDER BY id LIMIT 1"))?;
        let mut rows = stmt.query([])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn delete_all(conn: &Connection) -> Result<usize> {
        conn.execute("DELETE FROM users", [])
    }

    pub fn mark_synced(conn: &Connection, id: i64, cloud_id: &str) -> Result<bool> {
        let rows_affected = conn.execute(
            "UPDATE users SET synced = 1, cloud_id = ?1 WHERE id = ?2",
            params![cloud_id, id],
        )?;
        Ok(rows_affected > 0)
    }
}
