use crate::models::Priority;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS activities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    date TEXT NOT NULL,
    start_time TEXT,
    end_time TEXT,
    status TEXT DEFAULT 'Pending',
    category TEXT,
    priority TEXT,
    notes TEXT
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    priority TEXT DEFAULT 'Medium',
    notes TEXT
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    mobile_number TEXT NOT NULL,
    birth_day TEXT NOT NULL,
    gender TEXT NOT NULL,
    user_name TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    photo_uri TEXT,
    cloud_id TEXT,
    synced INTEGER DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_activities_date ON activities(date);
"#;

/// Categories inserted the first time the category table is seen empty, in insertion order.
pub const DEFAULT_CATEGORIES: &[(&str, Priority)] = &[
    ("Work", Priority::High),
    ("Exercise", Priority::Medium),
    ("Study", Priority::Low),
];
