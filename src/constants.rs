// src/constants.rs

/// File name of the local database inside the data directory
pub const DB_FILE_NAME: &str = "drt.db";

/// Status given to activities that have not been touched yet
pub const DEFAULT_ACTIVITY_STATUS: &str = "Pending";

/// Random salt length in bytes for stored password digests
pub const PASSWORD_SALT_LEN: usize = 16;
