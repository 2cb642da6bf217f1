//! Local accounts behind the login, registration and profile screens.
//!
//! Passwords are stored as `salt$digest`, with a random salt and a SHA-256 digest over the
//! salt followed by the password bytes.

use crate::constants::PASSWORD_SALT_LEN;
use crate::db::{lock_db, Database};
use crate::error::{unique_violation_column, AppError};
use crate::models::{NewUser, User};
use crate::prompt::Confirm;
use crate::validation::{parse_date, require_field};
use log::{info, warn};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex};

fn digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; PASSWORD_SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    format!("{}${}", hex::encode(salt), digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, expected)) = stored.split_once('$') else {
        return false;
    };
    match hex::decode(salt_hex) {
        Ok(salt) => digest(&salt, password) == expected,
        Err(_) => false,
    }
}

pub struct Accounts {
    db: Arc<Mutex<Database>>,
}

impl Accounts {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Register a new local user. First name, user name and password are required.
    pub fn register(&self, user: &NewUser) -> Result<User, AppError> {
        require_field("first_name", &user.first_name)?;
        require_field("user_name", &user.user_name)?;
        require_field("password", &user.password)?;
        if !user.birth_day.is_empty() {
            parse_date(&user.birth_day)?;
        }

        let db = lock_db(&self.db, "Accounts");
        let conn = db.connection();
        let id = User::insert(conn, user, &hash_password(&user.password)).map_err(|e| {
            match unique_violation_column(&e) {
                Some("users.email") => AppError::AlreadyExists { name: user.email.clone() },
                Some(_) => AppError::AlreadyExists { name: user.user_name.clone() },
                None => AppError::from(e),
            }
        })?;
        info!("Registered user {id}");

        User::find_by_id(conn, id)?.ok_or(AppError::NotFound { entity: "User" })
    }

    /// Log in by user name or e-mail. Returns `None` when no account matches.
    pub fn login(&self, identifier: &str, password: &str) -> Result<Option<User>, AppError> {
        let db = lock_db(&self.db, "Accounts");
        let candidates = User::find_by_login(db.connection(), identifier.trim())?;

        let user = candidates
            .into_iter()
            .find(|u| verify_password(password, &u.password));
        if user.is_none() {
            warn!("Failed login attempt");
        }
        Ok(user)
    }

    /// The user shown on the profile screen.
    pub fn profile(&self) -> Result<Option<User>, AppError> {
        let db = lock_db(&self.db, "Accounts");
        Ok(User::find_first(db.connection())?)
    }

    /// Wipe every local user after confirmation. Returns false when the user cancelled.
    pub fn logout(&self, confirm: &dyn Confirm) -> Result<bool, AppError> {
        if !confirm.confirm("Logout", "Are you sure you want to logout?") {
            return Ok(false);
        }
        let db = lock_db(&self.db, "Accounts");
        let removed = User::delete_all(db.connection())?;
        info!("Logged out, removed {removed} local user(s)");
        Ok(true)
    }

    pub fn mark_synced(&self, id: i64, cloud_id: &str) -> Result<(), AppError> {
        let db = lock_db(&self.db, "Accounts");
        if User::mark_synced(db.connection(), id, cloud_id)? {
            info!("User {id} marked as synced");
            Ok(())
        } else {
            Err(AppError::NotFound { entity: "User" })
        }
    }
}
