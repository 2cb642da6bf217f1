//! Durable CRUD for activities and categories.
//!
//! The manager talks to a [`Store`]; [`SqliteStore`] is the on-device implementation.
//! Update and delete on an id that does not exist succeed and report `false`.

use crate::db::{migrations, with_connection, Database};
use crate::error::AppError;
use crate::models::{Activity, Category};
use log::debug;
use std::sync::{Arc, Mutex};

pub trait Store: Send + Sync {
    fn init_schema(&self) -> Result<(), AppError>;

    fn list_activities(&self) -> Result<Vec<Activity>, AppError>;
    fn create_activity(&self, fields: &Activity) -> Result<i64, AppError>;
    fn update_activity(&self, id: i64, fields: &Activity) -> Result<bool, AppError>;
    fn delete_activity(&self, id: i64) -> Result<bool, AppError>;

    fn list_categories(&self) -> Result<Vec<Category>, AppError>;
    fn create_category(&self, fields: &Category) -> Result<i64, AppError>;
    fn update_category(&self, id: i64, fields: &Category) -> Result<bool, AppError>;
    fn delete_category(&self, id: i64) -> Result<bool, AppError>;
}

pub struct SqliteStore {
    db: Arc<Mutex<Database>>,
}

impl SqliteStore {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

impl Store for SqliteStore {
    fn init_schema(&self) -> Result<(), AppError> {
        with_connection(&self.db, "initialize schema", migrations::run)
    }

    fn list_activities(&self) -> Result<Vec<Activity>, AppError> {
        with_connection(&self.db, "list activities", Activity::find_all)
    }

    fn create_activity(&self, fields: &Activity) -> Result<i64, AppError> {
        let mut activity = fields.clone();
        with_connection(&self.db, "create activity", |conn| activity.save(conn))?;
        let id = activity
            .id
            .ok_or_else(|| AppError::Internal("inserted activity has no id".into()))?;
        debug!("Created activity {id}");
        Ok(id)
    }

    fn update_activity(&self, id: i64, fields: &Activity) -> Result<bool, AppError> {
        with_connection(&self.db, "update activity", |conn| Activity::update(conn, id, fields))
    }

    fn delete_activity(&self, id: i64) -> Result<bool, AppError> {
        with_connection(&self.db, "delete activity", |conn| Activity::delete(conn, id))
    }

    fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        with_connection(&self.db, "list categories", Category::find_all)
    }

    fn create_category(&self, fields: &Category) -> Result<i64, AppError> {
        let mut category = fields.clone();
        with_connection(&self.db, "create category", |conn| category.save(conn))?;
        let id = category
            .id
            .ok_or_else(|| AppError::Internal("inserted category has no id".into()))?;
        debug!("Created category {id}");
        Ok(id)
    }

    fn update_category(&self, id: i64, fields: &Category) -> Result<bool, AppError> {
        with_connection(&self.db, "update category", |conn| Category::update(conn, id, fields))
    }

    fn delete_category(&self, id: i64) -> Result<bool, AppError> {
        with_connection(&self.db, "delete category", |conn| Category::delete(conn, id))
    }
}
