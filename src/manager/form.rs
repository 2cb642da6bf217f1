use crate::constants::DEFAULT_ACTIVITY_STATUS;
use crate::models::{Activity, Category, Priority};
use serde::Serialize;

/// Text contents of the activity modal. Empty strings mean "not set".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityForm {
    pub name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub category: String,
    pub priority: String,
    pub notes: String,
}

impl Default for ActivityForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            date: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            status: DEFAULT_ACTIVITY_STATUS.to_string(),
            category: String::new(),
            priority: String::new(),
            notes: String::new(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl ActivityForm {
    pub fn from_activity(activity: &Activity) -> Self {
        let status = if activity.status.is_empty() {
            DEFAULT_ACTIVITY_STATUS.to_string()
        } else {
            activity.status.clone()
        };
        Self {
            name: activity.name.clone(),
            date: activity.date.clone(),
            start_time: activity.start_time.clone().unwrap_or_default(),
            end_time: activity.end_time.clone().unwrap_or_default(),
            status,
            category: activity.category.clone().unwrap_or_default(),
            priority: activity.priority.clone().unwrap_or_default(),
            notes: activity.notes.clone().unwrap_or_default(),
        }
    }

    pub fn to_activity(&self) -> Activity {
        Activity {
            id: None,
            name: self.name.clone(),
            date: self.date.clone(),
            start_time: non_empty(&self.start_time),
            end_time: non_empty(&self.end_time),
            status: non_empty(&self.status).unwrap_or_else(|| DEFAULT_ACTIVITY_STATUS.to_string()),
            category: non_empty(&self.category),
            priority: non_empty(&self.priority),
            notes: non_empty(&self.notes),
        }
    }
}

/// Contents of the category modal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryForm {
    pub name: String,
    pub priority: Priority,
    pub notes: String,
}

impl CategoryForm {
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            priority: category.priority,
            notes: category.notes.clone().unwrap_or_default(),
        }
    }

    pub fn to_category(&self) -> Category {
        Category {
            id: None,
            name: self.name.clone(),
            priority: self.priority,
            notes: non_empty(&self.notes),
        }
    }
}
