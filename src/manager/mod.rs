//! Activity/category view-state controller.
//!
//! Loads both record kinds, keeps the tab, modal and form state, validates form submissions
//! and hands them to the [`Store`]. Every successful mutation is followed by a full reload of
//! both lists. Store failures never escape: they are logged and turned into a [`Notice`].

mod form;
mod state;

pub use form::{ActivityForm, CategoryForm};
pub use state::{Editing, EntityKind, Modal, Tab, ViewState};

use crate::db::schema::DEFAULT_CATEGORIES;
use crate::error::AppError;
use crate::models::{Activity, Category, Priority};
use crate::prompt::{Confirm, Notice};
use crate::store::Store;
use crate::validation::{DATE_FORMAT, TIME_FORMAT};
use chrono::{NaiveDate, NaiveTime};
use log::{error, info, warn};
use std::sync::Arc;
use std::thread::ScopedJoinHandle;

const LOAD_FAILED: &str = "Failed to load local data.";

/// Result of a user action on the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The user declined the confirmation prompt.
    Cancelled,
    /// Validation failed; nothing was sent to the store.
    Rejected(Notice),
    /// The store failed. For saves the modal and form are left as they were.
    Failed(Notice),
}

impl Outcome {
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Outcome::Rejected(n) | Outcome::Failed(n) => Some(n),
            Outcome::Done | Outcome::Cancelled => None,
        }
    }
}

pub struct ActivityManager<S: Store> {
    store: Arc<S>,
    state: ViewState,
}

fn join_load<T>(handle: ScopedJoinHandle<'_, Result<T, AppError>>) -> Result<T, AppError> {
    handle
        .join()
        .unwrap_or_else(|_| Err(AppError::Internal("load worker panicked".into())))
}

impl<S: Store> ActivityManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn activities(&self) -> &[Activity] {
        &self.state.activities
    }

    pub fn categories(&self) -> &[Category] {
        &self.state.categories
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    /// Create the schema, seed default categories if there are none, then load everything.
    pub fn initialize(&mut self) -> Outcome {
        info!("Initializing activity manager");
        let prepared = self
            .store
            .init_schema()
            .and_then(|()| self.ensure_default_categories());

        if let Err(e) = prepared {
            error!("initialize error: {e}");
            self.state.loading = false;
            return Outcome::Failed(Notice::error(LOAD_FAILED));
        }
        self.load_all()
    }

    /// Insert the default categories, in order, when the category table is empty.
    /// Returns how many were inserted.
    fn ensure_default_categories(&self) -> Result<usize, AppError> {
        if !self.store.list_categories()?.is_empty() {
            return Ok(0);
        }
        for (name, priority) in DEFAULT_CATEGORIES {
            self.store.create_category(&Category::new(name, *priority, None))?;
        }
        info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());
        Ok(DEFAULT_CATEGORIES.len())
    }

    /// Reload both lists. The two reads run concurrently and `loading` clears only after both
    /// finish. On failure the previous lists are kept.
    pub fn load_all(&mut self) -> Outcome {
        self.state.loading = true;
        let store = &*self.store;

        let (activities, categories) = std::thread::scope(|s| {
            let activities = s.spawn(|| store.list_activities());
            let categories = s.spawn(|| store.list_categories());
            (join_load(activities), join_load(categories))
        });

        let outcome = match (activities, categories) {
            (Ok(activities), Ok(categories)) => {
                self.state.activities = activities;
                self.state.categories = categories;
                Outcome::Done
            }
            (Err(e), _) | (_, Err(e)) => {
                error!("loadAll error: {e}");
                Outcome::Failed(Notice::error(LOAD_FAILED))
            }
        };

        self.state.loading = false;
        outcome
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.state.tab = tab;
    }

    pub fn close_modal(&mut self) {
        self.state.modal = Modal::None;
    }

    // ── Activities ────────────────────────────────────────────────

    pub fn activity_form(&self) -> &ActivityForm {
        &self.state.activity_form
    }

    pub fn open_new_activity(&mut self) {
        self.state.editing = None;
        self.state.activity_form = ActivityForm::default();
        self.state.modal = Modal::Activity;
    }

    /// Open the activity modal pre-filled from the loaded record `id`.
    /// Returns false if no such record is loaded.
    pub fn edit_activity(&mut self, id: i64) -> bool {
        let Some(activity) = self.state.activities.iter().find(|a| a.id == Some(id)) else {
            return false;
        };
        self.state.activity_form = ActivityForm::from_activity(activity);
        self.state.editing = Some(Editing { kind: EntityKind::Activity, id });
        self.state.modal = Modal::Activity;
        true
    }

    pub fn set_activity_name(&mut self, name: impl Into<String>) {
        self.state.activity_form.name = name.into();
    }

    pub fn set_activity_status(&mut self, status: impl Into<String>) {
        self.state.activity_form.status = status.into();
    }

    pub fn set_activity_notes(&mut self, notes: impl Into<String>) {
        self.state.activity_form.notes = notes.into();
    }

    /// Apply the date picker's result. `None` leaves the date unchanged.
    pub fn pick_date(&mut self, date: Option<NaiveDate>) {
        if let Some(date) = date {
            self.state.activity_form.date = date.format(DATE_FORMAT).to_string();
        }
    }

    pub fn pick_start_time(&mut self, time: Option<NaiveTime>) {
        if let Some(time) = time {
            self.state.activity_form.start_time = time.format(TIME_FORMAT).to_string();
        }
    }

    pub fn pick_end_time(&mut self, time: Option<NaiveTime>) {
        if let Some(time) = time {
            self.state.activity_form.end_time = time.format(TIME_FORMAT).to_string();
        }
    }

    /// Copy the loaded category's name and priority into the activity form.
    /// This is a one-time copy; later edits to the category do not follow.
    pub fn select_category(&mut self, category_id: i64) -> bool {
        let Some(category) = self
            .state
            .categories
            .iter()
            .find(|c| c.id == Some(category_id))
        else {
            return false;
        };
        self.state.activity_form.category = category.name.clone();
        self.state.activity_form.priority = category.priority.as_str().to_string();
        true
    }

    pub fn save_activity(&mut self) -> Outcome {
        let form = &self.state.activity_form;
        if form.name.trim().is_empty() || form.date.is_empty() {
            return Outcome::Rejected(Notice::validation("Activity Name and Date are required."));
        }

        let fields = form.to_activity();
        let result = match self.state.editing_id(EntityKind::Activity) {
            Some(id) => self.store.update_activity(id, &fields).map(|found| {
                if !found {
                    warn!("Activity {id} no longer exists; nothing updated");
                }
            }),
            None => self.store.create_activity(&fields).map(|id| info!("Saved activity {id}")),
        };

        if let Err(e) = result {
            error!("onSaveActivity error: {e}");
            return Outcome::Failed(Notice::error("Failed to save activity."));
        }

        let reloaded = self.load_all();
        self.state.activity_form = ActivityForm::default();
        self.state.editing = None;
        self.state.modal = Modal::None;
        reloaded
    }

    pub fn delete_activity(&mut self, id: i64, confirm: &dyn Confirm) -> Outcome {
        if !confirm.confirm("Confirm", "Delete this activity?") {
            return Outcome::Cancelled;
        }
        match self.store.delete_activity(id) {
            Ok(true) => info!("Deleted activity {id}"),
            Ok(false) => warn!("Activity {id} was already gone"),
            Err(e) => {
                error!("onDeleteActivity error: {e}");
                return Outcome::Failed(Notice::error("Failed to delete activity."));
            }
        }
        self.load_all()
    }

    // ── Categories ────────────────────────────────────────────────

    pub fn category_form(&self) -> &CategoryForm {
        &self.state.category_form
    }

    pub fn open_new_category(&mut self) {
        self.state.editing = None;
        self.state.category_form = CategoryForm::default();
        self.state.modal = Modal::Category;
    }

    pub fn edit_category(&mut self, id: i64) -> bool {
        let Some(category) = self.state.categories.iter().find(|c| c.id == Some(id)) else {
            return false;
        };
        self.state.category_form = CategoryForm::from_category(category);
        self.state.editing = Some(Editing { kind: EntityKind::Category, id });
        self.state.modal = Modal::Category;
        true
    }

    pub fn set_category_name(&mut self, name: impl Into<String>) {
        self.state.category_form.name = name.into();
    }

    pub fn set_category_priority(&mut self, priority: Priority) {
        self.state.category_form.priority = priority;
    }

    pub fn set_category_notes(&mut self, notes: impl Into<String>) {
        self.state.category_form.notes = notes.into();
    }

    pub fn save_category(&mut self) -> Outcome {
        let form = &self.state.category_form;
        if form.name.trim().is_empty() {
            return Outcome::Rejected(Notice::validation("Category name is required."));
        }

        let fields = form.to_category();
        let result = match self.state.editing_id(EntityKind::Category) {
            Some(id) => self.store.update_category(id, &fields).map(|found| {
                if !found {
                    warn!("Category {id} no longer exists; nothing updated");
                }
            }),
            None => self.store.create_category(&fields).map(|id| info!("Saved category {id}")),
        };

        if let Err(e) = result {
            error!("onSaveCategory error: {e}");
            return Outcome::Failed(Notice::error("Failed to save category."));
        }

        let reloaded = self.load_all();
        self.state.category_form = CategoryForm::default();
        self.state.editing = None;
        self.state.modal = Modal::None;
        reloaded
    }

    /// Delete a category after confirmation. Activities keep their copied category label.
    pub fn delete_category(&mut self, id: i64, confirm: &dyn Confirm) -> Outcome {
        if !confirm.confirm("Confirm", "Delete this category?") {
            return Outcome::Cancelled;
        }
        match self.store.delete_category(id) {
            Ok(true) => info!("Deleted category {id}"),
            Ok(false) => warn!("Category {id} was already gone"),
            Err(e) => {
                error!("onDeleteCategory error: {e}");
                return Outcome::Failed(Notice::error("Failed to delete category."));
            }
        }
        self.load_all()
    }
}

#[cfg(test)]
mod tests;
