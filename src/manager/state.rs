use super::form::{ActivityForm, CategoryForm};
use crate::models::{Activity, Category};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Tab {
    #[default]
    Activities,
    Categories,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Modal {
    #[default]
    None,
    Activity,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Activity,
    Category,
}

/// Which stored record the open modal edits. Absent means the modal creates a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Editing {
    pub kind: EntityKind,
    pub id: i64,
}

/// Everything the screen renders from. Lists are copies; the store is the source of truth.
#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    pub tab: Tab,
    pub loading: bool,
    pub activities: Vec<Activity>,
    pub categories: Vec<Category>,
    pub modal: Modal,
    pub editing: Option<Editing>,
    pub activity_form: ActivityForm,
    pub category_form: CategoryForm,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            tab: Tab::default(),
            loading: true,
            activities: Vec::new(),
            categories: Vec::new(),
            modal: Modal::default(),
            editing: None,
            activity_form: ActivityForm::default(),
            category_form: CategoryForm::default(),
        }
    }
}

impl ViewState {
    pub fn editing_id(&self, kind: EntityKind) -> Option<i64> {
        self.editing.filter(|e| e.kind == kind).map(|e| e.id)
    }
}
