use super::*;
use crate::db::Database;
use crate::store::SqliteStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Wraps a real in-memory store, recording write calls and optionally failing them.
struct RecordingStore {
    inner: SqliteStore,
    writes: Mutex<Vec<&'static str>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl RecordingStore {
    fn new() -> Self {
        let db = Database::open_in_memory().unwrap();
        Self {
            inner: SqliteStore::new(Arc::new(Mutex::new(db))),
            writes: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        }
    }

    fn record(&self, op: &'static str) -> Result<(), AppError> {
        self.writes.lock().unwrap().push(op);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("disk full".into()));
        }
        Ok(())
    }

    fn check_read(&self) -> Result<(), AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Internal("read failed".into()));
        }
        Ok(())
    }

    fn writes(&self) -> Vec<&'static str> {
        self.writes.lock().unwrap().clone()
    }
}

impl Store for RecordingStore {
    fn init_schema(&self) -> Result<(), AppError> {
        self.inner.init_schema()
    }

    fn list_activities(&self) -> Result<Vec<Activity>, AppError> {
        self.check_read()?;
        self.inner.list_activities()
    }

    fn create_activity(&self, fields: &Activity) -> Result<i64, AppError> {
        self.record("create_activity")?;
        self.inner.create_activity(fields)
    }

    fn update_activity(&self, id: i64, fields: &Activity) -> Result<bool, AppError> {
        self.record("update_activity")?;
        self.inner.update_activity(id, fields)
    }

    fn delete_activity(&self, id: i64) -> Result<bool, AppError> {
        self.record("delete_activity")?;
        self.inner.delete_activity(id)
    }

    fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.check_read()?;
        self.inner.list_categories()
    }

    fn create_category(&self, fields: &Category) -> Result<i64, AppError> {
        self.record("create_category")?;
        self.inner.create_category(fields)
    }

    fn update_category(&self, id: i64, fields: &Category) -> Result<bool, AppError> {
        self.record("update_category")?;
        self.inner.update_category(id, fields)
    }

    fn delete_category(&self, id: i64) -> Result<bool, AppError> {
        self.record("delete_category")?;
        self.inner.delete_category(id)
    }
}

fn setup() -> (ActivityManager<RecordingStore>, Arc<RecordingStore>) {
    let store = Arc::new(RecordingStore::new());
    let mut manager = ActivityManager::new(Arc::clone(&store));
    assert_eq!(manager.initialize(), Outcome::Done);
    (manager, store)
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn yes(_: &str, _: &str) -> bool {
    true
}

fn no(_: &str, _: &str) -> bool {
    false
}

fn add_run(manager: &mut ActivityManager<RecordingStore>) -> i64 {
    manager.open_new_activity();
    manager.set_activity_name("Run");
    manager.pick_date(date(2024, 5, 1));
    assert_eq!(manager.save_activity(), Outcome::Done);
    manager.activities().last().unwrap().id.unwrap()
}

#[test]
fn test_initialize_empty_store_seeds_defaults() {
    let (manager, _store) = setup();

    let seeded: Vec<(&str, Priority)> = manager
        .categories()
        .iter()
        .map(|c| (c.name.as_str(), c.priority))
        .collect();
    assert_eq!(
        seeded,
        vec![
            ("Work", Priority::High),
            ("Exercise", Priority::Medium),
            ("Study", Priority::Low),
        ]
    );
    assert!(manager.activities().is_empty());
    assert!(!manager.is_loading());
}

#[test]
fn test_initialize_twice_does_not_reseed() {
    let (mut manager, store) = setup();
    assert_eq!(manager.initialize(), Outcome::Done);

    assert_eq!(manager.categories().len(), 3);
    let seeds = store.writes().iter().filter(|op| **op == "create_category").count();
    assert_eq!(seeds, 3);
}

#[test]
fn test_initialize_keeps_user_categories() {
    let store = Arc::new(RecordingStore::new());
    store.init_schema().unwrap();
    store.inner.create_category(&Category::new("Chores", Priority::Low, None)).unwrap();

    let mut manager = ActivityManager::new(Arc::clone(&store));
    assert_eq!(manager.initialize(), Outcome::Done);

    assert_eq!(manager.categories().len(), 1);
    assert_eq!(manager.categories()[0].name, "Chores");
}

#[test]
fn test_new_manager_starts_loading() {
    let manager = ActivityManager::new(Arc::new(RecordingStore::new()));
    assert!(manager.is_loading());
    assert_eq!(manager.state().tab, Tab::Activities);
    assert_eq!(manager.state().modal, Modal::None);
}

#[test]
fn test_create_activity_scenario() {
    let (mut manager, _store) = setup();
    let id = add_run(&mut manager);

    assert_eq!(id, 1);
    let activities = manager.activities();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].name, "Run");
    assert_eq!(activities[0].date, "2024-05-01");
    assert_eq!(activities[0].status, "Pending");

    // Successful save resets the modal
    assert_eq!(manager.state().modal, Modal::None);
    assert_eq!(manager.state().editing, None);
    assert_eq!(*manager.activity_form(), ActivityForm::default());
}

#[test]
fn test_save_activity_requires_name_and_date() {
    let (mut manager, store) = setup();

    manager.open_new_activity();
    manager.pick_date(date(2024, 5, 1));
    manager.set_activity_name("   ");
    let outcome = manager.save_activity();
    assert_eq!(
        outcome.notice().map(|n| n.message.as_str()),
        Some("Activity Name and Date are required.")
    );

    manager.open_new_activity();
    manager.set_activity_name("Run");
    assert!(matches!(manager.save_activity(), Outcome::Rejected(_)));

    assert!(!store.writes().iter().any(|op| op.ends_with("_activity")));
    assert_eq!(manager.state().modal, Modal::Activity, "rejected form stays open");
}

#[test]
fn test_edit_activity_updates_in_place() {
    let (mut manager, store) = setup();
    let id = add_run(&mut manager);

    assert!(manager.edit_activity(id));
    assert_eq!(manager.state().editing, Some(Editing { kind: EntityKind::Activity, id }));
    assert_eq!(manager.activity_form().name, "Run");

    manager.set_activity_name("Long run");
    manager.set_activity_status("Done");
    manager.pick_start_time(NaiveTime::from_hms_opt(6, 5, 0));
    assert_eq!(manager.save_activity(), Outcome::Done);

    let activities = manager.activities();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].id, Some(id));
    assert_eq!(activities[0].name, "Long run");
    assert_eq!(activities[0].status, "Done");
    assert_eq!(activities[0].start_time.as_deref(), Some("06:05"));
    assert!(store.writes().contains(&"update_activity"));
}

#[test]
fn test_edit_unknown_activity_is_ignored() {
    let (mut manager, _store) = setup();
    assert!(!manager.edit_activity(404));
    assert_eq!(manager.state().modal, Modal::None);
}

#[test]
fn test_pickers_without_value_leave_fields_unchanged() {
    let (mut manager, _store) = setup();
    manager.open_new_activity();
    manager.pick_date(date(2024, 1, 9));
    manager.pick_date(None);
    manager.pick_end_time(NaiveTime::from_hms_opt(21, 30, 0));
    manager.pick_end_time(None);

    assert_eq!(manager.activity_form().date, "2024-01-09");
    assert_eq!(manager.activity_form().end_time, "21:30");
    assert_eq!(manager.activity_form().start_time, "");
}

#[test]
fn test_select_category_copies_priority_once() {
    let (mut manager, _store) = setup();
    let work = manager.categories()[0].clone();
    let work_id = work.id.unwrap();

    manager.open_new_activity();
    assert!(manager.select_category(work_id));
    assert_eq!(manager.activity_form().category, "Work");
    assert_eq!(manager.activity_form().priority, "High");

    // Change the stored category's priority behind the open form
    let mut lowered = work.clone();
    lowered.priority = Priority::Low;
    manager.store.update_category(work_id, &lowered).unwrap();
    assert_eq!(manager.load_all(), Outcome::Done);

    assert_eq!(manager.categories()[0].priority, Priority::Low);
    assert_eq!(manager.activity_form().priority, "High");
}

#[test]
fn test_select_unknown_category() {
    let (mut manager, _store) = setup();
    manager.open_new_activity();
    assert!(!manager.select_category(999));
    assert_eq!(manager.activity_form().category, "");
}

#[test]
fn test_delete_activity_confirmed_and_cancelled() {
    let (mut manager, store) = setup();
    let id = add_run(&mut manager);

    assert_eq!(manager.delete_activity(id, &no), Outcome::Cancelled);
    assert_eq!(manager.activities().len(), 1);
    assert!(!store.writes().contains(&"delete_activity"));

    assert_eq!(manager.delete_activity(id, &yes), Outcome::Done);
    assert!(manager.activities().iter().all(|a| a.id != Some(id)));
}

#[test]
fn test_delete_missing_activity_is_harmless() {
    let (mut manager, _store) = setup();
    add_run(&mut manager);
    assert_eq!(manager.delete_activity(77, &yes), Outcome::Done);
    assert_eq!(manager.activities().len(), 1);
}

#[test]
fn test_store_failure_keeps_form_and_modal() {
    let (mut manager, store) = setup();
    manager.open_new_activity();
    manager.set_activity_name("Swim");
    manager.pick_date(date(2024, 7, 1));
    manager.set_activity_notes("pool");
    let form_before = manager.activity_form().clone();

    store.fail_writes.store(true, Ordering::SeqCst);
    let outcome = manager.save_activity();

    assert_eq!(outcome, Outcome::Failed(Notice::error("Failed to save activity.")));
    assert_eq!(manager.state().modal, Modal::Activity);
    assert_eq!(*manager.activity_form(), form_before);
    assert!(manager.activities().is_empty());

    // Retry without re-entering anything
    store.fail_writes.store(false, Ordering::SeqCst);
    assert_eq!(manager.save_activity(), Outcome::Done);
    assert_eq!(manager.activities().len(), 1);
}

#[test]
fn test_load_failure_clears_loading_and_keeps_lists() {
    let (mut manager, store) = setup();
    add_run(&mut manager);

    store.fail_reads.store(true, Ordering::SeqCst);
    let outcome = manager.load_all();

    assert_eq!(outcome, Outcome::Failed(Notice::error("Failed to load local data.")));
    assert!(!manager.is_loading());
    assert_eq!(manager.activities().len(), 1);
    assert_eq!(manager.categories().len(), 3);
}

#[test]
fn test_delete_failure_reports_notice() {
    let (mut manager, store) = setup();
    let id = add_run(&mut manager);

    store.fail_writes.store(true, Ordering::SeqCst);
    let outcome = manager.delete_activity(id, &yes);
    assert_eq!(outcome, Outcome::Failed(Notice::error("Failed to delete activity.")));
    assert_eq!(manager.activities().len(), 1);
}

#[test]
fn test_category_create_edit_delete() {
    let (mut manager, store) = setup();

    manager.switch_tab(Tab::Categories);
    manager.open_new_category();
    assert_eq!(manager.category_form().priority, Priority::Medium);
    manager.set_category_name("Reading");
    manager.set_category_priority(Priority::Low);
    manager.set_category_notes("novels");
    assert_eq!(manager.save_category(), Outcome::Done);

    let reading = manager.categories().last().unwrap().clone();
    assert_eq!(reading.name, "Reading");
    assert_eq!(reading.notes.as_deref(), Some("novels"));
    let id = reading.id.unwrap();

    assert!(manager.edit_category(id));
    manager.set_category_priority(Priority::High);
    assert_eq!(manager.save_category(), Outcome::Done);
    assert_eq!(manager.categories().last().unwrap().priority, Priority::High);
    assert_eq!(manager.categories().len(), 4);

    assert_eq!(manager.delete_category(id, &no), Outcome::Cancelled);
    assert_eq!(manager.delete_category(id, &yes), Outcome::Done);
    assert_eq!(manager.categories().len(), 3);
    assert!(store.writes().contains(&"update_category"));
    assert_eq!(manager.state().tab, Tab::Categories);
}

#[test]
fn test_save_category_requires_name() {
    let (mut manager, store) = setup();
    let writes_before = store.writes().len();

    manager.open_new_category();
    let outcome = manager.save_category();
    assert_eq!(outcome, Outcome::Rejected(Notice::validation("Category name is required.")));
    assert_eq!(store.writes().len(), writes_before);
}

#[test]
fn test_editing_marker_is_kind_scoped() {
    let (mut manager, store) = setup();
    let work_id = manager.categories()[0].id.unwrap();

    // A category edit marker must not turn an activity save into an update
    assert!(manager.edit_category(work_id));
    manager.close_modal();
    manager.set_activity_name("Plan");
    manager.pick_date(date(2024, 5, 2));
    assert_eq!(manager.save_activity(), Outcome::Done);

    assert!(store.writes().contains(&"create_activity"));
    assert!(!store.writes().contains(&"update_activity"));
    assert_eq!(manager.state().editing, None);
}

#[test]
fn test_deleting_category_leaves_activity_label() {
    let (mut manager, _store) = setup();
    let work_id = manager.categories()[0].id.unwrap();

    manager.open_new_activity();
    manager.set_activity_name("Report");
    manager.pick_date(date(2024, 5, 3));
    manager.select_category(work_id);
    assert_eq!(manager.save_activity(), Outcome::Done);

    assert_eq!(manager.delete_category(work_id, &yes), Outcome::Done);
    assert_eq!(manager.activities()[0].category.as_deref(), Some("Work"));
    assert_eq!(manager.activities()[0].priority.as_deref(), Some("High"));
}

#[test]
fn test_switch_tab_does_not_reload() {
    let (mut manager, store) = setup();
    store.fail_reads.store(true, Ordering::SeqCst);

    manager.switch_tab(Tab::Categories);
    assert_eq!(manager.state().tab, Tab::Categories);
    assert_eq!(manager.categories().len(), 3);
}

#[test]
fn test_cancel_keeps_form_contents() {
    let (mut manager, _store) = setup();
    manager.open_new_activity();
    manager.set_activity_name("Draft");
    manager.close_modal();

    assert_eq!(manager.state().modal, Modal::None);
    assert_eq!(manager.activity_form().name, "Draft");
}

#[test]
fn test_long_non_ascii_text_is_saved_as_typed() {
    let (mut manager, _store) = setup();
    let name = format!("Marathon {}", "走".repeat(300));
    let notes = "ノート ".repeat(800);

    manager.open_new_activity();
    manager.set_activity_name(name.clone());
    manager.set_activity_notes(notes.clone());
    manager.pick_date(date(2024, 5, 1));
    assert_eq!(manager.save_activity(), Outcome::Done);

    let saved = manager.activities().last().unwrap();
    assert_eq!(saved.name, name);
    assert_eq!(saved.notes.as_deref(), Some(notes.as_str()));

    let category = "日".repeat(40);
    manager.open_new_category();
    manager.set_category_name(category.clone());
    manager.set_category_notes(notes.clone());
    assert_eq!(manager.save_category(), Outcome::Done);

    let saved = manager.categories().last().unwrap();
    assert_eq!(saved.name, category);
    assert_eq!(saved.notes.as_deref(), Some(notes.as_str()));
}

#[test]
fn test_saving_edit_of_deleted_activity_is_harmless() {
    let (mut manager, store) = setup();
    let id = add_run(&mut manager);

    assert!(manager.edit_activity(id));
    manager.set_activity_name("Ghost run");
    assert!(store.inner.delete_activity(id).unwrap());

    assert_eq!(manager.save_activity(), Outcome::Done);
    assert!(store.writes().contains(&"update_activity"));
    assert!(manager.activities().is_empty());
    assert_eq!(manager.state().modal, Modal::None);
    assert_eq!(manager.state().editing, None);
}
