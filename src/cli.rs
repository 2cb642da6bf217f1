//! Command line host: the composition root that wires the store, the manager and a stdin
//! confirmation prompt together, and renders lists as text or JSON.

use crate::accounts::Accounts;
use crate::error::AppError;
use crate::manager::{ActivityManager, Outcome, Tab};
use crate::models::{Activity, Category, NewUser, Priority, User};
use crate::prompt::{Confirm, Notice};
use crate::store::{SqliteStore, Store};
use crate::validation::{parse_date, parse_time};
use crate::{get_db_path, open_database};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::debug;
use serde::Serialize;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "drt", version, about = "Local activity and category tracker")]
pub struct Cli {
    /// SQLite database path. Defaults to the platform data directory.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print records as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage activities
    #[command(subcommand)]
    Activities(ActivityAction),
    /// Manage categories
    #[command(subcommand)]
    Categories(CategoryAction),
    /// Local account
    #[command(subcommand)]
    User(UserAction),
}

#[derive(Subcommand, Debug)]
pub enum ActivityAction {
    List,
    Add(ActivityFields),
    Edit {
        id: i64,
        #[command(flatten)]
        fields: ActivityFields,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Activity form fields. On `edit`, omitted fields keep their current value.
#[derive(Args, Debug, Default)]
pub struct ActivityFields {
    #[arg(long)]
    pub name: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,
    /// HH:MM
    #[arg(long)]
    pub start: Option<String>,
    /// HH:MM
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    /// Category name; its priority is copied onto the activity
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CategoryAction {
    List,
    Add(CategoryFields),
    Edit {
        id: i64,
        #[command(flatten)]
        fields: CategoryFields,
    },
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct CategoryFields {
    #[arg(long)]
    pub name: Option<String>,
    /// High, Medium or Low
    #[arg(long)]
    pub priority: Option<Priority>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    Register(RegisterArgs),
    Login {
        /// User name or e-mail
        identifier: String,
        #[arg(long)]
        password: String,
    },
    Profile,
    Logout {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub mobile_number: String,
    /// YYYY-MM-DD
    #[arg(long, default_value = "")]
    pub birth_day: String,
    #[arg(long, default_value = "")]
    pub gender: String,
    #[arg(long)]
    pub user_name: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub photo_uri: Option<String>,
}

impl From<RegisterArgs> for NewUser {
    fn from(args: RegisterArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            mobile_number: args.mobile_number,
            birth_day: args.birth_day,
            gender: args.gender,
            user_name: args.user_name,
            password: args.password,
            photo_uri: args.photo_uri,
        }
    }
}

impl Error for Notice {}

/// Asks on stderr and reads the answer from stdin.
pub struct StdinConfirm {
    pub assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&self, title: &str, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let mut stderr = io::stderr().lock();
        if write!(stderr, "{title}: {message} [y/N] ").and_then(|()| stderr.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Install the logger. Quiet by default; `-v` raises the level.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn check(outcome: Outcome) -> Result<(), Box<dyn Error>> {
    match outcome {
        Outcome::Done => Ok(()),
        Outcome::Cancelled => {
            debug!("Action cancelled");
            Ok(())
        }
        Outcome::Rejected(notice) | Outcome::Failed(notice) => Err(Box::new(notice)),
    }
}

pub fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let path = get_db_path(cli.db.as_deref())?;
    let db = open_database(&path)?;
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Activities(action) => {
            let mut manager = ActivityManager::new(Arc::new(SqliteStore::new(db)));
            check(manager.initialize())?;
            run_activity_action(&mut manager, action, cli.json, &mut out)
        }
        Command::Categories(action) => {
            let mut manager = ActivityManager::new(Arc::new(SqliteStore::new(db)));
            check(manager.initialize())?;
            manager.switch_tab(Tab::Categories);
            run_category_action(&mut manager, action, cli.json, &mut out)
        }
        Command::User(action) => run_user_action(&Accounts::new(db), action, cli.json, &mut out),
    }
}

fn apply_activity_fields<S: Store>(
    manager: &mut ActivityManager<S>,
    fields: ActivityFields,
) -> Result<(), Box<dyn Error>> {
    if let Some(name) = fields.name {
        manager.set_activity_name(name);
    }
    if let Some(date) = fields.date {
        manager.pick_date(Some(parse_date(&date)?));
    }
    if let Some(start) = fields.start {
        manager.pick_start_time(Some(parse_time(&start)?));
    }
    if let Some(end) = fields.end {
        manager.pick_end_time(Some(parse_time(&end)?));
    }
    if let Some(status) = fields.status {
        manager.set_activity_status(status);
    }
    if let Some(category) = fields.category {
        let id = manager
            .categories()
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(category.trim()))
            .and_then(|c| c.id)
            .ok_or(AppError::NotFound { entity: "Category" })?;
        manager.select_category(id);
    }
    if let Some(notes) = fields.notes {
        manager.set_activity_notes(notes);
    }
    Ok(())
}

pub fn run_activity_action<S: Store>(
    manager: &mut ActivityManager<S>,
    action: ActivityAction,
    json: bool,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    match action {
        ActivityAction::List => {}
        ActivityAction::Add(fields) => {
            manager.open_new_activity();
            apply_activity_fields(manager, fields)?;
            check(manager.save_activity())?;
        }
        ActivityAction::Edit { id, fields } => {
            if !manager.edit_activity(id) {
                return Err(Box::new(AppError::NotFound { entity: "Activity" }));
            }
            apply_activity_fields(manager, fields)?;
            check(manager.save_activity())?;
        }
        ActivityAction::Delete { id, yes } => {
            check(manager.delete_activity(id, &StdinConfirm { assume_yes: yes }))?;
        }
    }
    render_activities(manager.activities(), json, out)
}

pub fn run_category_action<S: Store>(
    manager: &mut ActivityManager<S>,
    action: CategoryAction,
    json: bool,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    match action {
        CategoryAction::List => {}
        CategoryAction::Add(fields) => {
            manager.open_new_category();
            apply_category_fields(manager, fields);
            check(manager.save_category())?;
        }
        CategoryAction::Edit { id, fields } => {
            if !manager.edit_category(id) {
                return Err(Box::new(AppError::NotFound { entity: "Category" }));
            }
            apply_category_fields(manager, fields);
            check(manager.save_category())?;
        }
        CategoryAction::Delete { id, yes } => {
            check(manager.delete_category(id, &StdinConfirm { assume_yes: yes }))?;
        }
    }
    render_categories(manager.categories(), json, out)
}

fn apply_category_fields<S: Store>(manager: &mut ActivityManager<S>, fields: CategoryFields) {
    if let Some(name) = fields.name {
        manager.set_category_name(name);
    }
    if let Some(priority) = fields.priority {
        manager.set_category_priority(priority);
    }
    if let Some(notes) = fields.notes {
        manager.set_category_notes(notes);
    }
}

fn run_user_action(
    accounts: &Accounts,
    action: UserAction,
    json: bool,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    match action {
        UserAction::Register(args) => {
            let user = accounts.register(&NewUser::from(args))?;
            writeln!(out, "Account created successfully!")?;
            render_user(&user, json, out)
        }
        UserAction::Login { identifier, password } => match accounts.login(&identifier, &password)? {
            Some(user) => {
                writeln!(out, "Welcome {}", user.first_name)?;
                Ok(())
            }
            None => Err(Box::new(Notice::error("Invalid username or password"))),
        },
        UserAction::Profile => match accounts.profile()? {
            Some(user) => render_user(&user, json, out),
            None => {
                writeln!(out, "No user found")?;
                Ok(())
            }
        },
        UserAction::Logout { yes } => {
            if accounts.logout(&StdinConfirm { assume_yes: yes })? {
                writeln!(out, "Logged out")?;
            }
            Ok(())
        }
    }
}

fn write_json<T: Serialize + ?Sized>(value: &T, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn render_activities(
    activities: &[Activity],
    json: bool,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    if json {
        return write_json(activities, out);
    }
    if activities.is_empty() {
        writeln!(out, "No activities found.")?;
        return Ok(());
    }
    for a in activities {
        writeln!(
            out,
            "{:>4}  {}  {} - {}  {}  [{} • {} • {}]",
            a.id.unwrap_or_default(),
            a.date,
            a.start_time.as_deref().unwrap_or("--"),
            a.end_time.as_deref().unwrap_or("--"),
            a.name,
            a.category.as_deref().unwrap_or("No category"),
            a.priority.as_deref().unwrap_or("N/A"),
            a.status,
        )?;
    }
    Ok(())
}

pub fn render_categories(
    categories: &[Category],
    json: bool,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    if json {
        return write_json(categories, out);
    }
    if categories.is_empty() {
        writeln!(out, "No categories found.")?;
        return Ok(());
    }
    for c in categories {
        write!(out, "{:>4}  {}  Priority: {}", c.id.unwrap_or_default(), c.name, c.priority)?;
        if let Some(notes) = c.notes.as_deref().filter(|n| !n.is_empty()) {
            write!(out, "  Notes: {notes}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn render_user(user: &User, json: bool, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    if json {
        return write_json(user, out);
    }
    writeln!(out, "{} {} (@{})", user.first_name, user.last_name, user.user_name)?;
    writeln!(out, "Email: {}", user.email)?;
    writeln!(out, "Mobile: {}", user.mobile_number)?;
    writeln!(out, "Birthday: {}", user.birth_day)?;
    writeln!(out, "Gender: {}", user.gender)?;
    Ok(())
}
