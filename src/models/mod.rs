pub mod activity;
pub mod category;
pub mod user;

pub use activity::Activity;
pub use category::{Category, Priority};
pub use user::{NewUser, User};
