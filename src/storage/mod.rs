//! In-memory stores for users, accounts and histories.
//!
//! Each store guards its whole map with one lock, held for a single store
//! call only. No call ever holds two stores' locks at once.

mod account;
mod error;
mod history;
mod user;

pub use account::*;
pub use error::*;
pub use history::*;
pub use user::*;

use uuid::Uuid;

/// Source of fresh record ids. Swappable so tests can force collisions.
pub type IdSource = fn() -> Uuid;
