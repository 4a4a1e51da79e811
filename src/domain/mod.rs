mod account;
mod id;
mod ledger;
mod user;

pub use account::*;
pub use id::*;
pub use ledger::*;
pub use user::*;
