// Application layer - use cases and orchestration over the stores.

pub mod error;
pub mod request;
pub mod response;
pub mod service;

pub use error::*;
pub use request::*;
pub use response::*;
pub use service::*;
