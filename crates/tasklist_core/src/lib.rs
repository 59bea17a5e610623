pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod share;
pub mod store;

pub use error::AppError;
pub use model::{Draft, EditState, Task, TaskId};
pub use store::TaskStore;
