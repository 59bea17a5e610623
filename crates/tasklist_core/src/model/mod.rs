mod draft;
mod task;

pub use draft::{Draft, EditState};
pub use task::{IdGenerator, Task, TaskId};
