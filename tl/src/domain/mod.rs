//! Domain types for tasklist
//!
//! Task, TaskId and Filter. These carry no persistence or UI logic; the
//! store module owns every mutation.

mod filter;
mod id;
mod task;

pub use filter::{Filter, ParseFilterError};
pub use id::{ParseTaskIdError, TaskId};
pub use task::Task;
