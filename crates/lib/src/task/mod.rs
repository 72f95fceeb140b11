//! Task identity and task definitions.
//!
//! Four kinds of tasks make up a build: the host library build, binding
//! generation, per-target native builds and copy tasks that wire producer
//! outputs into variant destinations. Their execution bodies live in
//! [`crate::execute::actions`].

pub mod id;
pub mod types;

pub use id::TaskId;
pub use types::{TaskAction, TaskInput, TaskNode};
