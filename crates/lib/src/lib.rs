//! unibuild-lib: build orchestration for Rust libraries exposed through UniFFI
//!
//! This crate provides the pieces the `unibuild` CLI is made of:
//! - `Config`: the resolved `unibuild.toml`
//! - `TaskGraph`: host build, binding generation, per-target native builds
//!   and the copy tasks wiring their outputs into variants
//! - `execute`: parallel, incremental execution of a task selection
//! - `Session`: configuration and graph loaded together

pub mod artifact;
pub mod config;
pub mod consts;
pub mod execute;
pub mod graph;
pub mod layout;
pub mod platform;
pub mod profile;
pub mod session;
pub mod target;
pub mod task;
pub mod util;

pub use config::Config;
pub use session::{Session, SessionError};
