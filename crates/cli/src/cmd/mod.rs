mod build;
mod clean;
mod targets;
mod tasks;

use std::path::Path;

use anyhow::{Context, Result};
use unibuild_lib::Session;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use targets::cmd_targets;
pub use tasks::cmd_tasks;

fn load_session(config: &Path) -> Result<Session> {
  Session::load(config).with_context(|| format!("failed to load {}", config.display()))
}
