//! Implementation of the `unibuild clean` command.

use std::path::Path;

use anyhow::Result;

use super::load_session;
use crate::output::{print_info, print_success};

/// Remove generated outputs, the host build's target dir and fingerprints.
pub fn cmd_clean(config: &Path) -> Result<()> {
  let session = load_session(config)?;
  let removed = session.clean()?;

  if removed.is_empty() {
    print_info("Nothing to clean");
    return Ok(());
  }

  for path in &removed {
    print_success(&format!("Removed {}", path.display()));
  }
  Ok(())
}
