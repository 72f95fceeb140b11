//! Implementation of the `unibuild targets` command.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

use unibuild_lib::Config;
use unibuild_lib::target::Target;

use crate::output::symbols;

/// Print every known target with its ABI, marking those that are configured.
///
/// Only the configuration file is read, so this works before the native
/// package exists.
pub fn cmd_targets(config: &Path) -> Result<()> {
  let config = Config::load(config).with_context(|| format!("failed to load {}", config.display()))?;

  for target in Target::ALL {
    let marker = if config.targets.contains(&target) {
      symbols::SUCCESS
    } else {
      " "
    };
    println!(
      "{} {:<8} {}",
      marker.if_supports_color(Stream::Stdout, |s| s.green()),
      target.arch(),
      target.abi().if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  }

  Ok(())
}
