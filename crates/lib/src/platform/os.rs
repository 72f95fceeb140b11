/// Host operating systems with a known shared-library naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  Android,
  MacOs,
  Windows,
}

impl Os {
  /// Detect the current operating system at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "android" => Some(Self::Android),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Applies this OS's shared-library file naming to a bare library name.
  pub fn shared_library_name(&self, name: &str) -> String {
    match self {
      Self::Linux | Self::Android => format!("lib{}.so", name),
      Self::MacOs => format!("lib{}.dylib", name),
      Self::Windows => format!("{}.dll", name),
    }
  }
}
