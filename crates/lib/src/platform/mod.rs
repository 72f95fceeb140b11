pub mod os;

use os::Os;

/// Applies the host platform's shared-library naming convention.
///
/// Falls back to the standard library's `DLL_PREFIX`/`DLL_SUFFIX` on hosts
/// without an explicit mapping.
pub fn shared_library_name(name: &str) -> String {
  match Os::current() {
    Some(os) => os.shared_library_name(name),
    None => format!(
      "{}{}{}",
      std::env::consts::DLL_PREFIX,
      name,
      std::env::consts::DLL_SUFFIX
    ),
  }
}
