use std::env;
use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;

use crate::types::HarnessResult;

/// Environment variable to override the path to the cargo binary used to launch benchmarks.
pub const CARGO_PATH_ENV: &str = "DYNO_CARGO_PATH";

/// Environment variable to override the path to the perf binary used to wrap benchmarks.
pub const PERF_PATH_ENV: &str = "DYNO_PERF_PATH";

/// Get the path to the cargo binary.
///
/// If the [`CARGO_PATH_ENV`] environment variable is set, its value is used as the path to the
/// cargo binary. If it is not set, the binary is looked up in the system's PATH.
pub fn cargo_path() -> HarnessResult<PathBuf> {
    resolve_binary(CARGO_PATH_ENV, "cargo")
}

/// Get the path to the perf binary.
///
/// If the [`PERF_PATH_ENV`] environment variable is set, its value is used as the path to the
/// perf binary. If it is not set, the binary is looked up in the system's PATH.
pub fn perf_path() -> HarnessResult<PathBuf> {
    resolve_binary(PERF_PATH_ENV, "perf")
}

fn resolve_binary(env_name: &str, binary: &str) -> HarnessResult<PathBuf> {
    match env::var(env_name).ok().as_deref() {
        Some("") => {
            bail!("'{env_name}' set to empty string");
        }
        Some(name) if name == binary => {
            log::debug!("'{env_name}' is not a path so looking in user's 'PATH'");
            lookup_in_path(env_name, binary)
        }
        None => lookup_in_path(env_name, binary),
        Some(path) => {
            let binary_path = PathBuf::from(path);
            if !binary_path.exists() {
                bail!(
                    "Path to '{binary}' overridden with '{env_name}={path}' but that path doesn't exist",
                    path = binary_path.display()
                );
            }
            Ok(binary_path)
        }
    }
}

fn lookup_in_path(env_name: &str, binary: &str) -> HarnessResult<PathBuf> {
    which::which(binary).with_context(|| {
        format!(
            "'{binary}' not found in PATH. Please install it or set '{env_name}' to the correct path."
        )
    })
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;

    // Each test touches its own environment variable so the tests stay independent when run in
    // parallel.

    #[test]
    fn test_should_not_get_cargo_path_if_not_exist() {
        env::set_var(CARGO_PATH_ENV, "/non/existent/path/to/cargo");
        let result = cargo_path();
        assert!(result.is_err());

        env::set_var(CARGO_PATH_ENV, "");
        let result = cargo_path();
        assert!(result.is_err());
    }

    #[test]
    fn test_should_get_perf_path_from_env() {
        let temp = NamedTempFile::new().expect("failed to create temp file");
        let test_path = temp.path().to_str().expect("failed to get temp file path");
        env::set_var(PERF_PATH_ENV, test_path);
        let result = perf_path().expect("failed to get perf path");
        assert_eq!(result, PathBuf::from(test_path));
    }
}
