//! Shared helpers for error-tolerant iteration and path handling.

use std::fmt::Display;
use std::path::Path;

/// Log an error at debug level and convert the result to an Option.
///
/// Use in `filter_map` chains where individual failures should not stop
/// the whole operation:
///
/// ```ignore
/// let entries: Vec<_> = walker
///     .filter_map(|r| log_filter_error(r, "walking directory"))
///     .collect();
/// ```
pub fn log_filter_error<T, E: Display>(result: Result<T, E>, context: &str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!("{}: {}", context, e);
            None
        }
    }
}

/// Forward-slash path relative to `root`, falling back to the full path.
pub fn relative_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_error_keeps_ok() {
        let ok: Result<u8, String> = Ok(3);
        let err: Result<u8, String> = Err("boom".into());
        assert_eq!(log_filter_error(ok, "ctx"), Some(3));
        assert_eq!(log_filter_error(err, "ctx"), None);
    }

    #[test]
    fn test_relative_path() {
        let root = Path::new("/repo");
        assert_eq!(relative_path(Path::new("/repo/src/a.rs"), root), "src/a.rs");
        assert_eq!(relative_path(Path::new("/other/b.rs"), root), "/other/b.rs");
    }
}
