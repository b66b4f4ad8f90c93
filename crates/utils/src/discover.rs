//! Locating simulation outputs on disk

// standard library
use std::path::{Path, PathBuf};

// crate modules
use crate::error::{Error, Result};

// external crates
use log::{debug, trace};

/// Find the last file in `dir` whose name matches `pattern`
///
/// The pattern supports `*` (any run of characters) and `?` (exactly one
/// character). Matches are sorted by file name and the last one is returned,
/// so the most recent of several numbered dumps is picked up when the numbers
/// share a width.
///
/// ```rust, no_run
/// # use mcpost_utils::latest_match;
/// let path = latest_match("./run", "statepoint.*.json").unwrap();
/// ```
///
/// Fails with [Error::InputNotFound] when the directory does not exist or
/// nothing in it matches.
pub fn latest_match<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let not_found = || Error::InputNotFound {
        pattern: pattern.to_string(),
        dir: dir.to_path_buf(),
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry?;
        // follows symlinks, so linked outputs are picked up too
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if matches_pattern(pattern, name) {
                trace!("{name} matches \"{pattern}\"");
                matches.push(entry.path());
            }
        }
    }

    matches.sort();
    debug!("{} file(s) in {dir:?} match \"{pattern}\"", matches.len());
    matches.pop().ok_or_else(not_found)
}

/// Test a file name against a wildcard pattern
///
/// ```rust
/// # use mcpost_utils::matches_pattern;
/// assert!(matches_pattern("statepoint.*.json", "statepoint.50.json"));
/// assert!(matches_pattern("source.?.plst", "source.1.plst"));
/// assert!(!matches_pattern("statepoint.*.json", "summary.json"));
/// ```
pub fn matches_pattern(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    let (mut p, mut n) = (0, 0);
    // position of the last `*` seen, and where in `name` it started matching
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some(&'*') => {
                backtrack = Some((p, n));
                p += 1;
            }
            Some(&c) if c == '?' || c == name[n] => {
                p += 1;
                n += 1;
            }
            _ => match backtrack {
                Some((star, start)) => {
                    p = star + 1;
                    n = start + 1;
                    backtrack = Some((star, start + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn wildcard_matching() {
        assert!(matches_pattern("*", ""));
        assert!(matches_pattern("*", "anything"));
        assert!(matches_pattern("statepoint.50.h5", "statepoint.50.h5"));
        assert!(matches_pattern("*.h5", "statepoint.50.h5"));
        assert!(matches_pattern("s*t*.h5", "statepoint.50.h5"));
        assert!(!matches_pattern("*.h5", "statepoint.50.h5.bak"));
        assert!(!matches_pattern("?", ""));
        assert!(!matches_pattern("statepoint.??.h5", "statepoint.100.h5"));
    }

    #[test]
    fn picks_last_sorted_match() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["statepoint.10.json", "statepoint.50.json", "summary.json"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let found = latest_match(dir.path(), "statepoint.*.json").unwrap();
        assert_eq!(found, dir.path().join("statepoint.50.json"));
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("run_50.json");
        File::create(&target).unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("statepoint.50.json")).unwrap();
        std::fs::create_dir(dir.path().join("statepoint.99.json")).unwrap();

        let found = latest_match(dir.path(), "statepoint.*.json").unwrap();
        assert_eq!(found, dir.path().join("statepoint.50.json"));
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("summary.json")).unwrap();

        let result = latest_match(dir.path(), "statepoint.*.json");
        assert!(matches!(result, Err(Error::InputNotFound { .. })));

        let result = latest_match(dir.path().join("missing"), "*");
        assert!(matches!(result, Err(Error::InputNotFound { .. })));
    }
}
