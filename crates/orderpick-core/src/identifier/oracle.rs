//! Uniqueness oracles
//!
//! The oracle answers one question: is this identifier still free? A
//! transport failure is reported as an error, never as "taken".
//!
//! The generator calls oracles synchronously and never imposes a deadline.
//! An oracle backed by a remote service must bound each call itself and
//! report an expired call as [`OracleError::Timeout`].

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("oracle timed out after {0:?}")]
    Timeout(Duration),
}

/// Checks whether an identifier is free. Single-shot and side-effect free.
pub trait UniquenessOracle {
    fn is_available(&self, candidate: &str) -> std::result::Result<bool, OracleError>;
}

impl<T: UniquenessOracle + ?Sized> UniquenessOracle for &T {
    fn is_available(&self, candidate: &str) -> std::result::Result<bool, OracleError> {
        (**self).is_available(candidate)
    }
}

/// Oracle backed by a fixed set of identifiers already in use
#[derive(Debug, Clone, Default)]
pub struct SetOracle {
    taken: HashSet<String>,
}

impl SetOracle {
    pub fn new<I, S>(taken: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SetOracle {
            taken: taken.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

impl UniquenessOracle for SetOracle {
    fn is_available(&self, candidate: &str) -> std::result::Result<bool, OracleError> {
        Ok(!self.taken.contains(candidate))
    }
}

/// Oracle backed by a file of taken identifiers, one per line.
///
/// The file is re-read on every check so identifiers claimed while a walk
/// is running are seen. Blank lines and `#` comments are ignored.
#[derive(Debug, Clone)]
pub struct FileOracle {
    path: PathBuf,
}

impl FileOracle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileOracle { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_taken(&self) -> std::result::Result<SetOracle, OracleError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| OracleError::Unavailable(format!("{}: {}", self.path.display(), e)))?;
        Ok(SetOracle::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        ))
    }
}

impl UniquenessOracle for FileOracle {
    fn is_available(&self, candidate: &str) -> std::result::Result<bool, OracleError> {
        self.read_taken()?.is_available(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_oracle() {
        let oracle = SetOracle::new(["LI1000001"]);
        assert_eq!(oracle.is_available("LI1000001"), Ok(false));
        assert_eq!(oracle.is_available("LI1000002"), Ok(true));
    }

    #[test]
    fn test_file_oracle_skips_comments_and_blanks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("taken.txt");
        std::fs::write(&path, "# in use\nLI1000001\n\n  LI1000002  \n").unwrap();

        let oracle = FileOracle::new(&path);
        assert_eq!(oracle.is_available("LI1000002"), Ok(false));
        assert_eq!(oracle.is_available("# in use"), Ok(true));
        assert_eq!(oracle.is_available("LI1000003"), Ok(true));
    }

    #[test]
    fn test_file_oracle_sees_later_claims() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("taken.txt");
        std::fs::write(&path, "LI1000001\n").unwrap();
        let oracle = FileOracle::new(&path);
        assert_eq!(oracle.is_available("LI1000002"), Ok(true));

        std::fs::write(&path, "LI1000001\nLI1000002\n").unwrap();
        assert_eq!(oracle.is_available("LI1000002"), Ok(false));
    }

    #[test]
    fn test_missing_file_is_unavailable_not_taken() {
        let dir = tempdir().unwrap();
        let oracle = FileOracle::new(dir.path().join("absent.txt"));
        assert!(matches!(
            oracle.is_available("LI1000001"),
            Err(OracleError::Unavailable(_))
        ));
    }
}
