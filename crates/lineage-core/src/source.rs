//! Where revision descriptors come from.
//!
//! A [`RevisionMap`](crate::RevisionMap) never owns its descriptors outright; it
//! asks a [`RevisionSource`] for a fresh snapshot whenever it needs to (re)build.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{LineageError, Result};
use crate::revision::Revision;

/// Produces a fresh snapshot of revision descriptors on every call.
pub trait RevisionSource {
    fn load(&self) -> Result<Vec<Revision>>;
}

impl<F, I> RevisionSource for F
where
    F: Fn() -> I,
    I: IntoIterator<Item = Revision>,
{
    fn load(&self) -> Result<Vec<Revision>> {
        Ok(self().into_iter().collect())
    }
}

/// Reads descriptors from a TOML manifest of `[[revision]]` tables.
///
/// The file is re-read on every load so edits are picked up after a reload.
///
/// ```toml
/// [[revision]]
/// id = "1c9e"
///
/// [[revision]]
/// id = "3f2a"
/// parents = ["1c9e"]
/// branch_labels = ["billing"]
/// ```
#[derive(Debug, Clone)]
pub struct ManifestSource {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default, rename = "revision")]
    revisions: Vec<Revision>,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a manifest document without touching the filesystem.
    pub fn parse(content: &str) -> Result<Vec<Revision>> {
        let manifest: Manifest = toml::from_str(content)
            .map_err(|e| LineageError::Config(format!("Failed to parse manifest: {}", e)))?;
        Ok(manifest.revisions)
    }
}

impl RevisionSource for ManifestSource {
    fn load(&self) -> Result<Vec<Revision>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            LineageError::Config(format!(
                "Failed to read manifest {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let revisions = Self::parse(&content)?;
        debug!(
            "Loaded {} revision descriptors from {:?}",
            revisions.len(),
            self.path
        );
        Ok(revisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_closure_source() {
        let source = || vec![Revision::base("a")];
        let revisions = source.load().unwrap();
        assert_eq!(revisions.len(), 1);
        assert_eq!(revisions[0].id, "a");
    }

    #[test]
    fn test_parse_manifest() {
        let content = r#"
            [[revision]]
            id = "a"

            [[revision]]
            id = "b"
            parents = ["a"]
            branch_labels = ["accounts"]
        "#;

        let revisions = ManifestSource::parse(content).unwrap();
        assert_eq!(revisions.len(), 2);
        assert_eq!(revisions[1].parents, vec!["a"]);
        assert!(revisions[1].branch_labels.contains("accounts"));
    }

    #[test]
    fn test_parse_empty_manifest() {
        let revisions = ManifestSource::parse("").unwrap();
        assert!(revisions.is_empty());
    }

    #[test]
    fn test_parse_invalid_manifest() {
        let err = ManifestSource::parse("[[revision]]\nparents = 3").unwrap_err();
        assert!(matches!(err, LineageError::Config(_)));
    }

    #[test]
    fn test_manifest_reread_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("revisions.toml");
        fs::write(&path, "[[revision]]\nid = \"a\"\n").unwrap();

        let source = ManifestSource::new(&path);
        assert_eq!(source.load().unwrap().len(), 1);

        fs::write(
            &path,
            "[[revision]]\nid = \"a\"\n\n[[revision]]\nid = \"b\"\nparents = [\"a\"]\n",
        )
        .unwrap();
        assert_eq!(source.load().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_manifest() {
        let source = ManifestSource::new("/nonexistent/revisions.toml");
        let err = source.load().unwrap_err();
        assert!(err.to_string().contains("Failed to read manifest"));
    }
}
