use thiserror::Error;

/// Core error type for lineage operations.
#[derive(Error, Debug)]
pub enum LineageError {
    #[error("duplicate revision {0}")]
    DuplicateRevision(String),

    #[error("could not find parent revision {parent} of revision {revision}")]
    ParentNotFound { revision: String, parent: String },

    #[error("could not find dependency {dependency} of revision {revision}")]
    DependencyNotFound { revision: String, dependency: String },

    #[error("branch label '{label}' on revision {revision} is already used by {existing}")]
    DuplicateBranchLabel {
        label: String,
        revision: String,
        existing: String,
    },

    #[error("revision graph contains a cycle through {}", .0.join(", "))]
    Cycle(Vec<String>),

    #[error("No such revision or branch '{0}'")]
    NotFound(String),

    #[error("Multiple revisions start with '{prefix}': {}", .candidates.join(", "))]
    AmbiguousPrefix {
        prefix: String,
        candidates: Vec<String>,
    },

    #[error("Identifier '{0}' corresponds to multiple revisions; please use get_revisions()")]
    MultipleRevisions(String),

    #[error("Requested head revision {0} overlaps with other requested head revisions")]
    HeadOverlap(String),

    #[error("Requested base revision {0} overlaps with other requested base revisions")]
    BaseOverlap(String),

    #[error(
        "Revision(s) {} is not an ancestor of revision(s) {}",
        .lower.join(", "),
        display_upper(.upper)
    )]
    NotAnAncestor {
        lower: Vec<String>,
        upper: Vec<String>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad classification of a [`LineageError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The revision graph itself is invalid.
    Structural,
    /// An identifier did not resolve to exactly one revision.
    Lookup,
    /// A symbol named several revisions through a singular accessor.
    Ambiguity,
    /// The requested traversal selection is contradictory or disconnected.
    Command,
    /// Configuration or descriptor loading failed.
    Config,
}

impl LineageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LineageError::DuplicateRevision(_)
            | LineageError::ParentNotFound { .. }
            | LineageError::DependencyNotFound { .. }
            | LineageError::DuplicateBranchLabel { .. }
            | LineageError::Cycle(_) => ErrorKind::Structural,
            LineageError::NotFound(_) | LineageError::AmbiguousPrefix { .. } => ErrorKind::Lookup,
            LineageError::MultipleRevisions(_) => ErrorKind::Ambiguity,
            LineageError::HeadOverlap(_)
            | LineageError::BaseOverlap(_)
            | LineageError::NotAnAncestor { .. } => ErrorKind::Command,
            LineageError::Config(_) | LineageError::Io(_) => ErrorKind::Config,
        }
    }

    /// Whether this error reflects a bad request rather than bad data.
    pub fn is_command_error(&self) -> bool {
        self.kind() == ErrorKind::Command
    }
}

fn display_upper(upper: &[String]) -> String {
    if upper.is_empty() {
        "base".to_string()
    } else {
        upper.join(", ")
    }
}

/// Result type alias using LineageError.
pub type Result<T> = std::result::Result<T, LineageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_an_ancestor_message() {
        let err = LineageError::NotAnAncestor {
            lower: vec!["d1cb1".into()],
            upper: vec!["b1".into()],
        };
        assert_eq!(
            err.to_string(),
            "Revision(s) d1cb1 is not an ancestor of revision(s) b1"
        );
        assert!(err.is_command_error());
    }

    #[test]
    fn test_not_an_ancestor_of_base() {
        let err = LineageError::NotAnAncestor {
            lower: vec!["x".into(), "y".into()],
            upper: vec![],
        };
        assert_eq!(
            err.to_string(),
            "Revision(s) x, y is not an ancestor of revision(s) base"
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            LineageError::MultipleRevisions("head".into()).kind(),
            ErrorKind::Ambiguity
        );
        assert_eq!(LineageError::NotFound("zz".into()).kind(), ErrorKind::Lookup);
        assert_eq!(
            LineageError::DuplicateRevision("a".into()).kind(),
            ErrorKind::Structural
        );
        assert_eq!(
            LineageError::Config("bad".into()).kind(),
            ErrorKind::Config
        );
    }
}
