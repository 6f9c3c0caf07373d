use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A single schema change-set in the revision graph.
///
/// Revisions are compared and hashed by `id` alone; two descriptors with the
/// same id are the same revision as far as the graph is concerned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    /// Unique identifier within a map.
    pub id: String,

    /// Ids of the revisions this one directly follows. Empty for a base.
    #[serde(default)]
    pub parents: Vec<String>,

    /// Human-assigned names usable for symbolic lookup.
    #[serde(default)]
    pub branch_labels: BTreeSet<String>,

    /// Extra ids that must be applied first without being structural parents.
    #[serde(default, rename = "depends_on")]
    pub dependencies: Vec<String>,

    /// Free-form description of the change.
    #[serde(default)]
    pub message: Option<String>,
}

impl Revision {
    pub fn new<I, S>(id: impl Into<String>, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            parents: parents.into_iter().map(Into::into).collect(),
            branch_labels: BTreeSet::new(),
            dependencies: Vec::new(),
            message: None,
        }
    }

    /// A revision with no parents.
    pub fn base(id: impl Into<String>) -> Self {
        Self::new(id, Vec::<String>::new())
    }

    pub fn with_branch_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.branch_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// A revision with no parents is a root of the graph.
    pub fn is_base(&self) -> bool {
        self.parents.is_empty()
    }

    /// A revision with more than one parent joins branches back together.
    pub fn is_merge_point(&self) -> bool {
        self.parents.len() > 1
    }

    /// Parent ids followed by dependency ids, without repeats.
    ///
    /// This is the edge set used for ordering and reachability.
    pub fn down_revisions(&self) -> impl Iterator<Item = &str> {
        let mut seen = BTreeSet::new();
        self.parents
            .iter()
            .chain(self.dependencies.iter())
            .map(String::as_str)
            .filter(move |id| seen.insert(*id))
    }
}

impl PartialEq for Revision {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Revision {}

impl Hash for Revision {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
