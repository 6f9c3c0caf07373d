use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::error::{LineageError, Result};
use crate::revision::Revision;

/// Which way to follow edges when walking the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Toward parents and dependencies (older revisions).
    Down,
    /// Toward children and dependents (newer revisions).
    Up,
    /// Toward structural parents only.
    Parents,
    /// Toward structural children only.
    Children,
}

/// Indexed revision graph.
///
/// `children` and `dependents` carry an entry for every revision, so reverse
/// lookups never miss. `heads` and `bases` only consider structural parentage.
#[derive(Debug, Default)]
pub(crate) struct RevisionGraph {
    revisions: HashMap<String, Revision>,
    children: HashMap<String, BTreeSet<String>>,
    dependents: HashMap<String, BTreeSet<String>>,
    labels: HashMap<String, String>,
    heads: BTreeSet<String>,
    bases: BTreeSet<String>,
}

impl RevisionGraph {
    /// Index a full batch of descriptors.
    pub fn build(batch: Vec<Revision>) -> Result<Self> {
        let mut graph = Self::default();

        for revision in batch {
            if graph.revisions.contains_key(&revision.id) {
                return Err(LineageError::DuplicateRevision(revision.id));
            }
            graph.register_labels(&revision)?;
            graph.children.insert(revision.id.clone(), BTreeSet::new());
            graph.dependents.insert(revision.id.clone(), BTreeSet::new());
            graph.revisions.insert(revision.id.clone(), revision);
        }

        for revision in graph.revisions.values() {
            graph.check_references(revision)?;
            graph.check_label_collisions(revision)?;
        }

        for revision in graph.revisions.values() {
            for parent in &revision.parents {
                if let Some(children) = graph.children.get_mut(parent) {
                    children.insert(revision.id.clone());
                }
            }
            for dependency in &revision.dependencies {
                if let Some(dependents) = graph.dependents.get_mut(dependency) {
                    dependents.insert(revision.id.clone());
                }
            }
        }

        graph.heads = graph
            .children
            .iter()
            .filter(|(_, children)| children.is_empty())
            .map(|(id, _)| id.clone())
            .collect();
        graph.bases = graph
            .revisions
            .values()
            .filter(|rev| rev.is_base())
            .map(|rev| rev.id.clone())
            .collect();

        graph.check_acyclic()?;

        debug!(
            "Built revision graph: {} revisions, {} heads, {} bases",
            graph.revisions.len(),
            graph.heads.len(),
            graph.bases.len()
        );
        Ok(graph)
    }

    /// Add one revision to an already indexed graph.
    ///
    /// Touches only the new revision's parents and dependencies.
    pub fn insert(&mut self, revision: Revision) -> Result<()> {
        if self.revisions.contains_key(&revision.id) {
            return Err(LineageError::DuplicateRevision(revision.id));
        }
        self.check_references(&revision)?;
        self.check_label_collisions(&revision)?;
        self.register_labels(&revision)?;

        let id = revision.id.clone();
        for parent in &revision.parents {
            if let Some(children) = self.children.get_mut(parent) {
                children.insert(id.clone());
            }
            self.heads.remove(parent);
        }
        for dependency in &revision.dependencies {
            if let Some(dependents) = self.dependents.get_mut(dependency) {
                dependents.insert(id.clone());
            }
        }
        if revision.is_base() {
            self.bases.insert(id.clone());
        }
        self.children.insert(id.clone(), BTreeSet::new());
        self.dependents.insert(id.clone(), BTreeSet::new());
        self.heads.insert(id.clone());

        debug!("Added revision {} ({} heads)", id, self.heads.len());
        self.revisions.insert(id, revision);
        Ok(())
    }

    fn register_labels(&mut self, revision: &Revision) -> Result<()> {
        for label in &revision.branch_labels {
            if let Some(existing) = self.labels.get(label) {
                return Err(LineageError::DuplicateBranchLabel {
                    label: label.clone(),
                    revision: revision.id.clone(),
                    existing: existing.clone(),
                });
            }
        }
        for label in &revision.branch_labels {
            self.labels.insert(label.clone(), revision.id.clone());
        }
        Ok(())
    }

    /// A label may not shadow the id of a different revision.
    fn check_label_collisions(&self, revision: &Revision) -> Result<()> {
        for label in &revision.branch_labels {
            if *label != revision.id && self.revisions.contains_key(label) {
                return Err(LineageError::DuplicateBranchLabel {
                    label: label.clone(),
                    revision: revision.id.clone(),
                    existing: label.clone(),
                });
            }
        }
        if let Some(owner) = self.labels.get(&revision.id) {
            if *owner != revision.id {
                return Err(LineageError::DuplicateBranchLabel {
                    label: revision.id.clone(),
                    revision: owner.clone(),
                    existing: revision.id.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_references(&self, revision: &Revision) -> Result<()> {
        for parent in &revision.parents {
            if !self.revisions.contains_key(parent) {
                return Err(LineageError::ParentNotFound {
                    revision: revision.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
        for dependency in &revision.dependencies {
            if !self.revisions.contains_key(dependency) {
                return Err(LineageError::DependencyNotFound {
                    revision: revision.id.clone(),
                    dependency: dependency.clone(),
                });
            }
        }
        Ok(())
    }

    /// Kahn's algorithm over parent and dependency edges.
    fn check_acyclic(&self) -> Result<()> {
        let mut remaining: HashMap<&str, usize> = self
            .revisions
            .values()
            .map(|rev| (rev.id.as_str(), rev.down_revisions().count()))
            .collect();
        let mut ready: VecDeque<&str> = remaining
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| *id)
            .collect();

        while let Some(id) = ready.pop_front() {
            remaining.remove(id);
            for next in self.edges(id, Direction::Up) {
                if let Some(count) = remaining.get_mut(next) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push_back(next);
                    }
                }
            }
        }

        if remaining.is_empty() {
            Ok(())
        } else {
            let mut stuck: Vec<String> = remaining.keys().map(|id| id.to_string()).collect();
            stuck.sort();
            Err(LineageError::Cycle(stuck))
        }
    }

    pub fn get(&self, id: &str) -> Option<&Revision> {
        self.revisions.get(id)
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn heads(&self) -> impl Iterator<Item = &str> {
        self.heads.iter().map(String::as_str)
    }

    pub fn bases(&self) -> impl Iterator<Item = &str> {
        self.bases.iter().map(String::as_str)
    }

    pub fn is_head(&self, id: &str) -> bool {
        self.heads.contains(id)
    }

    pub fn label(&self, label: &str) -> Option<&Revision> {
        self.labels.get(label).and_then(|id| self.revisions.get(id))
    }

    /// Every revision, ordered by id.
    pub fn revisions(&self) -> Vec<&Revision> {
        let mut all: Vec<&Revision> = self.revisions.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Structural children of `id`, ordered by id.
    pub fn children(&self, id: &str) -> impl Iterator<Item = &str> {
        self.children
            .get(id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Neighbours of `id` in the given direction.
    pub fn edges<'a>(&'a self, id: &str, direction: Direction) -> Vec<&'a str> {
        match direction {
            Direction::Down => self
                .revisions
                .get(id)
                .map(|rev| rev.down_revisions().collect())
                .unwrap_or_default(),
            Direction::Up => {
                let mut up: BTreeSet<&str> = self.children(id).collect();
                if let Some(dependents) = self.dependents.get(id) {
                    up.extend(dependents.iter().map(String::as_str));
                }
                up.into_iter().collect()
            }
            Direction::Parents => self
                .revisions
                .get(id)
                .map(|rev| rev.parents.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            Direction::Children => self.children(id).collect(),
        }
    }

    /// Every revision reachable from `starts` in `direction`.
    ///
    /// The starting revisions themselves are only included when
    /// `include_starts` is set.
    pub fn walk<'a>(
        &'a self,
        starts: &[&'a str],
        direction: Direction,
        include_starts: bool,
    ) -> HashSet<&'a str> {
        let mut seen: HashSet<&'a str> = HashSet::new();
        let mut todo: Vec<&'a str> = Vec::new();

        for &start in starts {
            if include_starts {
                seen.insert(start);
            }
            todo.extend(self.edges(start, direction));
        }

        while let Some(id) = todo.pop() {
            if seen.insert(id) {
                todo.extend(self.edges(id, direction));
            }
        }

        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Vec<Revision> {
        vec![
            Revision::base("a"),
            Revision::new("b1", ["a"]),
            Revision::new("b2", ["a"]),
            Revision::new("c", ["b1", "b2"]),
            Revision::new("d", ["c"]),
        ]
    }

    #[test]
    fn test_build_heads_and_bases() {
        let graph = RevisionGraph::build(diamond()).unwrap();
        assert_eq!(graph.heads().collect::<Vec<_>>(), vec!["d"]);
        assert_eq!(graph.bases().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(graph.children("a").collect::<Vec<_>>(), vec!["b1", "b2"]);
        assert_eq!(graph.len(), 5);
    }

    #[test]
    fn test_parent_declared_later_in_batch() {
        let graph = RevisionGraph::build(vec![
            Revision::new("b", ["a"]),
            Revision::base("a"),
        ])
        .unwrap();
        assert_eq!(graph.heads().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_duplicate_revision() {
        let err = RevisionGraph::build(vec![Revision::base("a"), Revision::base("a")]).unwrap_err();
        assert!(matches!(err, LineageError::DuplicateRevision(ref id) if id == "a"));
        assert_eq!(err.to_string(), "duplicate revision a");
    }

    #[test]
    fn test_missing_parent() {
        let err = RevisionGraph::build(vec![Revision::new("b", ["a"])]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not find parent revision a of revision b"
        );
    }

    #[test]
    fn test_missing_dependency() {
        let err = RevisionGraph::build(vec![
            Revision::base("a"),
            Revision::new("b", ["a"]).with_dependencies(["zz"]),
        ])
        .unwrap_err();
        assert!(matches!(err, LineageError::DependencyNotFound { .. }));
    }

    #[test]
    fn test_duplicate_label() {
        let err = RevisionGraph::build(vec![
            Revision::base("a").with_branch_labels(["accounts"]),
            Revision::base("b").with_branch_labels(["accounts"]),
        ])
        .unwrap_err();
        assert!(matches!(err, LineageError::DuplicateBranchLabel { .. }));
    }

    #[test]
    fn test_label_shadowing_id() {
        let err = RevisionGraph::build(vec![
            Revision::base("a").with_branch_labels(["b"]),
            Revision::new("b", ["a"]),
        ])
        .unwrap_err();
        assert!(matches!(err, LineageError::DuplicateBranchLabel { .. }));

        let mut graph =
            RevisionGraph::build(vec![Revision::base("a").with_branch_labels(["next"])]).unwrap();
        let err = graph.insert(Revision::new("next", ["a"])).unwrap_err();
        assert!(matches!(err, LineageError::DuplicateBranchLabel { .. }));
    }

    #[test]
    fn test_cycle_detected() {
        let err = RevisionGraph::build(vec![
            Revision::base("root"),
            Revision::new("a", ["b"]),
            Revision::new("b", ["a"]),
        ])
        .unwrap_err();
        match err {
            LineageError::Cycle(ids) => assert_eq!(ids, vec!["a", "b"]),
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_insert_updates_heads() {
        let mut graph = RevisionGraph::build(diamond()).unwrap();
        graph.insert(Revision::new("e", ["d"])).unwrap();
        assert_eq!(graph.heads().collect::<Vec<_>>(), vec!["e"]);

        graph.insert(Revision::new("e2", ["d"])).unwrap();
        assert_eq!(graph.heads().collect::<Vec<_>>(), vec!["e", "e2"]);
        assert_eq!(graph.children("d").collect::<Vec<_>>(), vec!["e", "e2"]);
    }

    #[test]
    fn test_insert_base() {
        let mut graph = RevisionGraph::build(diamond()).unwrap();
        graph.insert(Revision::base("z")).unwrap();
        assert_eq!(graph.bases().collect::<Vec<_>>(), vec!["a", "z"]);
        assert!(graph.is_head("z"));
    }

    #[test]
    fn test_insert_rejects_missing_parent() {
        let mut graph = RevisionGraph::build(diamond()).unwrap();
        let err = graph.insert(Revision::new("e", ["nope"])).unwrap_err();
        assert!(matches!(err, LineageError::ParentNotFound { .. }));
        assert!(graph.get("e").is_none());
        assert_eq!(graph.heads().collect::<Vec<_>>(), vec!["d"]);
    }

    #[test]
    fn test_walk() {
        let graph = RevisionGraph::build(diamond()).unwrap();
        let mut down: Vec<&str> = graph.walk(&["c"], Direction::Down, false).into_iter().collect();
        down.sort();
        assert_eq!(down, vec!["a", "b1", "b2"]);

        let mut up: Vec<&str> = graph.walk(&["b1"], Direction::Up, true).into_iter().collect();
        up.sort();
        assert_eq!(up, vec!["b1", "c", "d"]);
    }

    #[test]
    fn test_dependency_edges() {
        let graph = RevisionGraph::build(vec![
            Revision::base("a"),
            Revision::base("x"),
            Revision::new("b", ["a"]).with_dependencies(["x"]),
        ])
        .unwrap();

        // dependencies do not make their target a non-head
        assert_eq!(graph.heads().collect::<Vec<_>>(), vec!["b", "x"]);
        assert_eq!(graph.edges("x", Direction::Up), vec!["b"]);
        assert_eq!(graph.edges("b", Direction::Down), vec!["a", "x"]);
    }
}
