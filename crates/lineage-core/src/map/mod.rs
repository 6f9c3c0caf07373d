//! The revision map: lazy graph construction, lookups and traversal.

mod graph;
mod iterate;

pub use iterate::RevisionIter;

use std::collections::HashSet;

use once_cell::unsync::OnceCell;

use self::graph::{Direction, RevisionGraph};
use crate::error::{LineageError, Result};
use crate::revision::Revision;
use crate::selector::{Identifier, Selection};
use crate::source::RevisionSource;

/// Indexed view over a set of revisions supplied by a [`RevisionSource`].
///
/// The graph is built on first use and cached until [`RevisionMap::reload`].
/// Reads never mutate the map; [`RevisionMap::add_revision`] is the only
/// mutator and requires exclusive access.
pub struct RevisionMap {
    source: Box<dyn RevisionSource>,
    graph: OnceCell<RevisionGraph>,
}

impl RevisionMap {
    pub fn new(source: impl RevisionSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            graph: OnceCell::new(),
        }
    }

    fn graph(&self) -> Result<&RevisionGraph> {
        self.graph
            .get_or_try_init(|| RevisionGraph::build(self.source.load()?))
    }

    /// Drop the cached graph so the next query rebuilds from the source.
    ///
    /// Revisions added with [`RevisionMap::add_revision`] are discarded unless
    /// the source also produces them.
    pub fn reload(&mut self) {
        self.graph.take();
    }

    /// Ids of every current head, sorted.
    pub fn heads(&self) -> Result<Vec<String>> {
        Ok(self.graph()?.heads().map(str::to_string).collect())
    }

    /// Ids of every root revision, sorted.
    pub fn bases(&self) -> Result<Vec<String>> {
        Ok(self.graph()?.bases().map(str::to_string).collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.graph()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Every revision in the map, ordered by id.
    pub fn revisions(&self) -> Result<Vec<&Revision>> {
        Ok(self.graph()?.revisions())
    }

    /// Resolve an identifier that must name exactly one revision.
    ///
    /// Accepts an exact id, a branch label, a unique id prefix, or the symbols
    /// `head` and `base` when the map has exactly one of them.
    pub fn get_revision(&self, identifier: &str) -> Result<&Revision> {
        let graph = self.graph()?;
        let identifier = Identifier::parse(identifier);
        let mut found = resolve(graph, &identifier)?;
        match found.len() {
            1 => Ok(found.remove(0)),
            0 => Err(LineageError::NotFound(identifier.to_string())),
            _ => Err(LineageError::MultipleRevisions(identifier.to_string())),
        }
    }

    /// Resolve a selection to every revision it names, in request order.
    ///
    /// `head` and `base` expand to all heads or bases. A boundary selection
    /// (`None`, `()` or an empty list) resolves to nothing.
    pub fn get_revisions(&self, selection: impl Into<Selection>) -> Result<Vec<&Revision>> {
        let graph = self.graph()?;
        resolve_selection(graph, &selection.into())
    }

    /// Insert a single revision without rebuilding the graph.
    pub fn add_revision(&mut self, revision: Revision) -> Result<()> {
        self.graph()?;
        if let Some(graph) = self.graph.get_mut() {
            graph.insert(revision)?;
        }
        Ok(())
    }

    /// Whether `id` is a current head.
    ///
    /// `id` is an exact id, branch label or unique prefix. The `head` and
    /// `base` symbols are not expanded here, so a revision may carry either
    /// word as its id.
    pub fn is_head(&self, id: &str) -> Result<bool> {
        let graph = self.graph()?;
        let revision = resolve_name(graph, id)?;
        Ok(graph.is_head(&revision.id))
    }

    /// Whether more than one revision names `id` as a parent.
    pub fn is_branch_point(&self, id: &str) -> Result<bool> {
        let graph = self.graph()?;
        let revision = resolve_name(graph, id)?;
        Ok(graph.children(&revision.id).nth(1).is_some())
    }

    /// Revisions that name `id` as a structural parent, ordered by id.
    pub fn children(&self, id: &str) -> Result<Vec<&Revision>> {
        let graph = self.graph()?;
        let revision = resolve_name(graph, id)?;
        Ok(graph
            .children(&revision.id)
            .filter_map(|child| graph.get(child))
            .collect())
    }

    /// Every revision with more than one structural child, ordered by id.
    pub fn branch_points(&self) -> Result<Vec<&Revision>> {
        let graph = self.graph()?;
        Ok(graph
            .revisions()
            .into_iter()
            .filter(|rev| graph.children(&rev.id).nth(1).is_some())
            .collect())
    }

    /// Every revision `id` depends on, through parents or dependencies.
    pub fn ancestors(&self, id: &str) -> Result<Vec<&Revision>> {
        self.related(id, Direction::Down)
    }

    /// Every revision that depends on `id`, through parents or dependencies.
    pub fn descendants(&self, id: &str) -> Result<Vec<&Revision>> {
        self.related(id, Direction::Up)
    }

    fn related(&self, id: &str, direction: Direction) -> Result<Vec<&Revision>> {
        let graph = self.graph()?;
        let revision = resolve_name(graph, id)?;
        let mut found: Vec<&Revision> = graph
            .walk(&[revision.id.as_str()], direction, false)
            .into_iter()
            .filter_map(|id| graph.get(id))
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    /// Iterate from the `upper` selection down to the `lower` selection.
    ///
    /// Selection problems (overlapping heads or bases, a lower revision that
    /// is not an ancestor of any upper one) are reported here, before any
    /// revision is produced. When `inclusive` is false the revisions in
    /// `lower` are left out. A boundary `lower` walks all the way to the roots
    /// and is unaffected by `inclusive`.
    pub fn iterate_revisions(
        &self,
        upper: impl Into<Selection>,
        lower: impl Into<Selection>,
        inclusive: bool,
    ) -> Result<RevisionIter<'_>> {
        let graph = self.graph()?;
        let upper = resolve_selection(graph, &upper.into())?;
        let lower_selection = lower.into();
        let lower = resolve_selection(graph, &lower_selection)?;
        let implicit_lower = implicit_bases(graph, &lower_selection)?;
        RevisionIter::plan(graph, &upper, &lower, &implicit_lower, inclusive)
    }
}

impl std::fmt::Debug for RevisionMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevisionMap")
            .field("loaded", &self.graph.get().is_some())
            .finish()
    }
}

fn resolve_selection<'a>(
    graph: &'a RevisionGraph,
    selection: &Selection,
) -> Result<Vec<&'a Revision>> {
    let mut seen = HashSet::new();
    let mut revisions = Vec::new();
    for identifier in selection.identifiers() {
        for revision in resolve(graph, identifier)? {
            if seen.insert(revision.id.as_str()) {
                revisions.push(revision);
            }
        }
    }
    Ok(revisions)
}

/// Bases that a selection names only through the `base` symbol.
fn implicit_bases<'a>(
    graph: &'a RevisionGraph,
    selection: &Selection,
) -> Result<HashSet<&'a str>> {
    let identifiers = selection.identifiers();
    if !identifiers.contains(&Identifier::Base) {
        return Ok(HashSet::new());
    }

    let mut named = HashSet::new();
    for identifier in identifiers {
        if let Identifier::Revision(name) = identifier {
            named.insert(resolve_name(graph, name)?.id.as_str());
        }
    }
    Ok(graph.bases().filter(|id| !named.contains(id)).collect())
}

fn resolve<'a>(graph: &'a RevisionGraph, identifier: &Identifier) -> Result<Vec<&'a Revision>> {
    match identifier {
        Identifier::Head => Ok(graph.heads().filter_map(|id| graph.get(id)).collect()),
        Identifier::Base => Ok(graph.bases().filter_map(|id| graph.get(id)).collect()),
        Identifier::Revision(name) => resolve_name(graph, name).map(|rev| vec![rev]),
    }
}

/// Exact id first, then branch label, then unique id prefix.
fn resolve_name<'a>(graph: &'a RevisionGraph, name: &str) -> Result<&'a Revision> {
    if let Some(revision) = graph.get(name) {
        return Ok(revision);
    }
    if let Some(revision) = graph.label(name) {
        return Ok(revision);
    }

    let candidates: Vec<&Revision> = if name.is_empty() {
        Vec::new()
    } else {
        graph
            .revisions()
            .into_iter()
            .filter(|rev| rev.id.starts_with(name))
            .collect()
    };

    match candidates.as_slice() {
        [] => Err(LineageError::NotFound(name.to_string())),
        [revision] => Ok(*revision),
        _ => Err(LineageError::AmbiguousPrefix {
            prefix: name.to_string(),
            candidates: candidates.iter().map(|rev| rev.id.clone()).collect(),
        }),
    }
}
