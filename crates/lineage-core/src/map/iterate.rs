//! Bounded, branch-aware traversal from upper revisions down to lower ones.
//!
//! The walk only considers the revisions that are ancestors of the upper
//! selection and descendants of the lower selection. Within that subgraph it
//! runs each branch depth-first, but holds back any revision with more than
//! one child until every one of those children has been emitted. Branches that
//! arrive early are parked; the last arrival re-queues the shared ancestor at
//! the back of the queue so that all other pending branches finish first.

use std::collections::{HashMap, HashSet, VecDeque};
use std::iter::FusedIterator;

use tracing::debug;

use super::graph::{Direction, RevisionGraph};
use crate::error::{LineageError, Result};
use crate::revision::Revision;

/// Lazy iterator over the revisions between two selections.
///
/// Created by [`RevisionMap::iterate_revisions`](crate::RevisionMap::iterate_revisions).
#[derive(Debug)]
pub struct RevisionIter<'a> {
    graph: &'a RevisionGraph,
    queue: VecDeque<&'a str>,
    /// Arrivals still expected at each fork point.
    pending: HashMap<&'a str, usize>,
    subgraph: HashSet<&'a str>,
    lower: HashSet<&'a str>,
    emitted: HashSet<&'a str>,
    inclusive: bool,
}

impl<'a> RevisionIter<'a> {
    /// Validate the selections and set up the walk.
    ///
    /// `implicit_lower` holds lower revisions that were only named through the
    /// `base` symbol. Those the uppers cannot reach are dropped instead of
    /// being reported.
    pub(crate) fn plan(
        graph: &'a RevisionGraph,
        upper: &[&'a Revision],
        lower: &[&'a Revision],
        implicit_lower: &HashSet<&str>,
        inclusive: bool,
    ) -> Result<Self> {
        let upper = distinct_ids(upper);
        let mut lower = distinct_ids(lower);

        // Overlap is structural: a dependency between two requested heads is
        // resolved by ordering, not rejected.
        for &id in &upper {
            let ancestors = graph.walk(&[id], Direction::Parents, false);
            if upper.iter().any(|other| ancestors.contains(other)) {
                return Err(LineageError::HeadOverlap(id.to_string()));
            }
        }

        for &id in &lower {
            let descendants = graph.walk(&[id], Direction::Children, false);
            if lower.iter().any(|other| descendants.contains(other)) {
                return Err(LineageError::BaseOverlap(id.to_string()));
            }
        }

        let reachable = graph.walk(&upper, Direction::Down, true);
        lower.retain(|id| reachable.contains(id) || !implicit_lower.contains(id));

        let unreached: Vec<String> = lower
            .iter()
            .filter(|id| !reachable.contains(*id))
            .map(|id| id.to_string())
            .collect();
        if !unreached.is_empty() {
            return Err(LineageError::NotAnAncestor {
                lower: unreached,
                upper: upper.iter().map(|id| id.to_string()).collect(),
            });
        }

        let mut subgraph: HashSet<&'a str> = if lower.is_empty() {
            reachable
        } else {
            let above_lower = graph.walk(&lower, Direction::Up, true);
            reachable
                .into_iter()
                .filter(|id| above_lower.contains(id))
                .collect()
        };

        // An upper that another requested revision depends on waits for it,
        // like any other revision inside the subgraph.
        let deferred: HashSet<&'a str> = upper
            .iter()
            .copied()
            .filter(|&id| {
                graph.edges(id, Direction::Up).into_iter().any(|child| {
                    (subgraph.contains(child) || upper.contains(&child))
                        && !lower.contains(&child)
                })
            })
            .collect();
        subgraph.extend(deferred.iter().copied());

        // Fan-out counts children inside the subgraph plus requested uppers,
        // which are always emitted even when they sit outside it. Lower
        // revisions never descend, so they are not arrivals.
        let mut pending = HashMap::new();
        for &id in &subgraph {
            let fan_out = graph
                .edges(id, Direction::Up)
                .into_iter()
                .filter(|child| subgraph.contains(child) || upper.contains(child))
                .filter(|child| !lower.contains(child))
                .count();
            if fan_out > 1 {
                pending.insert(id, fan_out);
            }
        }

        debug!(
            "Planned traversal from {:?} to {:?}: {} revisions, {} fork points",
            upper,
            lower,
            subgraph.len(),
            pending.len()
        );

        Ok(Self {
            graph,
            queue: upper
                .into_iter()
                .filter(|id| !deferred.contains(id))
                .collect(),
            pending,
            subgraph,
            lower: lower.into_iter().collect(),
            emitted: HashSet::new(),
            inclusive,
        })
    }

    /// Queue the parents of `revision` that lie inside the subgraph.
    ///
    /// Parents with a single child continue the current branch and go to the
    /// front of the queue in declaration order. Fork points record an arrival
    /// and are queued at the back once their last child has been emitted.
    fn descend(&mut self, revision: &'a Revision) {
        let mut continuing = Vec::new();

        for parent in revision.down_revisions() {
            if !self.subgraph.contains(parent) {
                continue;
            }
            match self.pending.get_mut(parent) {
                Some(remaining) => {
                    *remaining -= 1;
                    if *remaining == 0 {
                        self.pending.remove(parent);
                        self.queue.push_back(parent);
                    }
                }
                None => continuing.push(parent),
            }
        }

        for parent in continuing.into_iter().rev() {
            self.queue.push_front(parent);
        }
    }
}

impl<'a> Iterator for RevisionIter<'a> {
    type Item = &'a Revision;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.queue.pop_front() {
            if !self.emitted.insert(id) {
                continue;
            }
            let Some(revision) = self.graph.get(id) else {
                continue;
            };

            if self.lower.contains(id) {
                if self.inclusive {
                    return Some(revision);
                }
                continue;
            }

            self.descend(revision);
            return Some(revision);
        }
        None
    }
}

impl FusedIterator for RevisionIter<'_> {}

fn distinct_ids<'a>(revisions: &[&'a Revision]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    revisions
        .iter()
        .map(|rev| rev.id.as_str())
        .filter(|id| seen.insert(*id))
        .collect()
}
