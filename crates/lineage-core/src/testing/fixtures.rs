//! Ready-made revision maps.

use crate::map::RevisionMap;
use crate::revision::Revision;

/// A straight line `a <- b <- c`.
pub fn linear() -> RevisionMap {
    RevisionMap::new(|| {
        vec![
            Revision::base("a"),
            Revision::new("b", ["a"]),
            Revision::new("c", ["b"]),
        ]
    })
}

/// `a` forks into `b1`/`b2`, which merge at `c`, followed by `d`.
pub fn diamond() -> RevisionMap {
    RevisionMap::new(|| {
        vec![
            Revision::base("a"),
            Revision::new("b1", ["a"]),
            Revision::new("b2", ["a"]),
            Revision::new("c", ["b1", "b2"]),
            Revision::new("d", ["c"]),
        ]
    })
}

/// Two branches off `a`, each fanning out again, with one late merge.
pub fn multiple_branches() -> RevisionMap {
    RevisionMap::new(|| {
        vec![
            Revision::base("a"),
            Revision::new("b1", ["a"]),
            Revision::new("b2", ["a"]),
            Revision::new("cb1", ["b1"]),
            Revision::new("cb2", ["b2"]),
            Revision::new("d1cb1", ["cb1"]),
            Revision::new("d2cb1", ["cb1"]),
            Revision::new("d1cb2", ["cb2"]),
            Revision::new("d2cb2", ["cb2"]),
            Revision::new("d3cb2", ["cb2"]),
            Revision::new("d1d2cb2", ["d1cb2", "d2cb2"]),
        ]
    })
}

/// A trunk `a1..a3` splitting into two branches that merge again, with a
/// side branch `e1b1 <- fe1b1` hanging off `db1`.
pub fn branch_travelling() -> RevisionMap {
    RevisionMap::new(|| {
        vec![
            Revision::base("a1"),
            Revision::new("a2", ["a1"]),
            Revision::new("a3", ["a2"]),
            Revision::new("b1", ["a3"]),
            Revision::new("b2", ["a3"]),
            Revision::new("cb1", ["b1"]),
            Revision::new("cb2", ["b2"]),
            Revision::new("db1", ["cb1"]),
            Revision::new("db2", ["cb2"]),
            Revision::new("e1b1", ["db1"]),
            Revision::new("fe1b1", ["e1b1"]),
            Revision::new("e2b1", ["db1"]),
            Revision::new("e2b2", ["db2"]),
            Revision::new("merge", ["e2b1", "e2b2"]),
        ]
    })
}

/// Three independent roots; two of the lines merge.
pub fn multiple_bases() -> RevisionMap {
    RevisionMap::new(|| {
        vec![
            Revision::base("base1"),
            Revision::base("base2"),
            Revision::base("base3"),
            Revision::new("a1a", ["base1"]),
            Revision::new("a1b", ["base1"]),
            Revision::new("a2", ["base2"]),
            Revision::new("a3", ["base3"]),
            Revision::new("b1a", ["a1a"]),
            Revision::new("b1b", ["a1b"]),
            Revision::new("b2", ["a2"]),
            Revision::new("b3", ["a3"]),
            Revision::new("c2", ["b2"]),
            Revision::new("d2", ["c2"]),
            Revision::new("mergeb3d2", ["b3", "d2"]),
        ]
    })
}
