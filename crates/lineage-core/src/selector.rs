//! Symbolic revision references.
//!
//! Callers name revisions with plain strings; these are parsed once into an
//! [`Identifier`] and grouped into a [`Selection`] before any graph lookup.

use std::fmt;

/// A single reference to one or more revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Every current head.
    Head,
    /// Every root revision.
    Base,
    /// An exact id, a branch label, or a unique id prefix.
    Revision(String),
}

impl Identifier {
    pub fn parse(s: &str) -> Self {
        match s {
            "head" => Identifier::Head,
            "base" => Identifier::Base,
            other => Identifier::Revision(other.to_string()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Head => f.write_str("head"),
            Identifier::Base => f.write_str("base"),
            Identifier::Revision(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::parse(s)
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Identifier::parse(&s)
    }
}

/// A set of revisions used as a traversal boundary or lookup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// No revisions named: the conceptual root boundary.
    Boundary,
    One(Identifier),
    Many(Vec<Identifier>),
}

impl Selection {
    pub fn is_boundary(&self) -> bool {
        matches!(self, Selection::Boundary)
    }

    pub fn identifiers(&self) -> &[Identifier] {
        match self {
            Selection::Boundary => &[],
            Selection::One(id) => std::slice::from_ref(id),
            Selection::Many(ids) => ids,
        }
    }

    fn from_identifiers(ids: Vec<Identifier>) -> Self {
        if ids.is_empty() {
            Selection::Boundary
        } else {
            Selection::Many(ids)
        }
    }
}

impl From<Identifier> for Selection {
    fn from(id: Identifier) -> Self {
        Selection::One(id)
    }
}

impl From<&str> for Selection {
    fn from(s: &str) -> Self {
        Selection::One(Identifier::parse(s))
    }
}

impl From<String> for Selection {
    fn from(s: String) -> Self {
        Selection::One(Identifier::parse(&s))
    }
}

impl From<&String> for Selection {
    fn from(s: &String) -> Self {
        Selection::One(Identifier::parse(s))
    }
}

impl From<()> for Selection {
    fn from(_: ()) -> Self {
        Selection::Boundary
    }
}

impl<T: Into<Selection>> From<Option<T>> for Selection {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Selection::Boundary)
    }
}

impl<S: AsRef<str>> From<Vec<S>> for Selection {
    fn from(ids: Vec<S>) -> Self {
        Selection::from_identifiers(ids.iter().map(|s| Identifier::parse(s.as_ref())).collect())
    }
}

impl<S: AsRef<str>> From<&[S]> for Selection {
    fn from(ids: &[S]) -> Self {
        Selection::from_identifiers(ids.iter().map(|s| Identifier::parse(s.as_ref())).collect())
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for Selection {
    fn from(ids: [S; N]) -> Self {
        Selection::from_identifiers(ids.iter().map(|s| Identifier::parse(s.as_ref())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbols() {
        assert_eq!(Identifier::parse("head"), Identifier::Head);
        assert_eq!(Identifier::parse("base"), Identifier::Base);
        assert_eq!(
            Identifier::parse("ae10"),
            Identifier::Revision("ae10".into())
        );
    }

    #[test]
    fn test_boundary_forms() {
        assert!(Selection::from(()).is_boundary());
        assert!(Selection::from(None::<&str>).is_boundary());
        assert!(Selection::from(Vec::<&str>::new()).is_boundary());
        assert!(Selection::from([""; 0]).is_boundary());
    }

    #[test]
    fn test_many() {
        let sel = Selection::from(["merge", "fe1b1"]);
        assert_eq!(sel.identifiers().len(), 2);
        assert_eq!(sel.identifiers()[0].to_string(), "merge");
    }

    #[test]
    fn test_some_is_one() {
        let sel = Selection::from(Some("head"));
        assert_eq!(sel, Selection::One(Identifier::Head));
    }
}
