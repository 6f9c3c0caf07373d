use anyhow::Result;
use clap::Parser;
use console::style;
use std::io::Write;

use lineage_core::RevisionMap;

/// Show a single revision.
#[derive(Parser)]
pub struct ShowCommand {
    /// Revision id, unique id prefix, branch label, `head` or `base`.
    pub revision: String,
}

impl ShowCommand {
    pub fn run(self, map: &RevisionMap, out: &mut dyn Write) -> Result<()> {
        let revision = map.get_revision(&self.revision)?;

        let mut markers = Vec::new();
        if map.is_head(&revision.id)? {
            markers.push("(head)");
        }
        if revision.is_base() {
            markers.push("(base)");
        }
        if map.is_branch_point(&revision.id)? {
            markers.push("(branchpoint)");
        }
        if revision.is_merge_point() {
            markers.push("(mergepoint)");
        }

        let mut title = style(&revision.id).bold().cyan().to_string();
        for marker in markers {
            title.push(' ');
            title.push_str(&style(marker).yellow().to_string());
        }
        writeln!(out, "Rev: {}", title)?;

        if !revision.parents.is_empty() {
            writeln!(out, "Parent: {}", revision.parents.join(", "))?;
        }
        if !revision.branch_labels.is_empty() {
            let labels: Vec<&str> = revision.branch_labels.iter().map(String::as_str).collect();
            writeln!(out, "Branch names: {}", labels.join(", "))?;
        }
        if !revision.dependencies.is_empty() {
            writeln!(out, "Depends on: {}", revision.dependencies.join(", "))?;
        }

        let children: Vec<String> = map
            .children(&revision.id)?
            .into_iter()
            .map(|child| child.id.clone())
            .collect();
        if !children.is_empty() {
            writeln!(out, "Branches into: {}", children.join(", "))?;
        }

        if let Some(message) = &revision.message {
            writeln!(out)?;
            for line in message.lines() {
                writeln!(out, "    {}", line)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::{render, sample_map};
    use lineage_core::{LineageError, Revision};

    fn show(revision: &str) -> ShowCommand {
        ShowCommand {
            revision: revision.to_string(),
        }
    }

    #[test]
    fn test_show_base() {
        let map = sample_map();
        let output = render(|out| show("a").run(&map, out));
        assert_eq!(
            output,
            "Rev: a (base) (branchpoint)\nBranches into: b1, b2\n\n    create accounts\n"
        );
    }

    #[test]
    fn test_show_by_label() {
        let map = sample_map();
        let output = render(|out| show("billing").run(&map, out));
        assert_eq!(output, "Rev: b1\nParent: a\nBranch names: billing\nBranches into: c\n");
    }

    #[test]
    fn test_show_head_symbol() {
        let map = sample_map();
        let output = render(|out| show("head").run(&map, out));
        assert!(output.starts_with("Rev: c (head) (mergepoint)\nParent: b1, b2\n"));
    }

    #[test]
    fn test_show_dependencies() {
        let map = RevisionMap::new(|| {
            vec![
                Revision::base("a"),
                Revision::base("x"),
                Revision::new("b", ["a"]).with_dependencies(["x"]),
            ]
        });
        let output = render(|out| show("b").run(&map, out));
        assert!(output.contains("Depends on: x\n"));
    }

    #[test]
    fn test_show_unknown_revision() {
        let map = sample_map();
        let err = show("zz").run(&map, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LineageError>(),
            Some(LineageError::NotFound(_))
        ));
    }

    #[test]
    fn test_show_ambiguous_prefix() {
        let map = sample_map();
        let err = show("b").run(&map, &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Multiple revisions start with 'b': b1, b2");
    }
}
