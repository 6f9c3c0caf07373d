use anyhow::Result;
use clap::Parser;
use console::style;
use std::io::Write;

use lineage_core::RevisionMap;

use super::{describe, write_summaries};

/// Show current head revisions.
#[derive(Parser)]
pub struct HeadsCommand {}

impl HeadsCommand {
    pub fn run(self, map: &RevisionMap, out: &mut dyn Write) -> Result<()> {
        let revisions = map.get_revisions("head")?;
        write_summaries(map, &revisions, "No revisions found", out)
    }
}

/// Show root revisions.
#[derive(Parser)]
pub struct BasesCommand {}

impl BasesCommand {
    pub fn run(self, map: &RevisionMap, out: &mut dyn Write) -> Result<()> {
        let revisions = map.get_revisions("base")?;
        write_summaries(map, &revisions, "No revisions found", out)
    }
}

/// Show revisions with more than one child, and where each branch starts.
#[derive(Parser)]
pub struct BranchesCommand {}

impl BranchesCommand {
    pub fn run(self, map: &RevisionMap, out: &mut dyn Write) -> Result<()> {
        let branch_points = map.branch_points()?;
        if branch_points.is_empty() {
            writeln!(out, "  {} No branch points", style("ℹ").blue())?;
            return Ok(());
        }

        for revision in branch_points {
            writeln!(out, "{}", describe(map, revision)?)?;
            for child in map.children(&revision.id)? {
                writeln!(out, "    {} {}", style("->").dim(), describe(map, child)?)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::{render, sample_map};
    use lineage_core::Revision;

    #[test]
    fn test_heads() {
        let map = sample_map();
        let output = render(|out| HeadsCommand {}.run(&map, out));
        assert_eq!(output, "(b1, b2) -> c (head) (mergepoint), merge\n");
    }

    #[test]
    fn test_bases() {
        let map = sample_map();
        let output = render(|out| BasesCommand {}.run(&map, out));
        assert_eq!(output, "<base> -> a (branchpoint), create accounts\n");
    }

    #[test]
    fn test_heads_empty_map() {
        let map = RevisionMap::new(Vec::<Revision>::new);
        let output = render(|out| HeadsCommand {}.run(&map, out));
        assert!(output.contains("No revisions found"));
    }

    #[test]
    fn test_branches() {
        let map = sample_map();
        let output = render(|out| BranchesCommand {}.run(&map, out));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "<base> -> a (branchpoint), create accounts",
                "    -> a -> b1 (billing)",
                "    -> a -> b2",
            ]
        );
    }

    #[test]
    fn test_branches_linear() {
        let map = RevisionMap::new(|| vec![Revision::base("a"), Revision::new("b", ["a"])]);
        let output = render(|out| BranchesCommand {}.run(&map, out));
        assert!(output.contains("No branch points"));
    }
}
