use anyhow::Result;
use clap::Parser;
use std::io::Write;

use lineage_core::{Identifier, RevisionMap, Selection};

use super::write_summaries;

/// List revisions from newest to oldest.
#[derive(Parser)]
pub struct HistoryCommand {
    /// Range to walk, as `upper:lower`. An empty upper means `head`, an
    /// empty lower walks down to the roots.
    #[arg(short = 'r', long, value_parser = parse_range)]
    pub range: Option<RevisionRange>,

    /// Leave the lower revisions themselves out of the listing.
    #[arg(long)]
    pub exclusive: bool,
}

/// Upper and lower bounds of a history walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRange {
    pub upper: Selection,
    pub lower: Selection,
}

impl Default for RevisionRange {
    fn default() -> Self {
        Self {
            upper: Selection::One(Identifier::Head),
            lower: Selection::One(Identifier::Base),
        }
    }
}

/// Parse `upper:lower`.
fn parse_range(s: &str) -> std::result::Result<RevisionRange, String> {
    let Some((upper, lower)) = s.split_once(':') else {
        return Err(format!(
            "history range requires [upper]:[lower], [upper]: or :[lower], got '{}'",
            s
        ));
    };

    let upper = match upper.trim() {
        "" => Selection::One(Identifier::Head),
        id => Selection::from(id),
    };
    let lower = match lower.trim() {
        "" => Selection::Boundary,
        id => Selection::from(id),
    };

    Ok(RevisionRange { upper, lower })
}

impl HistoryCommand {
    pub fn run(self, map: &RevisionMap, out: &mut dyn Write) -> Result<()> {
        let range = self.range.unwrap_or_default();
        tracing::debug!(
            upper = ?range.upper,
            lower = ?range.lower,
            exclusive = self.exclusive,
            "Walking history"
        );

        let revisions: Vec<_> = map
            .iterate_revisions(range.upper, range.lower, !self.exclusive)?
            .collect();
        write_summaries(map, &revisions, "No revisions in range", out)
    }
}
