mod history;
mod inspect;
mod show;

pub use history::HistoryCommand;
pub use inspect::{BasesCommand, BranchesCommand, HeadsCommand};
pub use show::ShowCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use std::io::Write;
use std::path::PathBuf;

use lineage_core::config::LoggingConfig;
use lineage_core::{LineageConfig, ManifestSource, Revision, RevisionMap};

/// Lineage - inspect a migration revision graph
#[derive(Parser)]
#[command(name = "lineage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path.
    #[arg(short, long, default_value = "lineage.toml", global = true)]
    pub config: PathBuf,

    /// Revision manifest path (overrides the configured one).
    #[arg(short, long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show current head revisions.
    Heads(HeadsCommand),

    /// Show root revisions.
    Bases(BasesCommand),

    /// Show revisions that fork into several branches.
    Branches(BranchesCommand),

    /// Show a single revision.
    Show(ShowCommand),

    /// List revisions in traversal order.
    History(HistoryCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub fn execute(self) -> Result<()> {
        // Load .env if present
        dotenvy::dotenv().ok();

        let config = self.load_config()?;
        init_tracing(&config.logging, self.verbose);

        let manifest = self.manifest_path(&config);
        tracing::debug!(
            project = %config.project.name,
            manifest = %manifest.display(),
            "Loading revisions"
        );
        let map = RevisionMap::new(ManifestSource::new(manifest));

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match self.command {
            Commands::Heads(cmd) => cmd.run(&map, &mut out),
            Commands::Bases(cmd) => cmd.run(&map, &mut out),
            Commands::Branches(cmd) => cmd.run(&map, &mut out),
            Commands::Show(cmd) => cmd.run(&map, &mut out),
            Commands::History(cmd) => cmd.run(&map, &mut out),
        }
    }

    fn load_config(&self) -> Result<LineageConfig> {
        if self.config.exists() {
            return Ok(LineageConfig::from_file(&self.config)?);
        }
        if self.manifest.is_some() {
            return Ok(LineageConfig::default());
        }
        anyhow::bail!(
            "Configuration file not found: {}\nCreate one or pass --manifest <path>.",
            self.config.display()
        );
    }

    fn manifest_path(&self, config: &LineageConfig) -> PathBuf {
        match &self.manifest {
            Some(path) => path.clone(),
            None => config.manifest_path(&self.config),
        }
    }
}

/// Install the global subscriber. Logs go to stderr so command output stays
/// pipeable.
fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| logging.level.clone())
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if logging.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.ok();
}

/// One-line summary: `parents -> id (labels) (markers), message`.
pub(crate) fn describe(map: &RevisionMap, revision: &Revision) -> Result<String> {
    let parents = match revision.parents.as_slice() {
        [] => "<base>".to_string(),
        [parent] => parent.clone(),
        many => format!("({})", many.join(", ")),
    };

    let mut line = format!("{} -> {}", style(parents).dim(), style(&revision.id).cyan());

    if !revision.branch_labels.is_empty() {
        let labels: Vec<&str> = revision.branch_labels.iter().map(String::as_str).collect();
        line.push_str(&format!(" ({})", labels.join(", ")));
    }
    if map.is_head(&revision.id)? {
        line.push_str(&format!(" {}", style("(head)").green()));
    }
    if map.is_branch_point(&revision.id)? {
        line.push_str(&format!(" {}", style("(branchpoint)").yellow()));
    }
    if revision.is_merge_point() {
        line.push_str(&format!(" {}", style("(mergepoint)").yellow()));
    }
    if let Some(message) = &revision.message {
        line.push_str(&format!(", {}", message));
    }

    Ok(line)
}

/// Print one summary line per revision, or a notice when there are none.
pub(crate) fn write_summaries(
    map: &RevisionMap,
    revisions: &[&Revision],
    empty: &str,
    out: &mut dyn Write,
) -> Result<()> {
    if revisions.is_empty() {
        writeln!(out, "  {} {}", style("ℹ").blue(), empty)?;
        return Ok(());
    }
    for revision in revisions {
        writeln!(out, "{}", describe(map, revision)?)?;
    }
    Ok(())
}
