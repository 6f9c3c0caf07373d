mod logging;

pub use logging::LoggingConfig;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LineageError, Result};

/// Root configuration for lineage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineageConfig {
    /// Project metadata.
    #[serde(default)]
    pub project: ProjectConfig,

    /// Where revision descriptors live.
    #[serde(default)]
    pub revisions: RevisionsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LineageConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| LineageError::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        // Substitute environment variables
        let content = substitute_env_vars(content);

        toml::from_str(&content)
            .map_err(|e| LineageError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Manifest path, resolved against the directory holding the config file.
    pub fn manifest_path(&self, config_path: impl AsRef<Path>) -> PathBuf {
        let manifest = &self.revisions.manifest;
        if manifest.is_absolute() {
            return manifest.clone();
        }
        match config_path.as_ref().parent() {
            Some(dir) => dir.join(manifest),
            None => manifest.clone(),
        }
    }
}

/// Project metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name.
    #[serde(default = "default_project_name")]
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
        }
    }
}

fn default_project_name() -> String {
    "lineage".to_string()
}

/// Revision descriptor location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionsConfig {
    /// TOML manifest of `[[revision]]` entries.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
}

impl Default for RevisionsConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
        }
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("revisions.toml")
}

/// Substitute environment variables in the format ${VAR_NAME}.
fn substitute_env_vars(content: &str) -> String {
    let mut result = content.to_string();
    let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
        return result;
    };

    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}
