//! Configuration management for the CLI.
//!
//! A single `crossspec.toml` aggregates the library configurations
//! (`[extract]`, `[matcher]`, `[decomposer]`) with CLI-only sections.
//! Relative paths are resolved against the directory of the file.

use crate::error::{CliError, Result};
use crossspec_domain::{Authority, IdPrefix, Status};
use crossspec_extractor::ExtractorConfig;
use crossspec_trace::{DecomposerConfig, MatcherConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File looked up in the working directory when `--config` is absent
pub const CONFIG_FILE: &str = "crossspec.toml";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Project settings
    #[serde(default)]
    pub project: ProjectSettings,

    /// Code extraction
    #[serde(default)]
    pub extract: ExtractorConfig,

    /// Document claim import
    #[serde(default)]
    pub import: ImportSettings,

    /// Trace scoring
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Requirement decomposition
    #[serde(default)]
    pub decomposer: DecomposerConfig,

    /// Output locations and formatting
    #[serde(default)]
    pub output: OutputSettings,

    #[serde(skip)]
    base_dir: PathBuf,
}

/// Project settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Project name
    pub name: String,

    /// Repository scanned by `code-extract`
    pub repo_root: PathBuf,
}

/// Defaults applied to imported document claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Authority for records that do not carry one
    pub authority: Authority,

    /// Status for records that do not carry one
    pub status: Status,

    /// Claim id prefix strategy for document claims
    pub id_prefix: IdPrefix,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory holding the claim files
    pub claims_dir: PathBuf,

    /// Document claims file name
    pub spec_claims: String,

    /// Code claims file name
    pub code_claims: String,

    /// Default output format
    pub format: OutputFormat,

    /// Enable colored output
    pub color: bool,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Load configuration from `path`, or from `crossspec.toml` when present.
    ///
    /// Without either, the defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let path = PathBuf::from(CONFIG_FILE);
                path.exists().then_some(path)
            }
        };

        let config = match path {
            Some(path) => {
                let contents = fs::read_to_string(&path).map_err(|e| {
                    CliError::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                let mut config = Self::from_toml(&contents).map_err(CliError::Config)?;
                config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
                debug!("Loaded configuration from {}", path.display());
                config
            }
            None => Self::default(),
        };

        config.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = self.to_toml().map_err(CliError::Config)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate every section
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.extract.validate().map_err(|e| format!("[extract] {}", e))?;
        self.matcher.validate().map_err(|e| format!("[matcher] {}", e))?;
        self.decomposer
            .validate()
            .map_err(|e| format!("[decomposer] {}", e))?;
        if let IdPrefix::Namespace { prefix } = &self.import.id_prefix {
            if prefix.trim().is_empty() {
                return Err("[import] id_prefix namespace must not be empty".to_string());
            }
        }
        if self.output.spec_claims.trim().is_empty() || self.output.code_claims.trim().is_empty() {
            return Err("[output] claim file names must not be empty".to_string());
        }
        if self.output.spec_claims == self.output.code_claims {
            return Err("[output] spec_claims and code_claims must differ".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> std::result::Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }

    /// Directory relative paths are resolved against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a configured path
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Repository root for code extraction
    pub fn repo_root(&self) -> PathBuf {
        self.resolve(&self.project.repo_root)
    }

    /// Document claims file
    pub fn spec_claims_path(&self) -> PathBuf {
        self.resolve(&self.output.claims_dir).join(&self.output.spec_claims)
    }

    /// Code claims file
    pub fn code_claims_path(&self) -> PathBuf {
        self.resolve(&self.output.claims_dir).join(&self.output.code_claims)
    }

    /// Claim files read by the query commands, documents first
    pub fn claim_paths(&self) -> Vec<PathBuf> {
        vec![self.spec_claims_path(), self.code_claims_path()]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectSettings::default(),
            extract: ExtractorConfig::default(),
            import: ImportSettings::default(),
            matcher: MatcherConfig::default(),
            decomposer: DecomposerConfig::default(),
            output: OutputSettings::default(),
            base_dir: PathBuf::new(),
        }
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            name: "crossspec".to_string(),
            repo_root: PathBuf::from("."),
        }
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            authority: Authority::Normative,
            status: Status::Active,
            id_prefix: IdPrefix::default(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            claims_dir: PathBuf::from("outputs"),
            spec_claims: "claims.jsonl".to_string(),
            code_claims: "code_claims.jsonl".to_string(),
            format: OutputFormat::Table,
            color: true,
        }
    }
}
