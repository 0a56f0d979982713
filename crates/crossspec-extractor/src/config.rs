//! Configuration for the Extractor

use crate::builder::FacetRule;
use crate::language::LanguageFilter;
use crate::scanner::Granularity;
use crossspec_domain::{Authority, IdPrefix, Status};
use serde::{Deserialize, Serialize};

/// Default per-file size cap (bytes)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1_000_000;

/// Configuration for the code extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Which units become claims
    pub granularity: Granularity,

    /// Language filter
    pub language: LanguageFilter,

    /// Include globs relative to the repository root; empty uses the
    /// language filter's defaults
    pub include: Vec<String>,

    /// Exclude globs, applied on top of the defaults
    pub exclude: Vec<String>,

    /// Apply the built-in exclude list (VCS, build output, virtualenvs)
    pub default_excludes: bool,

    /// Files larger than this are skipped
    pub max_file_bytes: u64,

    /// Decode non-UTF-8 files as Latin-1 instead of skipping them
    pub latin1_fallback: bool,

    /// Authority assigned to code claims
    pub authority: Authority,

    /// Status assigned to code claims
    pub status: Status,

    /// Claim id prefix strategy; code ids are named after the language
    pub id_prefix: IdPrefix,

    /// Path keyword rules for facet inference
    pub vocabulary: Vec<FacetRule>,

    /// Scan files on the rayon pool
    pub parallel: bool,

    /// Keep at most this many claims (after sorting)
    pub limit: Option<usize>,
}

impl ExtractorConfig {
    /// Include globs in effect
    pub fn effective_includes(&self) -> Vec<String> {
        if self.include.is_empty() {
            self.language.default_includes()
        } else {
            self.include.clone()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_file_bytes == 0 {
            return Err("max_file_bytes must be greater than 0".to_string());
        }
        if self.limit == Some(0) {
            return Err("limit must be greater than 0 when set".to_string());
        }
        for pattern in self.include.iter().chain(&self.exclude) {
            globset::Glob::new(pattern)
                .map_err(|e| format!("invalid glob pattern '{}': {}", pattern, e))?;
        }
        if let IdPrefix::Namespace { prefix } = &self.id_prefix {
            if prefix.trim().is_empty() {
                return Err("id_prefix namespace must not be empty".to_string());
            }
        }
        for rule in &self.vocabulary {
            rule.validate()?;
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    /// Function granularity over every supported language
    fn default() -> Self {
        Self {
            granularity: Granularity::Function,
            language: LanguageFilter::All,
            include: Vec::new(),
            exclude: Vec::new(),
            default_excludes: true,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            latin1_fallback: false,
            authority: Authority::Informative,
            status: Status::Active,
            id_prefix: IdPrefix::Language,
            vocabulary: FacetRule::default_vocabulary(),
            parallel: true,
            limit: None,
        }
    }
}

impl ExtractorConfig {
    /// Strict preset: small size cap, no encoding fallback
    pub fn strict() -> Self {
        Self {
            max_file_bytes: 256 * 1024,
            latin1_fallback: false,
            ..Self::default()
        }
    }

    /// Lenient preset: large size cap, Latin-1 fallback for legacy sources
    pub fn lenient() -> Self {
        Self {
            max_file_bytes: 4 * DEFAULT_MAX_FILE_BYTES,
            latin1_fallback: true,
            ..Self::default()
        }
    }
}
