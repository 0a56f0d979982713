//! Static extractor lookup keyed on artifact type

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::extractor::CodeExtractor;
use crossspec_domain::{ArtifactType, ExtractedClaim, Extractor};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Boxed extractor stored in the registry
pub type DynExtractor = Box<dyn Extractor<Error = ExtractorError> + Send + Sync>;

/// One extractor per artifact type
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: BTreeMap<ArtifactType, DynExtractor>,
}

impl ExtractorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the code extractor registered for `code`
    pub fn with_code_extractor(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        let mut registry = Self::new();
        registry.register(Box::new(CodeExtractor::new(config)?));
        Ok(registry)
    }

    /// Register an extractor under its own artifact type, replacing any previous one
    pub fn register(&mut self, extractor: DynExtractor) -> &mut Self {
        let artifact_type = extractor.artifact_type();
        debug!("Registering extractor for {}", artifact_type);
        self.extractors.insert(artifact_type, extractor);
        self
    }

    /// Extractor for an artifact type
    pub fn get(&self, artifact_type: ArtifactType) -> Option<&DynExtractor> {
        self.extractors.get(&artifact_type)
    }

    /// Registered artifact types in order
    pub fn artifact_types(&self) -> impl Iterator<Item = ArtifactType> + '_ {
        self.extractors.keys().copied()
    }

    /// Extract `path` with the extractor registered for `artifact_type`
    pub fn extract(
        &self,
        artifact_type: ArtifactType,
        path: &Path,
    ) -> Result<Vec<ExtractedClaim>, ExtractorError> {
        self.get(artifact_type)
            .ok_or(ExtractorError::Unsupported(artifact_type))?
            .extract(path)
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("artifact_types", &self.extractors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Reads claims produced by an external document extractor
///
/// The input is NDJSON, one `ExtractedClaim` per line. Blank lines are
/// skipped; every record must carry the feed's artifact type.
#[derive(Debug, Clone, Copy)]
pub struct ExtractedClaimFeed {
    artifact_type: ArtifactType,
}

impl ExtractedClaimFeed {
    /// Create a feed for a document artifact type
    pub fn new(artifact_type: ArtifactType) -> Self {
        Self { artifact_type }
    }

    /// Parse NDJSON text
    pub fn parse(&self, text: &str) -> Result<Vec<ExtractedClaim>, ExtractorError> {
        let mut claims = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let claim: ExtractedClaim = serde_json::from_str(line)
                .map_err(|source| ExtractorError::Json { line: idx + 1, source })?;
            if claim.source.artifact_type != self.artifact_type {
                return Err(ExtractorError::Config(format!(
                    "line {}: expected a {} claim, found {}",
                    idx + 1,
                    self.artifact_type,
                    claim.source.artifact_type
                )));
            }
            claims.push(claim);
        }
        Ok(claims)
    }
}

impl Extractor for ExtractedClaimFeed {
    type Error = ExtractorError;

    fn artifact_type(&self) -> ArtifactType {
        self.artifact_type
    }

    fn extract(&self, path: &Path) -> Result<Vec<ExtractedClaim>, ExtractorError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ExtractorError::io(path.display().to_string(), e))?;
        self.parse(&text)
    }
}
