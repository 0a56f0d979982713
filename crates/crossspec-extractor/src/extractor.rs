//! Core code extractor: discovery, scanning and claim finalization

use crate::builder::CodeClaimBuilder;
use crate::config::ExtractorConfig;
use crate::discovery::{Discovery, DiscoverySummary, SourceFile};
use crate::error::{Diagnostic, DiagnosticKind, ExtractorError};
use crate::language::Language;
use crate::scanner::scan_units;
use crossspec_domain::{
    sha256_hex, ArtifactType, Claim, ExtractedClaim, Extractor, Locator, RunContext,
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Claims and diagnostics of one file
#[derive(Debug, Clone, Default)]
pub struct FileExtraction {
    /// Extracted claims in unit order
    pub claims: Vec<ExtractedClaim>,
    /// Non-fatal problems (partial units)
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of an extraction run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Finalized claims sorted by (path, byte offset)
    pub claims: Vec<Claim>,
    /// Per-file problems, sorted by path
    pub diagnostics: Vec<Diagnostic>,
    /// Discovery counts
    pub summary: DiscoverySummary,
    /// Files scanned without a file-level error
    pub files_scanned: usize,
    /// Wall-clock duration
    pub processing_time_ms: u64,
}

impl RunReport {
    /// Diagnostics of one kind
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}

/// Decode file bytes as UTF-8, optionally falling back to Latin-1
///
/// NUL bytes mark binary content and are always rejected. A UTF-8 BOM is
/// stripped; byte offsets refer to the decoded text.
pub fn decode_source(path: &str, bytes: &[u8], latin1_fallback: bool) -> Result<String, ExtractorError> {
    if bytes.contains(&0) {
        return Err(ExtractorError::Decode {
            path: path.to_string(),
            reason: "contains NUL bytes".to_string(),
        });
    }
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) if latin1_fallback => {
            debug!("Decoding {} as Latin-1", path);
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        }
        Err(e) => Err(ExtractorError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Finalize extracted claims; rejected claims become diagnostics
pub fn finalize_claims(
    extracted: Vec<ExtractedClaim>,
    ctx: &RunContext,
) -> (Vec<Claim>, Vec<Diagnostic>) {
    let mut claims = Vec::with_capacity(extracted.len());
    let mut diagnostics = Vec::new();
    for item in extracted {
        let path = item.source.path.clone();
        match Claim::build(item, ctx) {
            Ok(claim) => claims.push(claim),
            Err(e) => {
                warn!("Rejected claim from {}: {}", path, e);
                diagnostics.push(Diagnostic::new(path, DiagnosticKind::Validation, e.to_string()));
            }
        }
    }
    (claims, diagnostics)
}

/// The code extractor
///
/// Scans C, C++ and Python sources into unit claims. Files are processed
/// independently; a file that cannot be read or decoded is recorded in the
/// [`RunReport`] and the run continues.
#[derive(Debug, Clone)]
pub struct CodeExtractor {
    config: ExtractorConfig,
    builder: CodeClaimBuilder,
}

impl CodeExtractor {
    /// Create an extractor, validating the configuration
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            builder: CodeClaimBuilder::new(&config),
            config,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Read, decode and scan one file
    pub fn extract_file(&self, file: &SourceFile) -> Result<FileExtraction, ExtractorError> {
        let rel = file.relative_path.as_str();
        let size = std::fs::metadata(&file.path)
            .map_err(|e| ExtractorError::io(rel, e))?
            .len();
        if size > self.config.max_file_bytes {
            return Err(ExtractorError::SizeLimitExceeded {
                path: rel.to_string(),
                size,
                max: self.config.max_file_bytes,
            });
        }
        let bytes = std::fs::read(&file.path).map_err(|e| ExtractorError::io(rel, e))?;
        let file_sha256 = sha256_hex(&bytes);
        let text = decode_source(rel, &bytes, self.config.latin1_fallback)?;

        let output = scan_units(&text, file.language, self.config.granularity, file.is_header);
        let diagnostics = output
            .partial
            .iter()
            .map(|p| {
                Diagnostic::new(
                    rel,
                    DiagnosticKind::PartialUnit,
                    format!(
                        "unit {} starting at byte {} is unclosed at end of file",
                        p.name.as_deref().unwrap_or("<anonymous>"),
                        p.start
                    ),
                )
            })
            .collect();
        debug!("Scanned {}: {} units", rel, output.units.len());

        Ok(FileExtraction {
            claims: self.builder.build(file, &text, &file_sha256, &output.units),
            diagnostics,
        })
    }

    /// Discover and extract every source file under `root`
    ///
    /// # Errors
    /// Fails only when the include or exclude globs do not compile;
    /// per-file problems are reported in the [`RunReport`].
    pub fn run(&self, root: &Path, ctx: &RunContext) -> Result<RunReport, ExtractorError> {
        Ok(self.run_with(Discovery::new(root, &self.config)?, ctx))
    }

    /// Like [`CodeExtractor::run`], never selecting `output`
    pub fn run_excluding(
        &self,
        root: &Path,
        output: &Path,
        ctx: &RunContext,
    ) -> Result<RunReport, ExtractorError> {
        let discovery = Discovery::new(root, &self.config)?.skip_path(output);
        Ok(self.run_with(discovery, ctx))
    }

    fn run_with(&self, discovery: Discovery, ctx: &RunContext) -> RunReport {
        let start = Instant::now();
        let discovered = discovery.discover();
        info!(
            "Extracting {} files ({} matched, {} excluded, {} too large)",
            discovered.files.len(),
            discovered.summary.matched,
            discovered.summary.excluded,
            discovered.summary.too_large
        );

        let mut report = self.extract_files(&discovered.files, ctx);
        report.summary = discovered.summary;
        report.diagnostics.extend(discovered.diagnostics);
        report.diagnostics.sort_by(|a, b| a.path.cmp(&b.path));
        report.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Extraction complete: {} claims from {} files, {} diagnostics",
            report.claims.len(),
            report.files_scanned,
            report.diagnostics.len()
        );
        report
    }

    /// Extract and finalize the given files
    pub fn extract_files(&self, files: &[SourceFile], ctx: &RunContext) -> RunReport {
        let process = |file: &SourceFile| -> (Vec<Claim>, Vec<Diagnostic>, bool) {
            match self.extract_file(file) {
                Ok(extraction) => {
                    let (claims, mut diagnostics) = finalize_claims(extraction.claims, ctx);
                    diagnostics.extend(extraction.diagnostics);
                    (claims, diagnostics, true)
                }
                Err(e) => {
                    warn!("Skipping {}: {}", file.relative_path, e);
                    (Vec::new(), vec![Diagnostic::from_error(&file.relative_path, &e)], false)
                }
            }
        };

        let results: Vec<_> = if self.config.parallel {
            files.par_iter().map(process).collect()
        } else {
            files.iter().map(process).collect()
        };

        let mut report = RunReport::default();
        for (claims, diagnostics, scanned) in results {
            report.claims.extend(claims);
            report.diagnostics.extend(diagnostics);
            report.files_scanned += usize::from(scanned);
        }
        report.claims.sort_by(|a, b| claim_position(a).cmp(&claim_position(b)));
        if let Some(limit) = self.config.limit {
            report.claims.truncate(limit);
        }
        report
    }
}

fn claim_position(claim: &Claim) -> (&str, usize) {
    let offset = match &claim.source().locator {
        Some(Locator::Lines { byte_start, .. }) => *byte_start,
        _ => 0,
    };
    (claim.source().path.as_str(), offset)
}

impl Extractor for CodeExtractor {
    type Error = ExtractorError;

    fn artifact_type(&self) -> ArtifactType {
        ArtifactType::Code
    }

    /// Extract one file; the path is recorded as given
    fn extract(&self, path: &Path) -> Result<Vec<ExtractedClaim>, ExtractorError> {
        let display = path.to_string_lossy().replace('\\', "/");
        let language = Language::from_path(path)
            .ok_or_else(|| ExtractorError::Config(format!("unsupported source file: {}", display)))?;
        let file = SourceFile {
            path: path.to_path_buf(),
            relative_path: display,
            language,
            is_header: Language::is_header(path),
            size: 0,
        };
        Ok(self.extract_file(&file)?.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rejects_nul() {
        let err = decode_source("a.c", b"int\0x;", false).unwrap_err();
        assert!(matches!(err, ExtractorError::Decode { .. }));
    }

    #[test]
    fn test_decode_latin1_fallback() {
        let bytes = b"/* gr\xFC\xDFe */ int x;";
        assert!(decode_source("a.c", bytes, false).is_err());
        let text = decode_source("a.c", bytes, true).unwrap();
        assert!(text.contains("grüße"));
    }

    #[test]
    fn test_decode_strips_bom() {
        let text = decode_source("a.py", b"\xEF\xBB\xBFdef f():\n    pass\n", false).unwrap();
        assert!(text.starts_with("def"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExtractorConfig {
            max_file_bytes: 0,
            ..ExtractorConfig::default()
        };
        assert!(matches!(CodeExtractor::new(config), Err(ExtractorError::Config(_))));
    }
}
