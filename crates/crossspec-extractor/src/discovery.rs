//! Source file discovery
//!
//! Walks the repository root, applies include and exclude globs to
//! root-relative `/`-separated paths, and checks file sizes from metadata
//! before anything is read.

use crate::config::ExtractorConfig;
use crate::error::{Diagnostic, DiagnosticKind, ExtractorError};
use crate::language::{Language, LanguageFilter};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directories never worth scanning
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/.git/**",
    "**/.hg/**",
    "**/.svn/**",
    "**/.venv/**",
    "**/venv/**",
    "**/__pycache__/**",
    "**/build/**",
    "**/dist/**",
    "**/target/**",
    "**/node_modules/**",
    "**/.mypy_cache/**",
    "**/.pytest_cache/**",
    "**/.ruff_cache/**",
    "**/.tox/**",
    "**/outputs/**",
];

/// A file selected for scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Filesystem path
    pub path: PathBuf,
    /// Root-relative path with `/` separators
    pub relative_path: String,
    /// Detected language
    pub language: Language,
    /// Header file (`.h`, `.hpp`, ...)
    pub is_header: bool,
    /// Size from metadata
    pub size: u64,
}

/// Counts reported by discovery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySummary {
    /// Files matching an include glob
    pub matched: usize,
    /// Matched files dropped by an exclude glob
    pub excluded: usize,
    /// Matched files over the size cap
    pub too_large: usize,
    /// Files selected for scanning
    pub selected: usize,
}

/// Discovery result
#[derive(Debug, Clone, Default)]
pub struct Discovered {
    /// Selected files, sorted by relative path
    pub files: Vec<SourceFile>,
    /// Counts
    pub summary: DiscoverySummary,
    /// Walk errors and oversized files
    pub diagnostics: Vec<Diagnostic>,
}

/// Compiled discovery rules for one repository root
#[derive(Debug, Clone)]
pub struct Discovery {
    root: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
    language: LanguageFilter,
    max_file_bytes: u64,
    skip: Vec<PathBuf>,
}

fn build_set(patterns: &[String]) -> Result<GlobSet, ExtractorError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.trim_start_matches("./");
        builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
    }
    Ok(builder.build()?)
}

impl Discovery {
    /// Compile the rules of `config` for `root`
    pub fn new(root: impl Into<PathBuf>, config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        let mut excludes = config.exclude.clone();
        if config.default_excludes {
            excludes.extend(DEFAULT_EXCLUDES.iter().map(|s| s.to_string()));
        }
        Ok(Self {
            root: root.into(),
            include: build_set(&config.effective_includes())?,
            exclude: build_set(&excludes)?,
            language: config.language,
            max_file_bytes: config.max_file_bytes,
            skip: Vec::new(),
        })
    }

    /// Never select `path` (e.g. the run's own output file)
    pub fn skip_path(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.skip
            .push(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()));
        self
    }

    /// Root-relative, `/`-separated form of a path under the root
    pub fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }

    /// Walk the root and select files
    pub fn discover(&self) -> Discovered {
        let mut discovered = Discovered::default();

        for entry in WalkDir::new(&self.root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| self.root.display().to_string());
                    warn!("Skipping unreadable path {}: {}", path, e);
                    discovered
                        .diagnostics
                        .push(Diagnostic::new(path, DiagnosticKind::Io, e.to_string()));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(relative_path) = self.relative(path) else {
                continue;
            };
            if !self.include.is_match(&relative_path) {
                continue;
            }
            if self.is_skipped(path) {
                debug!("Skipping output file {}", relative_path);
                continue;
            }
            discovered.summary.matched += 1;

            if self.exclude.is_match(&relative_path) {
                discovered.summary.excluded += 1;
                continue;
            }
            let Some(language) = Language::from_path(path) else {
                continue;
            };
            if !self.language.admits(language) {
                continue;
            }
            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    discovered.diagnostics.push(Diagnostic::new(
                        relative_path,
                        DiagnosticKind::Io,
                        e.to_string(),
                    ));
                    continue;
                }
            };
            if size > self.max_file_bytes {
                discovered.summary.too_large += 1;
                let error = ExtractorError::SizeLimitExceeded {
                    path: relative_path.clone(),
                    size,
                    max: self.max_file_bytes,
                };
                warn!("{}", error);
                discovered
                    .diagnostics
                    .push(Diagnostic::from_error(relative_path, &error));
                continue;
            }

            discovered.files.push(SourceFile {
                path: path.to_path_buf(),
                is_header: Language::is_header(path),
                relative_path,
                language,
                size,
            });
        }

        discovered.files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        discovered.summary.selected = discovered.files.len();
        debug!(
            "Discovery: {} matched, {} excluded, {} too large, {} selected",
            discovered.summary.matched,
            discovered.summary.excluded,
            discovered.summary.too_large,
            discovered.summary.selected
        );
        discovered
    }

    fn is_skipped(&self, path: &Path) -> bool {
        if self.skip.is_empty() {
            return false;
        }
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.skip.iter().any(|skip| *skip == canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/brake/brake.c", "void brake_apply(void) {}\n");
        write(dir.path(), "src/brake/brake.h", "void brake_apply(void);\n");
        write(dir.path(), "tools/nvm_codec.py", "def encode():\n    pass\n");
        write(dir.path(), "build/gen.c", "int gen(void) { return 0; }\n");
        write(dir.path(), "README.md", "# readme\n");
        dir
    }

    #[test]
    fn test_discover_applies_default_excludes() {
        let dir = repo();
        let discovery = Discovery::new(dir.path(), &ExtractorConfig::default()).unwrap();
        let found = discovery.discover();

        let paths: Vec<_> = found.files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["src/brake/brake.c", "src/brake/brake.h", "tools/nvm_codec.py"]);
        assert_eq!(found.summary.matched, 4);
        assert_eq!(found.summary.excluded, 1);
        assert!(found.files[1].is_header);
    }

    #[test]
    fn test_language_filter_and_size_cap() {
        let dir = repo();
        write(dir.path(), "src/big.c", &"x".repeat(64));
        let config = ExtractorConfig {
            language: LanguageFilter::C,
            max_file_bytes: 40,
            ..ExtractorConfig::default()
        };
        let found = Discovery::new(dir.path(), &config).unwrap().discover();

        let paths: Vec<_> = found.files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["src/brake/brake.c", "src/brake/brake.h"]);
        assert_eq!(found.summary.too_large, 1);
        assert_eq!(found.diagnostics.len(), 1);
        assert_eq!(found.diagnostics[0].kind, DiagnosticKind::SizeLimitExceeded);
    }

    #[test]
    fn test_custom_globs_and_skip_path() {
        let dir = repo();
        let config = ExtractorConfig {
            include: vec!["src/**/*.c".to_string(), "tools/*.py".to_string()],
            exclude: vec!["tools/**".to_string()],
            ..ExtractorConfig::default()
        };
        let found = Discovery::new(dir.path(), &config)
            .unwrap()
            .skip_path(dir.path().join("src/brake/brake.c"))
            .discover();
        assert!(found.files.is_empty());
        assert_eq!(found.summary.matched, 1);
        assert_eq!(found.summary.excluded, 1);
    }
}
