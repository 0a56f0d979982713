//! Code claim builder: scanner units to extracted claims

use crate::config::ExtractorConfig;
use crate::discovery::SourceFile;
use crate::scanner::Unit;
use crossspec_domain::{
    ArtifactType, Authority, ExtractedClaim, Facets, Locator, SourceInfo, Status,
};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Byte offset to line number lookup, built once per file
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    /// Index the line starts of `text`
    pub fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self { starts }
    }

    /// 1-based line containing `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }

    /// 1-based inclusive line span of a byte range
    pub fn span(&self, range: &Range<usize>) -> (usize, usize) {
        let last = if range.end > range.start {
            range.end - 1
        } else {
            range.start
        };
        (self.line_of(range.start), self.line_of(last))
    }
}

/// Path keyword rule: any keyword among the path tokens adds `facet=value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetRule {
    /// Facet name
    pub facet: String,
    /// Tag added
    pub value: String,
    /// Case-insensitive path tokens that trigger the rule
    pub keywords: Vec<String>,
}

impl FacetRule {
    /// Create a `feature` rule
    pub fn feature(value: &str, keywords: &[&str]) -> Self {
        Self {
            facet: crossspec_domain::facets::FEATURE.to_string(),
            value: value.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Built-in vocabulary
    pub fn default_vocabulary() -> Vec<Self> {
        vec![
            Self::feature("brake", &["brake", "brakes", "braking", "abs"]),
            Self::feature("timing", &["timing", "timer", "timers", "sched", "scheduler"]),
            Self::feature("can", &["can", "comms", "bus"]),
            Self::feature("diag", &["diag", "diagnostic", "diagnostics", "dtc"]),
            Self::feature("nvm", &["nvm", "eeprom", "flash", "calibration"]),
            Self::feature("init", &["init", "startup", "boot"]),
        ]
    }

    /// Validate the rule
    pub fn validate(&self) -> Result<(), String> {
        if self.facet.trim().is_empty() || self.value.trim().is_empty() {
            return Err("vocabulary rules need a facet and a value".to_string());
        }
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(format!("vocabulary rule {}={} has no keywords", self.facet, self.value));
        }
        Ok(())
    }
}

/// Split a relative path into case-folded tokens (directories and file stem)
pub fn path_tokens(relative_path: &str) -> Vec<String> {
    let mut segments: Vec<&str> = relative_path.split(['/', '\\']).filter(|s| !s.is_empty()).collect();
    if let Some(file_name) = segments.pop() {
        let stem = file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem);
        segments.push(stem);
    }
    segments
        .iter()
        .flat_map(|segment| segment.split(['_', '-', '.', ' ']))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Infer facets from a path against a vocabulary
pub fn infer_facets(relative_path: &str, vocabulary: &[FacetRule]) -> Facets {
    let tokens = path_tokens(relative_path);
    let mut facets = Facets::new();
    for rule in vocabulary {
        let hit = rule
            .keywords
            .iter()
            .any(|keyword| tokens.iter().any(|token| token.eq_ignore_ascii_case(keyword.trim())));
        if hit {
            facets.insert(rule.facet.clone(), rule.value.clone());
        }
    }
    facets
}

/// Maps scanner units of one file to extracted claims
#[derive(Debug, Clone)]
pub struct CodeClaimBuilder {
    vocabulary: Vec<FacetRule>,
    authority: Authority,
    status: Status,
}

impl CodeClaimBuilder {
    /// Create a builder from the extractor configuration
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            vocabulary: config.vocabulary.clone(),
            authority: config.authority,
            status: config.status,
        }
    }

    /// Build one claim per unit
    pub fn build(
        &self,
        file: &SourceFile,
        text: &str,
        file_sha256: &str,
        units: &[Unit],
    ) -> Vec<ExtractedClaim> {
        let lines = LineIndex::new(text);
        let facets = infer_facets(&file.relative_path, &self.vocabulary);
        let method = format!("code_extract:{}", file.language.syntax().as_str());
        let file_name = file
            .relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&file.relative_path);

        units
            .iter()
            .filter_map(|unit| {
                let text_raw = text.get(unit.range.clone())?;
                let (line_start, line_end) = lines.span(&unit.range);
                let source = SourceInfo::new(ArtifactType::Code, file.relative_path.clone())
                    .with_locator(Locator::Lines {
                        unit: unit.kind,
                        line_start,
                        line_end,
                        byte_start: unit.range.start,
                        byte_end: unit.range.end,
                    });
                Some(
                    ExtractedClaim::new(text_raw, source, method.clone())
                        .with_authority(self.authority)
                        .with_status(self.status)
                        .with_facets(facets.clone())
                        .with_attribute("language", file.language.as_str())
                        .with_attribute("symbol", unit.symbol().unwrap_or(file_name))
                        .with_attribute("file_sha256", file_sha256),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::scanner::{scan_units, Granularity};
    use crossspec_domain::UnitKind;
    use std::path::PathBuf;

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("a\nbc\n\nd");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(1), 1);
        assert_eq!(index.line_of(2), 2);
        assert_eq!(index.line_of(5), 3);
        assert_eq!(index.line_of(6), 4);
        assert_eq!(index.span(&(2..5)), (2, 2));
        assert_eq!(index.span(&(0..7)), (1, 4));
    }

    #[test]
    fn test_path_tokens() {
        assert_eq!(
            path_tokens("src/Brake-Ctrl/abs_timing.c"),
            vec!["src", "brake", "ctrl", "abs", "timing"]
        );
    }

    #[test]
    fn test_infer_facets() {
        let vocabulary = FacetRule::default_vocabulary();
        let facets = infer_facets("src/brake/abs_timing.c", &vocabulary);
        assert!(facets.contains("feature", "brake"));
        assert!(facets.contains("feature", "timing"));
        assert!(!facets.contains("feature", "can"));
        assert!(infer_facets("src/util/strings.c", &vocabulary).is_empty());
        assert!(!infer_facets("src/embrace.c", &vocabulary).contains("feature", "brake"));
    }

    #[test]
    fn test_build_claims_with_locators() {
        let text = "int x;\n\nvoid brake_apply(int level)\n{\n    x = level;\n}\n";
        let file = SourceFile {
            path: PathBuf::from("/repo/src/brake/brake.c"),
            relative_path: "src/brake/brake.c".to_string(),
            language: Language::C,
            is_header: false,
            size: text.len() as u64,
        };
        let units = scan_units(text, Language::C, Granularity::Function, false).units;
        let builder = CodeClaimBuilder::new(&ExtractorConfig::default());
        let claims = builder.build(&file, text, "abc123", &units);

        assert_eq!(claims.len(), 1);
        let claim = &claims[0];
        assert!(claim.text_raw.starts_with("void brake_apply"));
        assert_eq!(claim.method, "code_extract:c_like");
        assert_eq!(claim.authority, Some(Authority::Informative));
        assert_eq!(claim.attributes.get("symbol").map(String::as_str), Some("brake_apply"));
        assert_eq!(claim.attributes.get("language").map(String::as_str), Some("c"));
        assert!(claim.facets.contains("feature", "brake"));
        match &claim.source.locator {
            Some(Locator::Lines {
                unit,
                line_start,
                line_end,
                ..
            }) => {
                assert_eq!(*unit, UnitKind::Function);
                assert_eq!((*line_start, *line_end), (3, 6));
            }
            other => panic!("unexpected locator: {:?}", other),
        }
    }
}
