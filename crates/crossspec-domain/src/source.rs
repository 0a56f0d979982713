//! Source descriptors: where a claim's text came from

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of artifact a claim was extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactType {
    /// Paged document
    Pdf,
    /// Spreadsheet workbook
    Xlsx,
    /// Slide deck
    Pptx,
    /// Mail message
    Eml,
    /// Source code
    Code,
}

impl ArtifactType {
    /// All artifact types, in declaration order
    pub const ALL: [ArtifactType; 5] = [
        ArtifactType::Pdf,
        ArtifactType::Xlsx,
        ArtifactType::Pptx,
        ArtifactType::Eml,
        ArtifactType::Code,
    ];

    /// Get the artifact type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactType::Pdf => "pdf",
            ArtifactType::Xlsx => "xlsx",
            ArtifactType::Pptx => "pptx",
            ArtifactType::Eml => "eml",
            ArtifactType::Code => "code",
        }
    }

    /// Parse an artifact type from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pdf" => Some(ArtifactType::Pdf),
            "xlsx" => Some(ArtifactType::Xlsx),
            "pptx" => Some(ArtifactType::Pptx),
            "eml" => Some(ArtifactType::Eml),
            "code" => Some(ArtifactType::Code),
            _ => None,
        }
    }

    /// Whether claims of this type describe specification prose
    pub fn is_document(&self) -> bool {
        !matches!(self, ArtifactType::Code)
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArtifactType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid artifact type: {}", s))
    }
}

/// Granularity of a scanned code unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Whole file
    File,
    /// Class, struct or union body
    Class,
    /// Function or method body
    Function,
}

impl UnitKind {
    /// Get the unit kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::File => "file",
            UnitKind::Class => "class",
            UnitKind::Function => "function",
        }
    }

    /// Parse a unit kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "file" => Some(UnitKind::File),
            "class" => Some(UnitKind::Class),
            "function" => Some(UnitKind::Function),
            _ => None,
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UnitKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid unit kind: {}", s))
    }
}

/// Type-specific position of a claim inside its artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Locator {
    /// 1-based page of a paged document
    Page {
        /// Page number
        page: u32,
    },
    /// 1-based slide of a deck
    Slide {
        /// Slide number
        slide: u32,
    },
    /// Row of a worksheet
    Row {
        /// Sheet name
        sheet: String,
        /// 1-based row number
        row: u32,
    },
    /// Message (or message part) of a mailbox export
    Message {
        /// 0-based message index
        index: u32,
    },
    /// Line span of a source file unit
    Lines {
        /// Scanned unit granularity
        unit: UnitKind,
        /// First line (1-based, inclusive)
        line_start: usize,
        /// Last line (1-based, inclusive)
        line_end: usize,
        /// Start byte offset (inclusive)
        byte_start: usize,
        /// End byte offset (exclusive)
        byte_end: usize,
    },
}

impl Locator {
    /// Identity-relevant part of the locator: a kind label and a start offset
    ///
    /// Code units contribute their unit kind and byte offset; document
    /// locators contribute their own kind and ordinal.
    pub fn identity(&self) -> (&str, u64) {
        match self {
            Locator::Page { page } => ("page", u64::from(*page)),
            Locator::Slide { slide } => ("slide", u64::from(*slide)),
            Locator::Row { row, .. } => ("row", u64::from(*row)),
            Locator::Message { index } => ("message", u64::from(*index)),
            Locator::Lines {
                unit, byte_start, ..
            } => (unit.as_str(), *byte_start as u64),
        }
    }
}

/// Structured description of a claim's origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Artifact type
    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,

    /// Artifact path (repository-relative where possible)
    pub path: String,

    /// Position inside the artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<Locator>,

    /// Document revision, when the artifact carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_rev: Option<String>,
}

impl SourceInfo {
    /// Create a source descriptor without a locator
    pub fn new(artifact_type: ArtifactType, path: impl Into<String>) -> Self {
        Self {
            artifact_type,
            path: path.into(),
            locator: None,
            doc_rev: None,
        }
    }

    /// Attach a locator
    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Attach a document revision
    pub fn with_doc_rev(mut self, doc_rev: impl Into<String>) -> Self {
        self.doc_rev = Some(doc_rev.into());
        self
    }

    /// Identity fields used by claim hashing: (unit kind, start offset)
    pub fn identity(&self) -> (&str, u64) {
        self.locator
            .as_ref()
            .map(Locator::identity)
            .unwrap_or(("document", 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_type_parse() {
        assert_eq!(ArtifactType::parse("PDF"), Some(ArtifactType::Pdf));
        assert_eq!(ArtifactType::parse("code"), Some(ArtifactType::Code));
        assert_eq!(ArtifactType::parse("docx"), None);
        assert!(ArtifactType::Pptx.is_document());
        assert!(!ArtifactType::Code.is_document());
    }

    #[test]
    fn test_locator_identity() {
        let lines = Locator::Lines {
            unit: UnitKind::Function,
            line_start: 3,
            line_end: 9,
            byte_start: 42,
            byte_end: 180,
        };
        assert_eq!(lines.identity(), ("function", 42));
        assert_eq!(Locator::Page { page: 7 }.identity(), ("page", 7));
    }

    #[test]
    fn test_source_serializes_type_field() {
        let source = SourceInfo::new(ArtifactType::Code, "src/brake.c")
            .with_locator(Locator::Slide { slide: 2 });
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["type"], "code");
        assert_eq!(json["locator"]["kind"], "slide");
        assert!(json.get("doc_rev").is_none());
    }
}
