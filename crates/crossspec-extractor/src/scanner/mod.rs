//! Heuristic unit scanner
//!
//! Partitions source text into [`Unit`]s without building a parse tree.
//! Both sub-scanners consume the token stream of [`crate::lexer::Cursor`],
//! so delimiters inside comments and literals are never counted.
//!
//! Units form a forest: siblings never overlap and children nest inside
//! their parent. The file itself is the implicit root (`parent = None`).

mod c_like;
mod dynamic;

use crate::language::{Language, Syntax};
use crossspec_domain::UnitKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Which units become claims
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Callables whose parent is the file or a class
    #[default]
    Function,
    /// Outermost classes, methods included
    Class,
    /// One unit per file
    File,
}

impl Granularity {
    /// Get the granularity name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Function => "function",
            Granularity::Class => "class",
            Granularity::File => "file",
        }
    }

    /// Parse a granularity name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "function" => Some(Granularity::Function),
            "class" => Some(Granularity::Class),
            "file" => Some(Granularity::File),
            _ => None,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid unit granularity: {}", s))
    }
}

/// A scanner-discovered contiguous code region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Unit kind
    pub kind: UnitKind,
    /// Declared name, when one was found
    pub name: Option<String>,
    /// Name qualified by enclosing classes and namespaces
    pub qualified_name: Option<String>,
    /// Byte range `[start, end)`
    pub range: Range<usize>,
    /// Number of enclosing units
    pub depth: usize,
    /// Index of the enclosing unit in the scan output
    pub parent: Option<usize>,
    /// Source language
    pub language: Language,
}

impl Unit {
    /// Whole-file unit
    pub fn file(len: usize, language: Language) -> Self {
        Self {
            kind: UnitKind::File,
            name: None,
            qualified_name: None,
            range: 0..len,
            depth: 0,
            parent: None,
            language,
        }
    }

    /// Symbol recorded in provenance
    pub fn symbol(&self) -> Option<&str> {
        self.qualified_name.as_deref().or(self.name.as_deref())
    }
}

/// A unit still open at end of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialUnit {
    /// Name of the unclosed unit
    pub name: Option<String>,
    /// Start offset of the unclosed unit
    pub start: usize,
}

/// Result of scanning one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    /// Every unit found, ordered by start offset
    pub units: Vec<Unit>,
    /// Units closed at end of input instead of at their delimiter
    pub partial: Vec<PartialUnit>,
}

/// Scan `text` and return the full unit forest
pub fn scan(text: &str, language: Language) -> ScanOutput {
    match language.syntax() {
        Syntax::CLike => c_like::scan(text, language),
        Syntax::Dynamic => dynamic::scan(text, language),
    }
}

/// Scan `text` and keep the units selected by `granularity`
///
/// `file` bypasses the state machine. C-like headers that contain no
/// function fall back to a single file unit.
pub fn scan_units(
    text: &str,
    language: Language,
    granularity: Granularity,
    is_header: bool,
) -> ScanOutput {
    if text.trim().is_empty() {
        return ScanOutput::default();
    }
    if granularity == Granularity::File {
        return ScanOutput {
            units: vec![Unit::file(text.len(), language)],
            partial: Vec::new(),
        };
    }

    let output = scan(text, language);
    let selected = select(&output.units, granularity);
    if selected.is_empty()
        && granularity == Granularity::Function
        && is_header
        && language.syntax() == Syntax::CLike
    {
        return ScanOutput {
            units: vec![Unit::file(text.len(), language)],
            partial: output.partial,
        };
    }
    ScanOutput {
        units: selected,
        partial: output.partial,
    }
}

fn select(units: &[Unit], granularity: Granularity) -> Vec<Unit> {
    let parent_kind = |unit: &Unit| unit.parent.and_then(|idx| units.get(idx)).map(|p| p.kind);
    units
        .iter()
        .filter(|unit| match granularity {
            Granularity::Function => {
                unit.kind == UnitKind::Function
                    && matches!(parent_kind(unit), None | Some(UnitKind::Class))
            }
            Granularity::Class => unit.kind == UnitKind::Class && unit.parent.is_none(),
            Granularity::File => false,
        })
        .cloned()
        .collect()
}

/// Extend `offset` back to the start of its line when only whitespace precedes it
pub(crate) fn line_start_if_blank_prefix(text: &str, offset: usize) -> usize {
    let bytes = text.as_bytes();
    let mut idx = offset;
    while idx > 0 {
        match bytes[idx - 1] {
            b' ' | b'\t' => idx -= 1,
            b'\n' => return idx,
            _ => return offset,
        }
    }
    0
}
