//! Source languages and their lexical families

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Lexical family a language is scanned with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
    /// Brace-delimited blocks, `//` and `/* */` comments, preprocessor lines
    CLike,
    /// Indentation-delimited blocks, `#` comments, triple-quoted strings
    Dynamic,
}

impl Syntax {
    /// Method suffix recorded in provenance (`code_extract:<suffix>`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Syntax::CLike => "c_like",
            Syntax::Dynamic => "dynamic",
        }
    }
}

/// A source language the scanner understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C
    C,
    /// C++
    Cpp,
    /// Python
    Python,
}

impl Language {
    /// Detect the language from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "c" | "h" => Some(Language::C),
            "cc" | "cpp" | "cxx" | "hpp" | "hh" | "hxx" => Some(Language::Cpp),
            "py" | "pyi" => Some(Language::Python),
            _ => None,
        }
    }

    /// Whether the path names a header file
    pub fn is_header(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "h" | "hpp" | "hh" | "hxx"))
            .unwrap_or(false)
    }

    /// Lexical family
    pub fn syntax(&self) -> Syntax {
        match self {
            Language::C | Language::Cpp => Syntax::CLike,
            Language::Python => Syntax::Dynamic,
        }
    }

    /// Get the language name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Python => "python",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which languages a run extracts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageFilter {
    /// Every supported language
    #[default]
    All,
    /// C only
    C,
    /// C++ only
    Cpp,
    /// Python only
    Python,
}

impl LanguageFilter {
    /// Whether the filter admits a language
    pub fn admits(&self, language: Language) -> bool {
        match self {
            LanguageFilter::All => true,
            LanguageFilter::C => language == Language::C,
            LanguageFilter::Cpp => language == Language::Cpp,
            LanguageFilter::Python => language == Language::Python,
        }
    }

    /// Default include globs for the filter
    pub fn default_includes(&self) -> Vec<String> {
        let c = ["**/*.c", "**/*.h"];
        let cpp = ["**/*.cc", "**/*.cpp", "**/*.cxx", "**/*.hpp", "**/*.hh", "**/*.hxx"];
        let python = ["**/*.py"];
        let globs: Vec<&str> = match self {
            LanguageFilter::All => c.iter().chain(&cpp).chain(&python).copied().collect(),
            LanguageFilter::C => c.to_vec(),
            LanguageFilter::Cpp => cpp.to_vec(),
            LanguageFilter::Python => python.to_vec(),
        };
        globs.into_iter().map(String::from).collect()
    }

    /// Parse a filter name (internal use)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(LanguageFilter::All),
            "c" => Some(LanguageFilter::C),
            "cpp" | "c++" => Some(LanguageFilter::Cpp),
            "python" | "py" => Some(LanguageFilter::Python),
            _ => None,
        }
    }
}

impl std::str::FromStr for LanguageFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unsupported language filter: {}", s))
    }
}
