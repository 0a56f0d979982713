//! Provenance tracking for extracted claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How, when and by which tool a claim was extracted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Extraction method identifier (e.g., "code_extract:c_like", "pdf:text_layer")
    pub method: String,

    /// Version of the tool that performed the extraction
    pub tool_version: String,

    /// When the extraction happened
    pub extracted_at: DateTime<Utc>,

    /// Method-specific details (language, symbol, file digest, sender, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Provenance {
    /// Create a new provenance entry
    pub fn new(method: String, tool_version: String, extracted_at: DateTime<Utc>) -> Self {
        Self {
            method,
            tool_version,
            extracted_at,
            attributes: BTreeMap::new(),
        }
    }

    /// Attach method-specific attributes
    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Look up an attribute
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}
