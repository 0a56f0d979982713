//! Matcher and decomposer configuration

use crossspec_domain::facets::FEATURE;
use serde::{Deserialize, Serialize};

/// Scoring weights and thresholds for the matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Weight of each shared facet tag
    pub facet_weight: f64,

    /// Weight of the shared fraction of query tokens
    pub token_weight: f64,

    /// Best score at or above which coverage is `full`
    pub threshold: f64,

    /// Matches kept per query
    pub top_n: usize,

    /// Query words ignored by token scoring
    pub stop_words: Vec<String>,
}

const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "not", "no", "of", "to", "in", "on", "at", "by", "for",
    "from", "with", "within", "into", "as", "is", "are", "be", "been", "was", "were", "shall",
    "should", "must", "will", "may", "then", "when", "if", "it", "its", "this", "that", "these",
    "those", "each", "all", "any",
];

impl Default for MatcherConfig {
    /// Facet agreement plus half of the query vocabulary reaches `full`
    fn default() -> Self {
        Self {
            facet_weight: 1.0,
            token_weight: 0.5,
            threshold: 1.25,
            top_n: 10,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl MatcherConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.token_weight > 0.0) {
            return Err("token_weight must be greater than 0".to_string());
        }
        if !(self.facet_weight > self.token_weight) {
            return Err(format!(
                "facet_weight ({}) must be greater than token_weight ({})",
                self.facet_weight, self.token_weight
            ));
        }
        if !(self.threshold > 0.0) || !self.threshold.is_finite() {
            return Err("threshold must be a positive number".to_string());
        }
        if self.top_n == 0 {
            return Err("top_n must be greater than 0".to_string());
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

/// Requirement keyword rule: any keyword among the fragment tokens adds `facet=value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    /// Facet name
    pub facet: String,
    /// Tag guessed
    pub value: String,
    /// Case-insensitive trigger words
    pub keywords: Vec<String>,
}

impl KeywordRule {
    fn feature(value: &str, keywords: &[&str]) -> Self {
        Self {
            facet: FEATURE.to_string(),
            value: value.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Tables used to split requirements and guess their facets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecomposerConfig {
    /// Whole words that split a sentence into fragments
    pub connectives: Vec<String>,

    /// Keyword to facet table
    pub keywords: Vec<KeywordRule>,
}

impl Default for DecomposerConfig {
    fn default() -> Self {
        Self {
            connectives: ["and", "within", "shall", "then"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            keywords: vec![
                KeywordRule::feature("brake", &["brake", "brakes", "braking"]),
                KeywordRule::feature(
                    "timing",
                    &["timing", "ms", "latency", "timeout", "deadline"],
                ),
                KeywordRule::feature("diag", &["diag", "diagnostic", "diagnostics"]),
                // bare "can" is not a keyword
                KeywordRule::feature("can", &["comms"]),
                KeywordRule::feature("nvm", &["nvm", "eeprom", "calibration"]),
                KeywordRule::feature("init", &["init", "initialize", "startup"]),
            ],
        }
    }
}

impl DecomposerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.connectives.iter().any(|w| w.trim().is_empty()) {
            return Err("connectives must not contain blank words".to_string());
        }
        for rule in &self.keywords {
            if rule.facet.trim().is_empty() || rule.value.trim().is_empty() {
                return Err("keyword rules need a facet and a value".to_string());
            }
            if rule.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(format!("keyword rule {}={} has no keywords", rule.facet, rule.value));
            }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_are_valid() {
        assert!(MatcherConfig::default().validate().is_ok());
        assert!(DecomposerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_facet_weight_must_dominate() {
        let config = MatcherConfig {
            facet_weight: 0.5,
            token_weight: 0.5,
            ..MatcherConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MatcherConfig {
            token_weight: 0.0,
            ..MatcherConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_threshold_must_be_positive() {
        let config = MatcherConfig {
            threshold: 0.0,
            ..MatcherConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = MatcherConfig::from_toml("threshold = 2.0\ntop_n = 3\n").unwrap();
        assert_eq!(config.threshold, 2.0);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.facet_weight, 1.0);
        assert!(config.stop_words.contains(&"the".to_string()));
    }

    #[test]
    fn test_decomposer_toml_round_trip() {
        let config = DecomposerConfig::default();
        let parsed = DecomposerConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_blank_connective_rejected() {
        let config = DecomposerConfig {
            connectives: vec![" ".to_string()],
            ..DecomposerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
