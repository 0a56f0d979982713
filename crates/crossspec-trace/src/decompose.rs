//! Requirement decomposer
//!
//! Splits free-text requirements into fragments on sentence boundaries and
//! on connective words, then guesses facets per fragment from a keyword
//! table. A keyword also matches a number glued to it, so `100ms` counts
//! as `ms`.

use crate::config::{DecomposerConfig, KeywordRule};
use crate::error::TraceError;
use crossspec_domain::Facets;
use crossspec_store::tokenize;
use regex::Regex;
use serde::{Deserialize, Serialize};

const SENTENCE_BOUNDARY: &str = r"[.!?](?:\s|$)|[;\r\n]";

/// One requirement fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Position in the requirement, from 0
    pub index: usize,
    /// Trimmed fragment text
    pub text: String,
    /// Facets guessed from the keyword table
    pub facets: Facets,
}

/// Splits requirements into fragments
#[derive(Debug, Clone)]
pub struct Decomposer {
    sentences: Regex,
    connectives: Option<Regex>,
    keywords: Vec<KeywordRule>,
}

impl Decomposer {
    /// Compile the decomposer tables
    pub fn new(config: DecomposerConfig) -> Result<Self, TraceError> {
        config.validate().map_err(TraceError::Config)?;
        let sentences = Regex::new(SENTENCE_BOUNDARY)
            .map_err(|e| TraceError::Config(e.to_string()))?;
        let connectives = if config.connectives.is_empty() {
            None
        } else {
            let words: Vec<String> = config
                .connectives
                .iter()
                .map(|w| regex::escape(w.trim()))
                .collect();
            let pattern = format!(r"(?i)\b(?:{})\b", words.join("|"));
            Some(Regex::new(&pattern).map_err(|e| TraceError::Config(e.to_string()))?)
        };
        Ok(Self {
            sentences,
            connectives,
            keywords: config.keywords,
        })
    }

    /// Ordered non-empty fragments of `text`
    pub fn decompose(&self, text: &str) -> Vec<Fragment> {
        let mut pieces: Vec<&str> = Vec::new();
        for sentence in self.sentences.split(text) {
            match &self.connectives {
                Some(connectives) => pieces.extend(connectives.split(sentence)),
                None => pieces.push(sentence),
            }
        }

        pieces
            .into_iter()
            .map(|piece| piece.trim().trim_matches(|c: char| c == ',' || c == ':'))
            .map(str::trim)
            .filter(|piece| piece.chars().any(char::is_alphanumeric))
            .enumerate()
            .map(|(index, piece)| Fragment {
                index,
                text: piece.to_string(),
                facets: self.guess_facets(piece),
            })
            .collect()
    }

    /// Facets triggered by the words of `text`
    pub fn guess_facets(&self, text: &str) -> Facets {
        let tokens = tokenize(text);
        let mut facets = Facets::new();
        for rule in &self.keywords {
            if rule
                .keywords
                .iter()
                .any(|keyword| tokens.iter().any(|token| keyword_matches(token, keyword)))
            {
                facets.insert(rule.facet.clone(), rule.value.clone());
            }
        }
        facets
    }
}

/// Exact word, or digits followed by the keyword (`100ms`)
fn keyword_matches(token: &str, keyword: &str) -> bool {
    let keyword = keyword.trim().to_ascii_lowercase();
    if keyword.is_empty() {
        return false;
    }
    if token == keyword {
        return true;
    }
    match token.strip_suffix(keyword.as_str()) {
        Some(number) => !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
