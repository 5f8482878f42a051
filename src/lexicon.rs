// Related words for the background word cloud (Wordnik `relatedWords`).

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const WORDNIK_API_BASE: &str = "https://api.wordnik.com/v4/word.json/";
pub const DEFAULT_SEED_WORD: &str = "star";

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read related words: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected related words response: {0}")]
    Format(#[from] serde_json::Error),
    #[error("related words request failed: {0}")]
    Request(String),
    #[error("api key is empty")]
    MissingApiKey,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelationshipGroup {
    relationship_type: Option<String>,
    #[serde(default)]
    words: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedWordsResponse {
    Groups(Vec<RelationshipGroup>),
    Words(Vec<String>),
}

/// Words of the first relationship group, or a bare array of strings.
pub fn parse_related_words(json: &str) -> Result<Vec<String>, LexiconError> {
    let response: RelatedWordsResponse = serde_json::from_str(json)?;
    let words = match response {
        RelatedWordsResponse::Groups(groups) => groups
            .into_iter()
            .next()
            .map(|group| {
                log::debug!(
                    "using {} related words of type {:?}",
                    group.words.len(),
                    group.relationship_type.as_deref().unwrap_or("unknown")
                );
                group.words
            })
            .unwrap_or_default(),
        RelatedWordsResponse::Words(words) => words,
    };
    Ok(words
        .into_iter()
        .map(|word| word.trim().to_string())
        .filter(|word| !word.is_empty())
        .collect())
}

pub fn load_related_words(path: &Path) -> Result<Vec<String>, LexiconError> {
    let json = std::fs::read_to_string(path)?;
    parse_related_words(&json)
}

#[derive(Debug, Clone)]
pub struct WordnikRequest {
    pub seed_word: String,
    pub api_key: String,
    pub limit_per_relationship: usize,
}

impl WordnikRequest {
    pub fn new(seed_word: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            seed_word: seed_word.into(),
            api_key: api_key.into(),
            limit_per_relationship: 100,
        }
    }

    /// Reads the api key from a file containing only the key.
    pub fn from_key_file(seed_word: impl Into<String>, path: &Path) -> Result<Self, LexiconError> {
        let key = std::fs::read_to_string(path)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(LexiconError::MissingApiKey);
        }
        Ok(Self::new(seed_word, key))
    }

    pub fn url(&self) -> String {
        format!(
            "{WORDNIK_API_BASE}{}/relatedWords?useCanonical=false&limitPerRelationshipType={}&api_key={}",
            self.seed_word, self.limit_per_relationship, self.api_key
        )
    }
}

#[cfg(feature = "fetch")]
pub fn fetch_related_words(request: &WordnikRequest) -> Result<Vec<String>, LexiconError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("starword/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(15))
        .build()
        .map_err(|e| LexiconError::Request(format!("client error: {e}")))?;

    log::debug!("fetching related words for {:?}", request.seed_word);
    let response = client
        .get(request.url())
        .header("Accept", "application/json")
        .send()
        .map_err(|e| LexiconError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LexiconError::Request(format!("HTTP {status}")));
    }
    let body = response
        .text()
        .map_err(|e| LexiconError::Request(format!("failed to read body: {e}")))?;
    parse_related_words(&body)
}
