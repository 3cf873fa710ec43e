use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::llm::BookMatch;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchItem {
    pub headline: String,
    pub username: String,
    pub timestamp: Option<String>,
    pub likes: u64,
    pub retweets: u64,
    pub preview_image: String,
    pub book: BookMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResponse {
    pub matches: Vec<MatchItem>,
    pub generated_at: DateTime<Utc>,
    pub count: usize,
}

impl AggregateResponse {
    pub fn new(matches: Vec<MatchItem>) -> Self {
        Self {
            count: matches.len(),
            matches,
            generated_at: Utc::now(),
        }
    }
}

#[derive(Serialize)]
pub struct DiagnosticResponse {
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
    pub environment: EnvironmentReport,
    pub headers: BTreeMap<String, String>,
    pub method: String,
}

#[derive(Serialize)]
pub struct EnvironmentReport {
    pub has_search_token: bool,
    pub has_completion_key: bool,
    pub token_lengths: TokenLengths,
}

#[derive(Serialize)]
pub struct TokenLengths {
    pub search: usize,
    pub completion: usize,
}

impl EnvironmentReport {
    pub fn new(search_token: Option<&str>, completion_key: Option<&str>) -> Self {
        Self {
            has_search_token: search_token.is_some(),
            has_completion_key: completion_key.is_some(),
            token_lengths: TokenLengths {
                search: search_token.map_or(0, str::len),
                completion: completion_key.map_or(0, str::len),
            },
        }
    }
}
