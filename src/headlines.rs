use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::filter::sounds_like_sf;

pub const SEARCH_QUERY: &str = r#"AGI OR "artificial intelligence" OR singularity OR superintelligence OR "AI breakthrough" OR "quantum computer" OR "brain interface" -is:retweet -is:reply lang:en"#;
pub const MAX_RESULTS: &str = "10";
pub const MAX_HEADLINES: usize = 8;

static SHORT_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https://t\.co/\w+").expect("short link pattern is valid")
});

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<RawPost>,
    #[serde(default)]
    includes: Includes,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
    username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPost {
    pub id: String,
    pub text: String,
    pub author_id: Option<String>,
    /// Passed through as sent; the API's own format is not re-parsed.
    pub created_at: Option<String>,
    #[serde(default)]
    pub public_metrics: Option<PublicMetrics>,
}

// Counts may be missing or null per post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub retweet_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub id: String,
    pub text: String,
    pub username: String,
    pub timestamp: Option<String>,
    pub likes: u64,
    pub retweets: u64,
}

pub struct HeadlineClient {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HeadlineClient {
    pub fn new(client: Client, url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            token,
        }
    }

    /// Runs the search and returns at most [`MAX_HEADLINES`] SF-sounding headlines.
    ///
    /// An empty vec means posts came back but none passed the filter; the
    /// caller decides how to surface that.
    pub async fn fetch_headlines(&self) -> Result<Vec<Headline>> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| AppError::ConfigError("search API token not configured".to_string()))?;

        let response = self
            .client
            .get(&self.url)
            .bearer_auth(token)
            .query(&[
                ("query", SEARCH_QUERY),
                ("max_results", MAX_RESULTS),
                ("tweet.fields", "created_at,public_metrics,author_id"),
                ("expansions", "author_id"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::FetchError(format!("Invalid search response: {}", e)))?;

        if search.data.is_empty() {
            return Err(AppError::NoResultsError);
        }

        let fetched = search.data.len();
        let headlines = select_headlines(search.data, &search.includes.users);
        tracing::info!(fetched, retained = headlines.len(), "filtered search results");

        Ok(headlines)
    }
}

fn select_headlines(posts: Vec<RawPost>, users: &[User]) -> Vec<Headline> {
    posts
        .into_iter()
        .map(|post| to_headline(post, users))
        .filter(|headline| sounds_like_sf(&headline.text))
        .take(MAX_HEADLINES)
        .collect()
}

fn to_headline(post: RawPost, users: &[User]) -> Headline {
    let username = post
        .author_id
        .as_deref()
        .and_then(|author_id| users.iter().find(|u| u.id == author_id))
        .map_or_else(|| "unknown".to_string(), |u| u.username.clone());

    let metrics = post.public_metrics.unwrap_or_default();

    Headline {
        text: strip_short_links(&post.text),
        id: post.id,
        username,
        timestamp: post.created_at,
        likes: metrics.like_count.unwrap_or(0),
        retweets: metrics.retweet_count.unwrap_or(0),
    }
}

pub fn strip_short_links(text: &str) -> String {
    SHORT_LINK.replace_all(text, "").trim().to_string()
}
