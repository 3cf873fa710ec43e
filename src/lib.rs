pub mod api;
pub mod cache;
pub mod config;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod headlines;
pub mod llm;
pub mod preview;

use std::sync::Arc;
use reqwest::ClientBuilder;

use cache::ResponseCache;
use config::Config;
use error::Result;
use headlines::HeadlineClient;
use llm::BookMatcher;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub headlines: Arc<HeadlineClient>,
    pub matcher: Arc<BookMatcher>,
    pub cache: Arc<ResponseCache>,
}

impl AppState {
    /// Builds the upstream clients and an empty cache. Created once at startup.
    pub fn new(config: Config) -> Result<Self> {
        // One pooled client shared by both upstreams
        let client = ClientBuilder::new()
            .timeout(config.http_timeout)
            .connect_timeout(std::time::Duration::from_secs(5))
            .pool_max_idle_per_host(10)
            .build()?;

        let headlines = HeadlineClient::new(
            client.clone(),
            config.search_api_url.clone(),
            config.search_api_token.clone(),
        );
        let matcher = BookMatcher::new(
            client,
            config.completion_api_url.clone(),
            config.completion_model.clone(),
            config.completion_api_key.clone(),
        );

        Ok(AppState {
            headlines: Arc::new(headlines),
            matcher: Arc::new(matcher),
            cache: Arc::new(ResponseCache::new(config.cache_ttl)),
            config: Arc::new(config),
        })
    }
}
