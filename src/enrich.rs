use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::api::models::MatchItem;
use crate::headlines::Headline;
use crate::llm::{BookMatch, BookMatcher, MatchError};
use crate::preview::preview_image;

/// Decides what a matcher outcome means for the response.
///
/// A missing credential drops the headline; any other failure still shows
/// the fallback book so the reader gets something.
pub fn resolve_book(outcome: Result<BookMatch, MatchError>) -> Option<BookMatch> {
    match outcome {
        Ok(book) => Some(book),
        Err(MatchError::ConfigError(msg)) => {
            tracing::warn!(error = %msg, "dropping headline, book matcher not configured");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "book match failed, using fallback");
            Some(BookMatch::fallback())
        }
    }
}

/// Enriches up to `concurrency` headlines at a time, keeping input order.
///
/// Headlines whose match misses `deadline` or is dropped by [`resolve_book`]
/// are left out of the result.
pub async fn enrich_headlines(
    matcher: &BookMatcher,
    headlines: Vec<Headline>,
    concurrency: usize,
    deadline: Duration,
) -> Vec<MatchItem> {
    stream::iter(headlines)
        .map(|headline| async move {
            let outcome = tokio::time::timeout(deadline, matcher.match_book(&headline.text)).await;
            let book = match outcome.map(resolve_book) {
                Ok(Some(book)) => book,
                Ok(None) => return None,
                Err(_) => {
                    tracing::warn!(id = %headline.id, ?deadline, "book match timed out, dropping headline");
                    return None;
                }
            };

            Some(MatchItem {
                preview_image: preview_image(&headline.text).to_string(),
                headline: headline.text,
                username: headline.username,
                timestamp: headline.timestamp,
                likes: headline.likes,
                retweets: headline.retweets,
                book,
            })
        })
        .buffered(concurrency.max(1))
        .filter_map(|item| async move { item })
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn missing_credential_drops_headline() {
        let outcome = Err(MatchError::ConfigError("no key".to_string()));
        assert_eq!(resolve_book(outcome), None);
    }

    #[test]
    fn upstream_and_parse_failures_use_fallback() {
        let upstream = Err(MatchError::UpstreamError(StatusCode::BAD_GATEWAY));
        let parse = Err(MatchError::ParseError("not json".to_string()));
        assert_eq!(resolve_book(upstream), Some(BookMatch::fallback()));
        assert_eq!(resolve_book(parse), Some(BookMatch::fallback()));
    }

    #[test]
    fn successful_match_passes_through() {
        let book = BookMatch {
            title: "Solaris".to_string(),
            author: "Stanislaw Lem".to_string(),
            summary: "An ocean that thinks.".to_string(),
            quote: None,
            connection: "SF Trope: Alien Mind".to_string(),
        };
        assert_eq!(resolve_book(Ok(book.clone())), Some(book));
    }

    #[tokio::test]
    async fn unconfigured_matcher_drops_everything() {
        let matcher = BookMatcher::new(reqwest::Client::new(), "http://127.0.0.1:9", "test-model", None);
        let headlines = vec![Headline {
            id: "1".to_string(),
            text: "AI breakthrough".to_string(),
            username: "someone".to_string(),
            timestamp: None,
            likes: 0,
            retweets: 0,
        }];

        let items = enrich_headlines(&matcher, headlines, 4, Duration::from_secs(5)).await;
        assert!(items.is_empty());
    }
}
