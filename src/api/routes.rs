use axum::{
    routing::{any, get},
    Router,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use chrono::Utc;

use crate::error::{AppError, Result};
use crate::api::models::{AggregateResponse, DiagnosticResponse, EnvironmentReport};
use crate::enrich::enrich_headlines;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/fetch-news", any(fetch_news_handler))
        .route("/api/test", get(diagnostic_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("GET, POST, OPTIONS"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static("Content-Type"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("s-maxage=300, stale-while-revalidate"),
                )),
        )
        .with_state(app_state)
}

async fn fetch_news_handler(State(state): State<AppState>, method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let start_time = std::time::Instant::now();
    let result = process_fetch_request(&state).await;
    tracing::info!(elapsed = ?start_time.elapsed(), ok = result.is_ok(), "fetch-news processed");

    match result {
        Ok(response_data) => (StatusCode::OK, Json(response_data)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn process_fetch_request(state: &AppState) -> Result<AggregateResponse> {
    if let Some(cached) = state.cache.get().await {
        tracing::info!("returning cached data");
        return Ok(cached);
    }

    // Only one refresh runs at a time; waiters pick up its result below.
    let epoch = state.cache.refresh_epoch();
    let refresh = state.cache.lock_refresh().await;
    if let Some(cached) = state.cache.get().await {
        tracing::info!("returning data refreshed by a concurrent request");
        return Ok(cached);
    }
    if let Some(err) = refresh.failed_since(epoch) {
        tracing::info!("concurrent refresh failed, sharing its error");
        return Err(err);
    }

    tracing::info!("cache miss, fetching fresh data");
    let result = refresh_response(state).await;
    refresh.finish(&result);
    result
}

async fn refresh_response(state: &AppState) -> Result<AggregateResponse> {
    let headlines = state.headlines.fetch_headlines().await?;
    if headlines.is_empty() {
        return Err(AppError::NoSuitableHeadlinesError);
    }
    tracing::info!(count = headlines.len(), "found sci-fi-like headlines");

    let matches = enrich_headlines(
        &state.matcher,
        headlines,
        state.config.match_concurrency,
        state.config.match_timeout,
    )
    .await;

    if matches.is_empty() {
        return Err(AppError::NoValidMatchesError);
    }

    let response = AggregateResponse::new(matches);
    state.cache.store(response.clone()).await;

    tracing::info!(count = response.count, "returning fresh matches");
    Ok(response)
}

async fn diagnostic_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> impl IntoResponse {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    Json(DiagnosticResponse {
        message: "API is working!",
        timestamp: Utc::now(),
        environment: EnvironmentReport::new(
            state.config.search_api_token.as_deref(),
            state.config.completion_api_key.as_deref(),
        ),
        headers,
        method: method.to_string(),
    })
}
