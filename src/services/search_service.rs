use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SearchSettings};

const SEARCH_DEPTH: &str = "advanced";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Any failure of the outbound search call. All variants mean the sources are unavailable.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid API key")]
    InvalidApiKey,

    #[error("rate limit or quota exceeded")]
    RateLimited,

    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Runs one search and returns at most `limit` results in provider rank order.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError>;

    fn name(&self) -> &'static str;
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
struct TavilyResponse {
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Tavily-backed search provider.
#[derive(Clone)]
pub struct TavilySearchProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl TavilySearchProvider {
    /// Fails when no API key is configured, so a missing credential surfaces at startup.
    pub fn new(settings: &SearchSettings) -> Result<Self, ConfigError> {
        let api_key = settings.api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            endpoint: format!("{}/search", settings.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl SearchProvider for TavilySearchProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        tracing::debug!(query = %query, max_results = limit, "performing tavily search");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&TavilyRequest {
                query,
                search_depth: SEARCH_DEPTH,
                max_results: limit,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, error = %body, "tavily search api error");

            return match status.as_u16() {
                401 | 403 => Err(SearchError::InvalidApiKey),
                429 | 432 | 433 => Err(SearchError::RateLimited),
                code => Err(SearchError::Api { status: code, body }),
            };
        }

        let body = response.text().await?;
        let parsed: TavilyResponse = serde_json::from_str(&body)
            .map_err(|e| SearchError::MalformedResponse(e.to_string()))?;

        let results: Vec<SearchResult> = parsed
            .results
            .into_iter()
            .filter_map(|r| {
                let url = r.url.filter(|u| !u.trim().is_empty())?;
                Some(SearchResult {
                    title: r.title.unwrap_or_default(),
                    url,
                })
            })
            .take(limit)
            .collect();

        tracing::debug!(query = %query, result_count = results.len(), "tavily search completed");
        Ok(results)
    }

    fn name(&self) -> &'static str {
        "tavily"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpRequest, HttpResponse};
    use serde_json::{json, Value};

    fn settings(base_url: &str) -> SearchSettings {
        SearchSettings {
            api_key: "tvly-test".to_string(),
            base_url: base_url.to_string(),
            default_max_results: 5,
        }
    }

    async fn echo_search(req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
        let authorized = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some("Bearer tvly-test");
        if !authorized || body["search_depth"] != "advanced" {
            return HttpResponse::BadRequest().finish();
        }

        let count = body["max_results"].as_u64().unwrap_or(0) + 2;
        let results: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "title": format!("Result {}", i),
                    "url": format!("https://site{}.com/article", i),
                    "content": "snippet",
                    "score": 0.5
                })
            })
            .collect();
        HttpResponse::Ok().json(json!({ "query": body["query"], "results": results }))
    }

    #[test]
    fn empty_api_key_fails_at_construction() {
        let mut s = settings("http://localhost");
        s.api_key = "  ".to_string();
        assert!(matches!(
            TavilySearchProvider::new(&s),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[actix_rt::test]
    async fn sends_advanced_depth_and_truncates_to_limit() {
        let srv = actix_test::start(|| App::new().route("/search", web::post().to(echo_search)));
        let provider = TavilySearchProvider::new(&settings(&srv.url(""))).unwrap();

        let results = provider.search("moon landing", 3).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0], SearchResult::new("Result 0", "https://site0.com/article"));
        assert_eq!(results[2].url, "https://site2.com/article");
    }

    #[actix_rt::test]
    async fn skips_entries_without_url_and_defaults_missing_title() {
        let srv = actix_test::start(|| {
            App::new().route(
                "/search",
                web::post().to(|| async {
                    HttpResponse::Ok().json(json!({
                        "results": [
                            {"title": "no url"},
                            {"url": "https://bbc.com/news"},
                            {"title": "ok", "url": "https://cnn.com/x"}
                        ]
                    }))
                }),
            )
        });
        let provider = TavilySearchProvider::new(&settings(&srv.url(""))).unwrap();

        let results = provider.search("claim", 10).await.unwrap();

        assert_eq!(
            results,
            vec![
                SearchResult::new("", "https://bbc.com/news"),
                SearchResult::new("ok", "https://cnn.com/x"),
            ]
        );
    }

    #[actix_rt::test]
    async fn maps_http_status_to_error_kind() {
        let srv = actix_test::start(|| {
            App::new()
                .route(
                    "/unauthorized/search",
                    web::post().to(|| async { HttpResponse::Unauthorized().finish() }),
                )
                .route(
                    "/quota/search",
                    web::post().to(|| async { HttpResponse::TooManyRequests().finish() }),
                )
                .route(
                    "/broken/search",
                    web::post().to(|| async { HttpResponse::InternalServerError().body("boom") }),
                )
        });

        let unauthorized = TavilySearchProvider::new(&settings(&srv.url("/unauthorized"))).unwrap();
        assert!(matches!(
            unauthorized.search("q", 5).await,
            Err(SearchError::InvalidApiKey)
        ));

        let quota = TavilySearchProvider::new(&settings(&srv.url("/quota"))).unwrap();
        assert!(matches!(
            quota.search("q", 5).await,
            Err(SearchError::RateLimited)
        ));

        let broken = TavilySearchProvider::new(&settings(&srv.url("/broken"))).unwrap();
        match broken.search("q", 5).await {
            Err(SearchError::Api { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn malformed_body_is_reported() {
        let srv = actix_test::start(|| {
            App::new().route(
                "/search",
                web::post().to(|| async { HttpResponse::Ok().body("not json") }),
            )
        });
        let provider = TavilySearchProvider::new(&settings(&srv.url(""))).unwrap();

        assert!(matches!(
            provider.search("q", 5).await,
            Err(SearchError::MalformedResponse(_))
        ));
    }

    #[actix_rt::test]
    async fn unreachable_host_is_a_network_error() {
        let provider = TavilySearchProvider::new(&settings("http://127.0.0.1:1")).unwrap();
        assert!(matches!(
            provider.search("q", 5).await,
            Err(SearchError::Network(_))
        ));
    }
}
