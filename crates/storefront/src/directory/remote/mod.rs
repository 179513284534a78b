//! Remote data API client.
//!
//! Uses `graphql_client` for type-safe queries with `reqwest` 0.13 for HTTP.
//! Full listings are cached using `moka` with the configured TTL.

mod conversions;
pub mod queries;

use std::sync::Arc;

use dabot_core::{Store, StoreQuery};
use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use super::{DirectoryError, GraphQLError, GraphQLErrorLocation, flag_unmatched_brands};
use crate::config::RemoteDataConfig;

use conversions::convert_store;
use queries::{ListStores, list_stores};

/// Records requested per `listStores` page.
const PAGE_SIZE: i64 = 100;

/// Most pages followed for one listing before giving up.
const MAX_PAGES: u32 = 100;

/// Exact-match filters evaluated by the data API.
///
/// Only filters whose backend semantics equal the listing engine's are
/// pushed down. Keyword and brand filters stay local because the backend's
/// `contains` is case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PushDown {
    pub area: Option<String>,
    pub prefecture: Option<String>,
}

impl PushDown {
    /// Extract the pushable filters from a store query.
    #[must_use]
    pub fn from_query(query: &StoreQuery) -> Self {
        Self {
            area: query.criteria().category.value().map(str::to_owned),
            prefecture: query.prefecture_filter().map(str::to_owned),
        }
    }

    fn to_filter(&self) -> Option<list_stores::ModelStoreFilterInput> {
        if self.area.is_none() && self.prefecture.is_none() {
            return None;
        }
        Some(list_stores::ModelStoreFilterInput {
            name: None,
            area: self.area.clone().map(eq),
            prefecture: self.prefecture.clone().map(eq),
            city: None,
        })
    }
}

fn eq(value: String) -> list_stores::ModelStringInput {
    list_stores::ModelStringInput {
        eq: Some(value),
        ne: None,
        contains: None,
        begins_with: None,
    }
}

// =============================================================================
// DataClient
// =============================================================================

/// Client for the directory data API.
#[derive(Clone)]
pub struct DataClient {
    inner: Arc<DataClientInner>,
}

struct DataClientInner {
    client: reqwest::Client,
    endpoint: Url,
    api_key: SecretString,
    cache: Cache<PushDown, Vec<Store>>,
}

impl DataClient {
    /// Create a new data API client.
    #[must_use]
    pub fn new(config: &RemoteDataConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(256)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(DataClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint.clone(),
                api_key: config.api_key.clone(),
                cache,
            }),
        }
    }

    /// Execute a GraphQL query.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, DirectoryError>
    where
        Q::Variables: serde::Serialize,
    {
        let request_body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header("x-api-key", self.inner.api_key.expose_secret())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(DirectoryError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Data API returned non-success status"
            );
            return Err(DirectoryError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse data API response"
                );
                return Err(DirectoryError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");

            return Err(DirectoryError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        locations: e.locations.map_or_else(Vec::new, |locs| {
                            locs.into_iter()
                                .map(|l| GraphQLErrorLocation {
                                    line: i64::from(l.line),
                                    column: i64::from(l.column),
                                })
                                .collect()
                        }),
                        path: e.path.map_or_else(Vec::new, |p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(s) => {
                                        serde_json::Value::String(s)
                                    }
                                    graphql_client::PathFragment::Index(i) => {
                                        serde_json::Value::Number(i.into())
                                    }
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %response_text.chars().take(500).collect::<String>(),
                "Data API response has no data and no errors"
            );
            DirectoryError::MissingData
        })
    }

    /// All stores passing `push_down`, following `nextToken` to the last page.
    ///
    /// Results are cached per filter set.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    #[instrument(skip(self))]
    pub async fn list_stores(&self, push_down: &PushDown) -> Result<Vec<Store>, DirectoryError> {
        if let Some(stores) = self.inner.cache.get(push_down).await {
            debug!("Cache hit for store listing");
            return Ok(stores);
        }

        let mut stores = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0_u32;

        loop {
            let variables = list_stores::Variables {
                filter: push_down.to_filter(),
                limit: Some(PAGE_SIZE),
                next_token: next_token.take(),
            };

            let data = self.execute::<ListStores>(variables).await?;
            pages += 1;

            let Some(page) = data.list_stores else {
                break;
            };
            stores.extend(page.items.into_iter().flatten().map(convert_store));

            match page.next_token {
                Some(token) if !token.is_empty() => {
                    if pages >= MAX_PAGES {
                        tracing::error!(pages, "Store listing exceeded the page limit");
                        return Err(DirectoryError::PageLimit(MAX_PAGES));
                    }
                    next_token = Some(token);
                }
                _ => break,
            }
        }

        debug!(count = stores.len(), pages, "Fetched store listing");
        flag_unmatched_brands(&stores);

        self.inner
            .cache
            .insert(push_down.clone(), stores.clone())
            .await;

        Ok(stores)
    }

    /// Issue a minimal uncached query to verify the API is reachable.
    ///
    /// # Errors
    ///
    /// Returns the request error when the API cannot answer.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), DirectoryError> {
        let variables = list_stores::Variables {
            filter: None,
            limit: Some(1),
            next_token: None,
        };
        self.execute::<ListStores>(variables).await.map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::{Json, Router, extract::State, http::HeaderMap, routing::post};
    use dabot_core::{StoreSort, catalog};
    use serde_json::{Value, json};

    use super::*;
    use crate::config::SearchStrategy;
    use crate::directory::StoreDirectory;

    const TEST_KEY: &str = "da2-k7Qm3xVb9TzR4wLp8sNc6yHf1j";

    #[derive(Clone, Copy)]
    enum Mode {
        Healthy,
        GraphQLErrors,
        ServerError,
        EndlessPages,
    }

    #[derive(Clone)]
    struct Fake {
        mode: Mode,
        requests: Arc<AtomicUsize>,
    }

    /// Two-page `listStores` over the bundled fixture, honouring `eq` filters.
    async fn fake_graphql(
        State(fake): State<Fake>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (axum::http::StatusCode, Json<Value>) {
        fake.requests.fetch_add(1, Ordering::SeqCst);

        if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some(TEST_KEY) {
            return (
                axum::http::StatusCode::UNAUTHORIZED,
                Json(json!({"errors": [{"message": "UnauthorizedException"}]})),
            );
        }

        match fake.mode {
            Mode::ServerError => {
                return (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"message": "boom"})),
                );
            }
            Mode::GraphQLErrors => {
                return (
                    axum::http::StatusCode::OK,
                    Json(json!({
                        "data": null,
                        "errors": [{"message": "Not Authorized to access listStores on type Query"}]
                    })),
                );
            }
            Mode::EndlessPages => {
                return (
                    axum::http::StatusCode::OK,
                    Json(json!({"data": {"listStores": {"items": [], "nextToken": "again"}}})),
                );
            }
            Mode::Healthy => {}
        }

        let vars = &body["variables"];
        let area = vars["filter"]["area"]["eq"].as_str();
        let prefecture = vars["filter"]["prefecture"]["eq"].as_str();

        let items: Vec<Value> = catalog::sample_stores()
            .iter()
            .filter(|s| area.is_none_or(|a| s.area == a))
            .filter(|s| prefecture.is_none_or(|p| s.prefecture == p))
            .map(|s| serde_json::to_value(s).unwrap())
            .collect();

        let split = items.len() / 2;
        let (page, next) = match vars["nextToken"].as_str() {
            None => (items[..split].to_vec(), Some("page-2")),
            Some(_) => (items[split..].to_vec(), None),
        };

        (
            axum::http::StatusCode::OK,
            Json(json!({"data": {"listStores": {"items": page, "nextToken": next}}})),
        )
    }

    async fn spawn_fake(mode: Mode) -> (DataClient, Arc<AtomicUsize>) {
        let requests = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/graphql", post(fake_graphql))
            .with_state(Fake {
                mode,
                requests: requests.clone(),
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = DataClient::new(&RemoteDataConfig {
            endpoint: Url::parse(&format!("http://{addr}/graphql")).unwrap(),
            api_key: SecretString::from(TEST_KEY),
            cache_ttl: Duration::from_secs(60),
        });
        (client, requests)
    }

    #[test]
    fn test_push_down_from_query() {
        let query = StoreQuery {
            keyword: Some("shop".to_string()),
            area: Some("all".to_string()),
            prefecture: Some("大阪府".to_string()),
            ..Default::default()
        };
        let push = PushDown::from_query(&query);
        assert_eq!(push.area, None);
        assert_eq!(push.prefecture.as_deref(), Some("大阪府"));
        assert!(PushDown::default().to_filter().is_none());
    }

    #[tokio::test]
    async fn test_list_stores_follows_next_token() {
        let (client, requests) = spawn_fake(Mode::Healthy).await;
        let stores = client.list_stores(&PushDown::default()).await.unwrap();
        assert_eq!(stores, catalog::sample_stores());
        assert_eq!(requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_list_stores_is_cached() {
        let (client, requests) = spawn_fake(Mode::Healthy).await;
        client.list_stores(&PushDown::default()).await.unwrap();
        client.list_stores(&PushDown::default()).await.unwrap();
        assert_eq!(requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_graphql_errors_surface() {
        let (client, _) = spawn_fake(Mode::GraphQLErrors).await;
        let err = client.list_stores(&PushDown::default()).await.unwrap_err();
        assert!(matches!(err, DirectoryError::GraphQL(ref errors) if errors.len() == 1));
    }

    #[tokio::test]
    async fn test_server_error_surfaces_status() {
        let (client, _) = spawn_fake(Mode::ServerError).await;
        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, DirectoryError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_repeating_next_token_stops_at_page_limit() {
        let (client, requests) = spawn_fake(Mode::EndlessPages).await;
        let err = client.list_stores(&PushDown::default()).await.unwrap_err();
        assert!(matches!(err, DirectoryError::PageLimit(MAX_PAGES)));
        assert_eq!(
            requests.load(Ordering::SeqCst),
            usize::try_from(MAX_PAGES).unwrap()
        );
    }

    #[tokio::test]
    async fn test_remote_and_local_strategies_agree() {
        let queries = [
            StoreQuery::default(),
            StoreQuery {
                area: Some("関西".to_string()),
                ..Default::default()
            },
            StoreQuery {
                area: Some("関東".to_string()),
                prefecture: Some("東京都".to_string()),
                keyword: Some("shop".to_string()),
                sort: StoreSort::YearDesc,
                ..Default::default()
            },
            StoreQuery {
                brands: vec!["POLAR".to_string(), "OBEY".to_string()],
                sort: StoreSort::BrandsDesc,
                ..Default::default()
            },
        ];

        let (client, _) = spawn_fake(Mode::Healthy).await;
        let remote = StoreDirectory::remote(client).with_strategy(SearchStrategy::Remote);
        let local = StoreDirectory::fixture();

        for query in &queries {
            assert_eq!(
                remote.search_stores(query).await.unwrap(),
                local.search_stores(query).await.unwrap(),
                "query {query:?}"
            );
        }
    }
}
