//! Store directory data access.
//!
//! # Architecture
//!
//! - Records come from the bundled fixture or from the remote data API
//!   (GraphQL, via `graphql-client`)
//! - Remote listings are cached in memory via `moka`
//! - Every search result is produced by the `dabot_core::listing` engine, so
//!   callers cannot tell which backend or search strategy answered
//!
//! # Example
//!
//! ```rust,ignore
//! use dabot_core::StoreQuery;
//! use dabot_storefront::directory::StoreDirectory;
//!
//! let directory = StoreDirectory::from_config(&config);
//! let stores = directory
//!     .search_stores(&StoreQuery {
//!         area: Some("関西".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! ```

mod remote;

pub use remote::{DataClient, PushDown};

use std::sync::Arc;

use dabot_core::{Store, StoreQuery, catalog};
use thiserror::Error;
use tracing::instrument;

use crate::config::{DataSourceConfig, SearchStrategy, StorefrontConfig};

/// Errors that can occur when loading directory records.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The data API answered with a non-success status.
    #[error("Data API returned HTTP {status}")]
    Status { status: u16, body: String },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// The response carried neither data nor errors.
    #[error("No data in response")]
    MissingData,

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Pagination did not terminate within the page limit.
    #[error("Store listing exceeded {0} pages")]
    PageLimit(u32),

    /// Rate limited by the data API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// A GraphQL error returned by the data API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Store record source.
#[derive(Clone)]
enum Backend {
    Static(Arc<[Store]>),
    Remote(DataClient),
}

/// Entry point for store listings and searches.
///
/// Cheaply cloneable; clones share the underlying fixture or client.
#[derive(Clone)]
pub struct StoreDirectory {
    backend: Backend,
    strategy: SearchStrategy,
}

impl StoreDirectory {
    /// Build a directory from storefront configuration.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        let directory = match &config.data {
            DataSourceConfig::Static => Self::fixture(),
            DataSourceConfig::Remote(remote) => Self::remote(DataClient::new(remote)),
        };
        directory.with_strategy(config.search_strategy)
    }

    /// Directory over the bundled store fixture.
    #[must_use]
    pub fn fixture() -> Self {
        Self::with_stores(catalog::sample_stores())
    }

    /// Directory over an in-memory record set.
    ///
    /// Brand references missing from the catalog are logged once here.
    #[must_use]
    pub fn with_stores(stores: Vec<Store>) -> Self {
        flag_unmatched_brands(&stores);
        Self {
            backend: Backend::Static(stores.into()),
            strategy: SearchStrategy::Local,
        }
    }

    /// Directory backed by a remote data API client.
    #[must_use]
    pub const fn remote(client: DataClient) -> Self {
        Self {
            backend: Backend::Remote(client),
            strategy: SearchStrategy::Local,
        }
    }

    /// Replace the search strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub const fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Short backend name used in logs.
    #[must_use]
    pub const fn source_name(&self) -> &'static str {
        match self.backend {
            Backend::Static(_) => "static",
            Backend::Remote(_) => "remote",
        }
    }

    /// All store records in backend order.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote data API cannot be reached or answers
    /// with errors. The static backend never fails.
    #[instrument(skip(self), fields(source = self.source_name()))]
    pub async fn list_stores(&self) -> Result<Vec<Store>, DirectoryError> {
        match &self.backend {
            Backend::Static(stores) => Ok(stores.to_vec()),
            Backend::Remote(client) => client.list_stores(&PushDown::default()).await,
        }
    }

    /// Stores matching `query`, filtered and sorted by the listing engine.
    ///
    /// With [`SearchStrategy::Remote`] and a remote backend, exact-match
    /// filters are evaluated by the data API first; the engine then runs
    /// over the narrowed set, so the result equals the local strategy's.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be loaded.
    #[instrument(skip(self, query), fields(source = self.source_name(), strategy = ?self.strategy))]
    pub async fn search_stores(&self, query: &StoreQuery) -> Result<Vec<Store>, DirectoryError> {
        let records = match (&self.backend, self.strategy) {
            (Backend::Remote(client), SearchStrategy::Remote) => {
                client.list_stores(&PushDown::from_query(query)).await?
            }
            _ => self.list_stores().await?,
        };

        Ok(query.apply(&records).into_iter().cloned().collect())
    }

    /// Check that the backend can answer queries.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the data API is unreachable.
    pub async fn check_ready(&self) -> Result<(), DirectoryError> {
        match &self.backend {
            Backend::Static(_) => Ok(()),
            Backend::Remote(client) => client.ping().await,
        }
    }
}

/// Log a warning for each store brand reference that is not an exact
/// catalog brand name.
pub(crate) fn flag_unmatched_brands(stores: &[Store]) {
    for unmatched in catalog::unmatched_brand_references(stores) {
        tracing::warn!(
            store_id = %unmatched.store_id,
            brand = %unmatched.brand,
            expected = unmatched.expected,
            "Store brand reference does not match the catalog"
        );
    }
}
