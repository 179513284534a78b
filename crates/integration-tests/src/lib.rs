//! Integration tests for the DABOT directory site.
//!
//! Each test binds the full application router to an ephemeral local port
//! and talks to it over HTTP with `reqwest`, so peer addresses and response
//! headers behave as they do in production.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dabot-integration-tests
//! ```

use std::net::SocketAddr;

use dabot_storefront::config::StorefrontConfig;
use dabot_storefront::directory::StoreDirectory;
use dabot_storefront::state::AppState;
use tokio::net::TcpListener;

/// A directory site served on a local port for the duration of a test.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestContext {
    /// Serve the bundled store fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn fixture() -> std::io::Result<Self> {
        Self::with_directory(StoreDirectory::fixture()).await
    }

    /// Serve a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn with_directory(directory: StoreDirectory) -> std::io::Result<Self> {
        Self::serve(StorefrontConfig::local(), directory).await
    }

    /// Serve the fixture as if deployed behind a reverse proxy, so client
    /// IPs come from `X-Forwarded-For`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn behind_proxy() -> std::io::Result<Self> {
        let config = StorefrontConfig {
            trust_proxy_headers: true,
            ..StorefrontConfig::local()
        };
        Self::serve(config, StoreDirectory::fixture()).await
    }

    async fn serve(config: StorefrontConfig, directory: StoreDirectory) -> std::io::Result<Self> {
        let state = AppState::with_directory(config, directory);
        let app = dabot_storefront::app(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await;
        });

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{addr}"),
        })
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
