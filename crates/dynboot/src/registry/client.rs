//! Registry retrieval.

use super::{TableLayout, parse_nodes};
use crate::error::Result;
use crate::node::ToxNode;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Public Tox node list.
pub const DEFAULT_REGISTRY_URL: &str = "https://wiki.tox.chat/users/nodes";

/// Something that can produce the full list of node candidates.
#[async_trait]
pub trait NodeSource: Send + Sync {
    /// Fetch every candidate in registry order.
    async fn fetch_all(&self) -> Result<Vec<ToxNode>>;
}

/// Fetches and parses the node table from the Tox wiki.
#[derive(Debug, Clone)]
pub struct WikiRegistry {
    client: reqwest::Client,
    url: String,
    layout: TableLayout,
}

impl WikiRegistry {
    /// Create a registry client for `url` using `layout`.
    pub fn new(url: &str, layout: TableLayout, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("tox-dynboot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
            layout,
        })
    }

    /// Registry URL in use.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Table layout in use.
    #[must_use]
    pub fn layout(&self) -> TableLayout {
        self.layout
    }

    async fn fetch_page(&self) -> Result<String> {
        debug!("Fetching node registry from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl NodeSource for WikiRegistry {
    async fn fetch_all(&self) -> Result<Vec<ToxNode>> {
        let page = self.fetch_page().await.inspect_err(|e| {
            warn!("Node registry fetch from {} failed: {}", self.url, e);
        })?;

        let nodes = parse_nodes(&page, self.layout).inspect_err(|e| {
            warn!("Node registry at {} could not be parsed: {}", self.url, e);
        })?;

        info!("Fetched {} node candidates from {}", nodes.len(), self.url);
        Ok(nodes)
    }
}

/// A fixed node list, e.g. one loaded from a previously saved page.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    nodes: Vec<ToxNode>,
}

impl StaticSource {
    #[must_use]
    pub fn new(nodes: Vec<ToxNode>) -> Self {
        Self { nodes }
    }

    /// Parse a saved registry page.
    pub fn from_page(page: &str, layout: TableLayout) -> Result<Self> {
        Ok(Self::new(parse_nodes(page, layout)?))
    }
}

#[async_trait]
impl NodeSource for StaticSource {
    async fn fetch_all(&self) -> Result<Vec<ToxNode>> {
        Ok(self.nodes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::registry::parse::fixture_page;
    use axum::{Router, routing::get};

    async fn serve(page: String) -> String {
        let app = Router::new().route(
            "/users/nodes",
            get(move || {
                let page = page.clone();
                async move { page }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn page() -> String {
        fixture_page(
            &[
                ["127.0.0.1", "", "33445", "AB01", "alice", "DE", "UP"],
                ["127.0.0.2", "::1", "443", "CD02", "bob", "NL", "DOWN"],
            ],
            TableLayout::Status,
        )
    }

    #[tokio::test]
    async fn test_fetch_all_over_http() {
        let base = serve(page()).await;
        let registry = WikiRegistry::new(
            &format!("{base}/users/nodes"),
            TableLayout::Status,
            Duration::from_secs(5),
        )
        .unwrap();

        let nodes = registry.fetch_all().await.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].maintainer, "alice");
        assert_eq!(nodes[1].public_key, vec![0xCD, 0x02]);
        assert!(!nodes[1].status);
    }

    #[tokio::test]
    async fn test_http_error_status_is_fetch_error() {
        let base = serve(page()).await;
        let registry = WikiRegistry::new(
            &format!("{base}/missing"),
            TableLayout::Status,
            Duration::from_secs(5),
        )
        .unwrap();

        let err = registry.fetch_all().await.unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
    }

    #[tokio::test]
    async fn test_unreachable_registry_is_fetch_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let registry = WikiRegistry::new(
            &format!("http://{addr}/users/nodes"),
            TableLayout::Status,
            Duration::from_secs(2),
        )
        .unwrap();
        assert!(matches!(registry.fetch_all().await, Err(Error::Fetch(_))));
    }

    #[tokio::test]
    async fn test_wrong_layout_is_parse_error() {
        let base = serve(page()).await;
        let registry = WikiRegistry::new(
            &format!("{base}/users/nodes"),
            TableLayout::Legacy,
            Duration::from_secs(5),
        )
        .unwrap();

        let err = registry.fetch_all().await.unwrap_err();
        assert!(err.is_parse());
    }

    #[tokio::test]
    async fn test_static_source_from_page() {
        let source = StaticSource::from_page(&page(), TableLayout::Status).unwrap();
        assert_eq!(source.fetch_all().await.unwrap().len(), 2);
    }
}
