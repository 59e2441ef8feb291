//! Metadata Fetcher: on-chain pointer, then the JSON document it references.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::{chain::ChainMetadataClient, error::FetchError, TokenId};

/// Off-chain JSON document describing one NFT.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetadataDocument {
    /// Display name, `"<collection> #<n>"` with `n` starting at 1
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Where this document was fetched from
    #[serde(skip)]
    pub uri: String,
}

impl MetadataDocument {
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: None,
            image: None,
            uri: uri.into(),
        }
    }

    /// Parse a response body fetched from `uri`.
    pub fn from_slice(uri: &str, body: &[u8]) -> Result<Self, FetchError> {
        let mut doc: Self = serde_json::from_slice(body).map_err(|source| FetchError::Document {
            uri: uri.to_string(),
            source,
        })?;
        doc.uri = uri.to_string();
        Ok(doc)
    }
}

/// Anything that can produce a fresh metadata document for a token.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self, token: &TokenId) -> Result<MetadataDocument, FetchError>;
}

/// Chain lookup followed by an HTTP GET. Nothing is cached and nothing is retried here.
pub struct MetadataFetcher<C> {
    chain: C,
    http: reqwest::Client,
}

impl<C: ChainMetadataClient> MetadataFetcher<C> {
    pub fn new(chain: C) -> Self {
        Self::with_client(chain, reqwest::Client::new())
    }

    pub fn with_client(chain: C, http: reqwest::Client) -> Self {
        Self { chain, http }
    }
}

#[async_trait]
impl<C: ChainMetadataClient> MetadataSource for MetadataFetcher<C> {
    async fn fetch(&self, token: &TokenId) -> Result<MetadataDocument, FetchError> {
        let uri = self.chain.metadata_uri(token).await?;
        debug!("fetching metadata for {token} from {uri}");

        let http_err = |source: reqwest::Error| FetchError::Http {
            uri: uri.clone(),
            source,
        };
        let body = self
            .http
            .get(&uri)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(http_err)?
            .bytes()
            .await
            .map_err(http_err)?;

        MetadataDocument::from_slice(&uri, &body)
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    struct FixedUri(Result<String, ()>);

    #[async_trait]
    impl ChainMetadataClient for FixedUri {
        async fn metadata_uri(&self, token: &TokenId) -> Result<String, FetchError> {
            self.0
                .clone()
                .map_err(|()| FetchError::AccountNotFound(token.to_string()))
        }
    }

    /// Answer a single HTTP request with `status` and `body`; returns the URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/reveal/2.json")
    }

    fn fetcher(uri: Result<String, ()>) -> MetadataFetcher<FixedUri> {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        MetadataFetcher::with_client(FixedUri(uri), http)
    }

    #[tokio::test]
    async fn fetches_document_behind_on_chain_uri() {
        let uri = serve_once("200 OK", r#"{"name":"Coll #3","symbol":"COLL"}"#).await;

        let doc = fetcher(Ok(uri.clone())).fetch(&"MintA".into()).await.unwrap();

        assert_eq!(doc.name, "Coll #3");
        assert_eq!(doc.symbol.as_deref(), Some("COLL"));
        assert_eq!(doc.uri, uri);
    }

    #[tokio::test]
    async fn error_status_is_an_http_error() {
        let uri = serve_once("404 Not Found", r#"{"error":"missing"}"#).await;

        let err = fetcher(Ok(uri.clone())).fetch(&"MintA".into()).await.unwrap_err();

        assert!(matches!(err, FetchError::Http { uri: failed, .. } if failed == uri));
    }

    #[tokio::test]
    async fn non_json_body_is_a_document_error() {
        let uri = serve_once("200 OK", "<html>gateway timeout</html>").await;

        let err = fetcher(Ok(uri)).fetch(&"MintA".into()).await.unwrap_err();

        assert!(matches!(err, FetchError::Document { .. }));
    }

    #[tokio::test]
    async fn chain_failure_skips_http() {
        let err = fetcher(Err(())).fetch(&"MintA".into()).await.unwrap_err();

        assert!(matches!(err, FetchError::AccountNotFound(mint) if mint == "MintA"));
    }

    #[test]
    fn parses_document_and_records_uri() {
        let body = br#"{"name":"Coll #3","symbol":"COLL","image":"https://img/2.png","attributes":[]}"#;
        let doc = MetadataDocument::from_slice("https://arweave.net/x", body).unwrap();
        assert_eq!(doc.name, "Coll #3");
        assert_eq!(doc.symbol.as_deref(), Some("COLL"));
        assert_eq!(doc.uri, "https://arweave.net/x");
    }

    #[test]
    fn rejects_document_without_name() {
        let err = MetadataDocument::from_slice("https://arweave.net/x", br#"{"symbol":"C"}"#)
            .unwrap_err();
        assert!(matches!(err, FetchError::Document { .. }));
    }

    #[test]
    fn rejects_non_json_body() {
        let err =
            MetadataDocument::from_slice("https://arweave.net/x", b"<html>502</html>").unwrap_err();
        assert!(err.to_string().contains("https://arweave.net/x"));
    }
}
