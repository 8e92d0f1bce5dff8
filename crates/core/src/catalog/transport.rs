use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::config::AppConfig;

use super::CatalogError;

/// Query string parameters for one request, in insertion order.
pub type Query = Vec<(&'static str, String)>;

/// Issues GET requests against the catalog and returns decoded JSON bodies.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    /// Fetch `path` (relative to the API base) with the given query.
    async fn get_json(&self, path: &str, query: &Query) -> Result<Value, CatalogError>;
}

/// [`CatalogTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    /// Build a transport from configuration.
    pub fn new(config: &AppConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, path: &str, query: &Query) -> reqwest::RequestBuilder {
        self.http
            .get(self.url(path))
            .query(&[("key", self.api_key.as_str())])
            .query(query)
    }
}

fn check_status(status: StatusCode, path: &str) -> Result<(), CatalogError> {
    if status.is_success() {
        return Ok(());
    }
    Err(CatalogError::Status {
        status: status.as_u16(),
        path: path.to_string(),
    })
}

#[async_trait]
impl CatalogTransport for HttpTransport {
    async fn get_json(&self, path: &str, query: &Query) -> Result<Value, CatalogError> {
        debug!(path, ?query, "catalog request");
        let response = self.request(path, query).send().await?;
        check_status(response.status(), path)?;

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|source| CatalogError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path_with_single_slash() -> Result<(), CatalogError> {
        let config = AppConfig {
            base_url: "https://api.example.test/api/".to_string(),
            ..AppConfig::default()
        };
        let transport = HttpTransport::new(&config)?;
        assert_eq!(transport.url("/games"), "https://api.example.test/api/games");
        assert_eq!(transport.url("games/42"), "https://api.example.test/api/games/42");
        Ok(())
    }

    #[test]
    fn every_request_carries_the_api_key() -> Result<(), CatalogError> {
        let config = AppConfig {
            base_url: "https://api.example.test/api".to_string(),
            api_key: "abc123".to_string(),
            ..AppConfig::default()
        };
        let transport = HttpTransport::new(&config)?;
        let query: Query = vec![
            ("ordering", "-metacritic".to_string()),
            ("page_size", "28".to_string()),
            ("page", "2".to_string()),
        ];

        let request = transport.request("games", &query).build()?;
        let url = request.url();
        assert_eq!(url.path(), "/api/games");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("key".to_string(), "abc123".to_string()),
                ("ordering".to_string(), "-metacritic".to_string()),
                ("page_size".to_string(), "28".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );

        let lookup = transport.request("games/3328", &Query::new()).build()?;
        assert_eq!(lookup.url().query(), Some("key=abc123"));
        Ok(())
    }

    #[test]
    fn non_success_status_maps_to_status_error() {
        assert!(check_status(StatusCode::OK, "games").is_ok());
        assert!(check_status(StatusCode::NO_CONTENT, "games").is_ok());

        match check_status(StatusCode::UNAUTHORIZED, "genres") {
            Err(CatalogError::Status { status, path }) => {
                assert_eq!(status, 401);
                assert_eq!(path, "genres");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            check_status(StatusCode::BAD_GATEWAY, "games/1"),
            Err(CatalogError::Status { status: 502, .. })
        ));
    }
}
