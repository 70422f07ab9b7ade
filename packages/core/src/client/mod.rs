//! HTTP client for the Baselime REST API.
//!
//! One [`Client`] is built per provider configuration and shared by every
//! resource. Each call is a single request with no retries: a non-2xx
//! response becomes [`ClientError::Status`], except for a 404 on reads,
//! which is reported as `Ok(None)`.

pub mod alerts;
pub mod dashboards;
pub mod error;
pub mod queries;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use alerts::{Alert, AlertChannel, AlertParameters, AlertSnooze, AlertThreshold};
pub use dashboards::{Dashboard, DashboardParameters, DashboardWidget, WidgetType};
pub use error::ClientError;
pub use queries::{
    FilterCombination, Query, QueryCalculation, QueryFilter, QueryGroupBy, QueryOrderBy,
    QueryParameters, SearchNeedle,
};

pub const DEFAULT_API_HOST: &str = "go.baselime.io";
pub const DEFAULT_API_SCHEME: &str = "https";
pub const API_KEY_HEADER: &str = "x-api-key";
const USER_AGENT_PRODUCT: &str = "baselime-io-terraform-provider";

/// Connection settings for [`Client`].
#[derive(Clone)]
pub struct ClientConfig {
    pub version: String,
    pub api_key: String,
    pub api_host: String,
    pub api_scheme: String,
    /// Log the body of unsuccessful responses at debug level.
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            api_key: String::new(),
            api_host: DEFAULT_API_HOST.to_string(),
            api_scheme: DEFAULT_API_SCHEME.to_string(),
            debug: false,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("version", &self.version)
            .field("api_key", &"<redacted>")
            .field("api_host", &self.api_host)
            .field("api_scheme", &self.api_scheme)
            .field("debug", &self.debug)
            .finish()
    }
}

impl ClientConfig {
    /// Overlay `other` on top of `self`. Empty strings in `other` keep the
    /// current value; `debug` is always taken from `other`.
    pub fn merge(mut self, other: ClientConfig) -> Self {
        if !other.version.is_empty() {
            self.version = other.version;
        }
        if !other.api_key.is_empty() {
            self.api_key = other.api_key;
        }
        if !other.api_host.is_empty() {
            self.api_host = other.api_host;
        }
        if !other.api_scheme.is_empty() {
            self.api_scheme = other.api_scheme;
        }
        self.debug = other.debug;
        self
    }

    pub fn user_agent(&self) -> String {
        format!("{}/{}", USER_AGENT_PRODUCT, self.version)
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}", self.api_scheme, self.api_host)
    }
}

#[derive(Clone)]
pub struct Client {
    base_url: Url,
    debug: bool,
    http: reqwest::Client,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url();
        let base_url = match Url::parse(&base_url) {
            Ok(url) if !url.cannot_be_a_base() => url,
            _ => return Err(ClientError::InvalidUrl { url: base_url }),
        };

        let mut api_key = HeaderValue::from_str(&config.api_key).map_err(|_| {
            ClientError::InvalidHeader {
                header: API_KEY_HEADER,
            }
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url,
            debug: config.debug,
            http,
        })
    }

    /// Build an endpoint URL. Each segment is percent-encoded on its own so
    /// an id always stays one path segment. An empty final segment leaves a
    /// trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url) -> Result<Response, ClientError> {
        let response = self.http.request(method, url).send().await?;
        Ok(response)
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: &T,
    ) -> Result<Response, ClientError> {
        let body = serde_json::to_vec(body)?;
        tracing::trace!(
            method = %method,
            path = url.path(),
            body = %String::from_utf8_lossy(&body),
            "sending request"
        );

        let response = self.http.request(method, url).body(body).send().await?;
        Ok(response)
    }

    /// Pass 2xx responses through; turn everything else into a status error.
    async fn expect_success(
        &self,
        response: Response,
        operation: &'static str,
    ) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if self.debug {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, body = %body, "{} rejected", operation);
        }
        tracing::error!(%status, "failed to {}", operation);

        Err(ClientError::Status { operation, status })
    }

    /// GET an enveloped record. A 404 is absence, not an error.
    async fn get_envelope<E: DeserializeOwned>(
        &self,
        url: Url,
        operation: &'static str,
    ) -> Result<Option<E>, ClientError> {
        let response = self.send(Method::GET, url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::trace!(path = response.url().path(), "{}: not found", operation);
            return Ok(None);
        }

        let response = self.expect_success(response, operation).await?;
        let envelope = response
            .json::<E>()
            .await
            .map_err(|err| ClientError::decode(err.to_string()))?;

        Ok(Some(envelope))
    }

    async fn write<T: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: &T,
        operation: &'static str,
    ) -> Result<(), ClientError> {
        let response = self.send_json(method, url, body).await?;
        self.expect_success(response, operation).await?;
        Ok(())
    }

    async fn remove(&self, url: Url, operation: &'static str) -> Result<(), ClientError> {
        let response = self.send(Method::DELETE, url).await?;
        self.expect_success(response, operation).await?;
        Ok(())
    }
}

/// Reject identifiers that cannot name a single path segment.
pub(crate) fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ClientError> {
    if value.is_empty() {
        return Err(ClientError::MissingField { field });
    }
    if value == "." || value == ".." {
        return Err(ClientError::InvalidId {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

pub(crate) fn is_zero(value: &i64) -> bool {
    *value == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_production_api() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "https://go.baselime.io");
        assert_eq!(
            config.user_agent(),
            format!("baselime-io-terraform-provider/{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn merge_keeps_defaults_for_empty_fields() {
        let merged = ClientConfig::default().merge(ClientConfig {
            version: String::new(),
            api_key: "secret".into(),
            api_host: String::new(),
            api_scheme: "http".into(),
            debug: true,
        });

        assert_eq!(merged.api_key, "secret");
        assert_eq!(merged.api_host, DEFAULT_API_HOST);
        assert_eq!(merged.api_scheme, "http");
        assert!(merged.debug);
        assert!(!merged.version.is_empty());
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = ClientConfig {
            api_key: "super-secret".into(),
            ..ClientConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn new_rejects_api_key_with_control_characters() {
        let config = ClientConfig {
            api_key: "bad\nkey".into(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            Client::new(config),
            Err(ClientError::InvalidHeader { header: API_KEY_HEADER })
        ));
    }

    fn local_client() -> Client {
        Client::new(ClientConfig {
            api_key: "key".into(),
            api_host: "localhost:8080".into(),
            api_scheme: "http".into(),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoint_escapes_each_segment() {
        let client = local_client();

        let url = client.endpoint(&["v1", "queries", "a?b#c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/queries/a%3Fb%23c");
        assert_eq!(url.query(), None);

        let url = client.endpoint(&["v1", "alerts", "svc", "x/../y"]).unwrap();
        assert_eq!(url.path(), "/v1/alerts/svc/x%2F..%2Fy");

        let url = client.endpoint(&["v1", "queries", "50%"]).unwrap();
        assert_eq!(url.path(), "/v1/queries/50%25");
    }

    #[test]
    fn endpoint_keeps_trailing_slash_for_empty_segment() {
        let url = local_client().endpoint(&["v1", "dashboards", ""]).unwrap();
        assert_eq!(url.path(), "/v1/dashboards/");
    }

    #[test]
    fn new_rejects_unparseable_host() {
        let config = ClientConfig {
            api_host: "bad host".into(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            Client::new(config),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn require_rejects_empty_values() {
        assert!(require("queryId", "").is_err());
        assert_eq!(require("queryId", "errors").unwrap(), "errors");
        assert!(matches!(
            require("alertId", ".."),
            Err(ClientError::InvalidId { field: "alertId", .. })
        ));
    }
}
