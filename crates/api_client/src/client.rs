use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{validate_base_url, ApiConfig};
use crate::endpoints::Endpoint;
use crate::error::{ApiError, Result};

/// Async client for the KPI API.
///
/// Requests are never retried and carry no timeout. Every in-flight request
/// is abandoned as soon as the client's cancellation token fires.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    cancel: CancellationToken,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let base_url = validate_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url,
            cancel: CancellationToken::new(),
        })
    }

    /// Ties every request of this client to `token`.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: Endpoint) -> Url {
        // Endpoint paths are static relative paths, joining cannot fail on a validated base.
        self.base_url
            .join(endpoint.path())
            .unwrap_or_else(|_| self.base_url.clone())
    }

    /// Issues the endpoint's request and decodes the JSON body.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        if self.cancel.is_cancelled() {
            return Err(ApiError::Cancelled { endpoint });
        }

        let url = self.url_for(endpoint);
        debug!(%url, method = %endpoint.method(), "fetching {}", endpoint.description());

        let mut request = self.http.request(endpoint.method(), url.clone());
        if endpoint.method() == reqwest::Method::POST {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body("{}");
        }

        let call = async {
            let response = request
                .send()
                .await
                .map_err(|source| ApiError::Request { endpoint, source })?;

            let status = response.status();
            if !status.is_success() {
                return Err(ApiError::Status {
                    endpoint,
                    status: status.as_u16(),
                });
            }

            response
                .json::<T>()
                .await
                .map_err(|source| ApiError::Decode { endpoint, source })
        };

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ApiError::Cancelled { endpoint }),
            result = call => result,
        };

        match &result {
            Ok(_) => info!(%url, "loaded {}", endpoint.description()),
            Err(e) if e.is_cancelled() => warn!(%url, "request cancelled"),
            Err(e) => warn!(%url, error = %e, "request failed"),
        }
        result
    }
}
