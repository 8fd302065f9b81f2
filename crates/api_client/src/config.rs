use reqwest::Url;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5002";

/// Primary environment variable for the KPI API base URL.
pub const BASE_URL_ENV: &str = "ERP_API_URL";
/// Name used by the legacy web dashboard build; still honoured.
pub const LEGACY_BASE_URL_ENV: &str = "REACT_APP_API_URL";

/// Where the KPI API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Loads config from env vars:
    /// - `ERP_API_URL`
    /// - `REACT_APP_API_URL` when the first is unset
    /// - default: `http://127.0.0.1:5002`
    pub fn from_env() -> Self {
        let primary = std::env::var(BASE_URL_ENV).ok();
        let legacy = std::env::var(LEGACY_BASE_URL_ENV).ok();
        Self::new(resolve_base_url(primary, legacy))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// First non-blank candidate, else the default.
pub fn resolve_base_url(primary: Option<String>, legacy: Option<String>) -> String {
    [primary, legacy]
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Parses the base URL and guarantees a trailing slash so endpoint paths join under it.
pub fn validate_base_url(base_url: &str) -> Result<Url, ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{other}'"))),
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
