//! Client configuration: API URL resolution and polling/timeout knobs.
//!
//! DESIGN
//! ======
//! Two ways to find the board API are supported:
//! - derive-from-page: reuse a page URL's host, force a fixed port and `/`
//!   (works only when page and API share a host);
//! - explicit: an injected URL (`BOARDCHAT_API_URL`), independent of any page.
//!
//! The resolved [`ApiUrl`] is a plain value handed to the sync layer; nothing
//! here is global.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::fmt;
use std::time::Duration;

use reqwest::Url;

pub const DEFAULT_API_PORT: u16 = 4000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors raised while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Neither an explicit API URL nor a page URL was supplied.
    #[error("no API URL configured; pass --api-url (BOARDCHAT_API_URL) or --page-url (BOARDCHAT_PAGE_URL)")]
    MissingApiUrl,

    /// The supplied URL does not parse.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Only `http` and `https` endpoints can be polled.
    #[error("unsupported URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),

    /// A zero interval would spin the poller.
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
}

/// Where the board API URL comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiUrlSource {
    /// Same host as the page, fixed port, root path.
    DeriveFromPage { page_url: String, port: u16 },
    /// Externally injected URL, used as-is.
    Explicit(String),
}

impl ApiUrlSource {
    /// Pick a source from command-line/env options. An explicit URL wins.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiUrl`] when neither option is set.
    pub fn from_options(
        api_url: Option<String>,
        page_url: Option<String>,
        port: u16,
    ) -> Result<Self, ConfigError> {
        match (api_url, page_url) {
            (Some(url), _) => Ok(Self::Explicit(url)),
            (None, Some(page_url)) => Ok(Self::DeriveFromPage { page_url, port }),
            (None, None) => Err(ConfigError::MissingApiUrl),
        }
    }

    /// Resolve the source into a usable endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse, is not `http(s)`, or cannot
    /// carry a port.
    pub fn resolve(&self) -> Result<ApiUrl, ConfigError> {
        match self {
            Self::Explicit(raw) => ApiUrl::parse(raw),
            Self::DeriveFromPage { page_url, port } => {
                let mut url = parse_http_url(page_url)?;
                url.set_port(Some(*port)).map_err(|()| ConfigError::InvalidUrl {
                    url: page_url.clone(),
                    reason: "URL cannot carry a port".to_owned(),
                })?;
                url.set_path("/");
                url.set_query(None);
                url.set_fragment(None);
                Ok(ApiUrl(url))
            }
        }
    }
}

/// A validated absolute `http(s)` URL of the board endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Parse and validate an endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error for unparseable or non-`http(s)` URLs.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        parse_http_url(raw).map(Self)
    }

    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

fn parse_http_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_owned())),
    }
}

/// Typed client configuration threaded through sync and polling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: ApiUrl,
    pub poll_interval: Duration,
    pub connect_timeout: Duration,
    /// Per-request timeout; `None` lets a hung request run until the next
    /// poll tick supersedes it.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Config with default intervals for the given endpoint.
    #[must_use]
    pub fn new(api_url: ApiUrl) -> Self {
        Self {
            api_url,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: None,
        }
    }

    /// Override the poll interval.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPollInterval`] for a zero interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        self.poll_interval = interval;
        Ok(self)
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}
