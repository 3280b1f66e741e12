//! Client configuration

use crate::{ClientError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_API_URL: &str = "https://api.nexaflow.com";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request
pub const USER_AGENT: &str = "NexaFlow-Rust-Client/1.0.0";

/// What the client does with a request once it has been built
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// Build the request, then answer with locally synthesized data
    #[default]
    Simulated,
    /// Send the request and decode the server's answer
    Live,
    /// Send the request; synthesize the answer if the server cannot provide one
    LiveWithFallback,
}

impl DispatchMode {
    /// Whether requests leave the process
    pub fn sends_requests(&self) -> bool {
        !matches!(self, Self::Simulated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::Live => "live",
            Self::LiveWithFallback => "fallback",
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispatchMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "simulated" | "offline" => Ok(Self::Simulated),
            "live" => Ok(Self::Live),
            "fallback" | "live-with-fallback" => Ok(Self::LiveWithFallback),
            other => Err(ClientError::Config(format!("unknown dispatch mode: {}", other))),
        }
    }
}

/// Client configuration
///
/// Empty or zero fields are replaced with their defaults by [`Config::normalize`],
/// which [`NexaflowClient::new`](crate::NexaflowClient::new) always applies.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// API base URL
    pub api_url: String,
    /// Decentralized identifier sent with authenticated requests
    pub did: String,
    /// Signing key (stored only)
    pub private_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// How built requests are dispatched
    pub dispatch: DispatchMode,
}

impl Config {
    /// Create a new config with the given API URL
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Set the identity credentials
    pub fn with_auth(mut self, did: impl Into<String>, private_key: impl Into<String>) -> Self {
        self.did = did.into();
        self.private_key = private_key.into();
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set dispatch mode
    pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Fill in defaults and validate the API URL
    pub fn normalize(mut self) -> Result<Self> {
        let trimmed = self.api_url.trim().trim_end_matches('/');
        self.api_url = if trimmed.is_empty() {
            DEFAULT_API_URL.to_string()
        } else {
            trimmed.to_string()
        };

        if self.timeout.is_zero() {
            self.timeout = DEFAULT_TIMEOUT;
        }

        let parsed = url::Url::parse(&self.api_url)
            .map_err(|e| ClientError::Config(format!("invalid API URL {}: {}", self.api_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "unsupported URL scheme: {}",
                parsed.scheme()
            )));
        }

        Ok(self)
    }

    /// Build the full URL for an API path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}
