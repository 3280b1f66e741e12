//! Main client implementation

use crate::{
    config::{self, DispatchMode},
    multipart::{self, Metadata, UploadSource},
    types::*,
    ClientError, Config, Result,
};
use chrono::Utc;
use reqwest::{header, Client, Method, Request, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Header carrying the caller's DID
pub const DID_HEADER: &str = "X-NexaFlow-DID";

/// NexaFlow storage and identity client
///
/// Operations are cancelled by dropping their future. The client can be shared
/// between tasks (e.g. behind an `Arc`); [`set_auth`](Self::set_auth) needs
/// exclusive access, so callers that mutate credentials while other calls are
/// in flight must synchronize externally.
pub struct NexaflowClient {
    config: Config,
    http: Client,
}

impl NexaflowClient {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let config = config.normalize()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::RequestConstruction)?;

        Ok(Self { config, http })
    }

    /// Create with the default API URL
    pub fn default_remote() -> Result<Self> {
        Self::new(Config::default())
    }

    /// Create with an API URL
    pub fn with_api_url(api_url: &str) -> Result<Self> {
        Self::new(Config::new(api_url))
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current DID (empty when unauthenticated)
    pub fn did(&self) -> &str {
        &self.config.did
    }

    /// Replace the stored credentials. No validation is performed.
    pub fn set_auth(&mut self, did: impl Into<String>, private_key: impl Into<String>) {
        self.config.did = did.into();
        self.config.private_key = private_key.into();
    }

    // ==================== Uploads ====================

    /// Upload a local file
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        metadata: Option<Metadata>,
    ) -> Result<UploadResult> {
        let source = UploadSource::read(path.as_ref()).await?;
        let metadata = multipart::upload_metadata(metadata, &self.config.did, Utc::now());
        let request = self.upload_request(&source, &metadata)?;

        let synthesized = UploadResult::new(
            source.cid,
            source.name,
            source.size,
            self.config.did.clone(),
        );
        self.dispatch(request, synthesized).await
    }

    // ==================== Spaces ====================

    /// Create a space
    #[instrument(skip(self))]
    pub async fn create_space(&self, name: &str, description: &str) -> Result<Space> {
        let now = Utc::now();
        let request = self.create_space_request(name, description)?;
        self.dispatch(request, Space::synthesized(name, now)).await
    }

    /// List spaces visible to the current DID
    #[instrument(skip(self))]
    pub async fn list_spaces(&self) -> Result<Vec<Space>> {
        let now = Utc::now();
        let request = self.list_spaces_request()?;
        self.dispatch(request, vec![Space::default_space(now)]).await
    }

    // ==================== Identity ====================

    /// Create a decentralized identity; an empty method means `key`
    #[instrument(skip(self))]
    pub async fn create_identity(&self, method: &str) -> Result<Identity> {
        let now = Utc::now();
        let method = if method.is_empty() {
            DEFAULT_DID_METHOD
        } else {
            method
        };
        let request = self.create_identity_request(method)?;
        self.dispatch(request, Identity::synthesized(method, now)).await
    }

    // ==================== Network ====================

    /// Get network status
    #[instrument(skip(self))]
    pub async fn get_status(&self) -> Result<NetworkStatus> {
        let request = self.status_request()?;
        self.dispatch(request, NetworkStatus::simulated()).await
    }

    // ==================== Request Builders ====================

    pub(crate) fn upload_request(&self, source: &UploadSource, metadata: &Metadata) -> Result<Request> {
        let form = multipart::upload_form(source, metadata)?;
        build(self.request(Method::POST, "/upload", true)?.multipart(form))
    }

    pub(crate) fn create_space_request(&self, name: &str, description: &str) -> Result<Request> {
        let payload = serde_json::json!({
            "name": name,
            "description": description,
            "did": self.config.did,
        });
        build(json_body(self.request(Method::POST, "/spaces", true)?, &payload)?)
    }

    pub(crate) fn list_spaces_request(&self) -> Result<Request> {
        build(self.request(Method::GET, "/spaces", true)?)
    }

    pub(crate) fn create_identity_request(&self, method: &str) -> Result<Request> {
        let payload = serde_json::json!({ "method": method });
        build(json_body(self.request(Method::POST, "/identity", false)?, &payload)?)
    }

    pub(crate) fn status_request(&self) -> Result<Request> {
        build(self.request(Method::GET, "/status", false)?)
    }

    fn request(&self, method: Method, path: &str, with_did: bool) -> Result<RequestBuilder> {
        let mut req = self
            .http
            .request(method, self.config.endpoint(path))
            .header(header::USER_AGENT, config::USER_AGENT);

        if with_did && !self.config.did.is_empty() {
            let value = header::HeaderValue::from_str(&self.config.did)
                .map_err(|_| ClientError::InvalidHeader { name: DID_HEADER })?;
            req = req.header(DID_HEADER, value);
        }

        Ok(req)
    }

    // ==================== Dispatch ====================

    async fn dispatch<T: DeserializeOwned>(&self, request: Request, synthesized: T) -> Result<T> {
        debug!("Built {} request to {}", request.method(), request.url());

        match self.config.dispatch {
            DispatchMode::Simulated => {
                debug!("Simulated dispatch, request not sent");
                Ok(synthesized)
            }
            DispatchMode::Live => self.send(request).await,
            DispatchMode::LiveWithFallback => match self.send(request).await {
                Err(e) if e.is_transport() => {
                    warn!("Request failed ({}), using synthesized response", e);
                    Ok(synthesized)
                }
                other => other,
            },
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        debug!("Sending {} request to {}", request.method(), request.url());
        let response = self
            .http
            .execute(request)
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(ClientError::Transport)?;
        serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

fn json_body<T: Serialize>(builder: RequestBuilder, payload: &T) -> Result<RequestBuilder> {
    let body = serde_json::to_vec(payload)?;
    Ok(builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(body))
}

fn build(builder: RequestBuilder) -> Result<Request> {
    builder.build().map_err(ClientError::RequestConstruction)
}
