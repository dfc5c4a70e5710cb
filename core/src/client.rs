//! Shared request/response client for the Instagram v1 API.
//!
//! # Design
//! `Client` holds a `ClientConfig` and a `Transport` and nothing else. It
//! keeps no mutable state between calls. `new_request` and `parse_response`
//! are pure, so the I/O boundary stays explicit: `send` is the only method
//! that goes through the transport. Pagination comes back inside
//! `ApiResponse` and is not stashed on the client, so concurrent callers
//! never see each other's cursors.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::relationships::Relationships;
use crate::types::{Meta, Pagination};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A decoded API envelope.
#[derive(Debug, Clone)]
pub struct ApiResponse<D> {
    pub meta: Option<Meta>,
    pub data: D,
    /// Absent when the server attached no pagination block.
    pub pagination: Option<Pagination>,
}

#[derive(Deserialize)]
struct Envelope<D> {
    #[serde(default)]
    meta: Option<Meta>,
    data: D,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    meta: Meta,
}

#[derive(Debug, Clone)]
pub struct Client<T> {
    config: ClientConfig,
    transport: T,
}

#[cfg(feature = "ureq")]
impl Client<crate::transport::UreqTransport> {
    /// Client over a default blocking `ureq` agent.
    pub fn with_ureq(config: ClientConfig) -> Self {
        Self::new(config, crate::transport::UreqTransport::new())
    }
}

impl<T: Transport> Client<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn relationships(&self) -> Relationships<'_, T> {
        Relationships::new(self)
    }

    /// Build a request for `path`, resolved against the base URL.
    ///
    /// An absolute `path` replaces the base entirely. Credentials are added as
    /// query parameters only when the resolved URL lies under the base URL,
    /// and only if the path does not already carry them, which is the case
    /// for `next_url` locators handed out by the API.
    pub fn new_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let mut url = self.config.base_url.join(path)?;
        let under_base = url.as_str().starts_with(self.config.base_url.as_str());

        let missing: Vec<(&str, &str)> = [
            ("access_token", self.config.access_token.as_deref()),
            ("client_id", self.config.client_id.as_deref()),
        ]
        .into_iter()
        .filter(|_| under_base)
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .filter(|(key, _)| !url.query_pairs().any(|(k, _)| k == *key))
        .collect();
        if !missing.is_empty() {
            url.query_pairs_mut().extend_pairs(missing);
        }

        let mut headers = vec![("user-agent".to_string(), self.config.user_agent.clone())];
        if method == HttpMethod::Post {
            headers.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
        }

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers,
            body,
        })
    }

    /// Decode an API envelope, mapping error statuses and error metas to
    /// `ApiError`.
    pub fn parse_response<D: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<ApiResponse<D>, ApiError> {
        if !(200..300).contains(&response.status) {
            return Err(error_from_response(&response));
        }

        let envelope: Envelope<D> = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;

        if let Some(meta) = envelope.meta.as_ref().filter(|m| m.code >= 400) {
            return Err(api_error(meta));
        }

        Ok(ApiResponse {
            meta: envelope.meta,
            data: envelope.data,
            pagination: envelope.pagination,
        })
    }

    /// Execute `request` through the transport and decode the envelope.
    pub fn send<D: DeserializeOwned>(&self, request: HttpRequest) -> Result<ApiResponse<D>, ApiError> {
        debug!(method = %request.method, url = redact(&request.url), "sending request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "decoding response");
        self.parse_response(response)
    }

    /// Strip the base URL from an absolute locator so it can be fed back into
    /// `new_request`. Locators outside the base are returned unchanged.
    pub fn relative_path<'p>(&self, locator: &'p str) -> &'p str {
        locator
            .strip_prefix(self.config.base_url.as_str())
            .unwrap_or(locator)
    }
}

fn error_from_response(response: &HttpResponse) -> ApiError {
    let meta = serde_json::from_str::<ErrorEnvelope>(&response.body)
        .map(|envelope| envelope.meta)
        .or_else(|_| serde_json::from_str::<Meta>(&response.body));

    match meta {
        Ok(meta) => api_error(&meta),
        Err(_) if response.status == 404 => ApiError::NotFound,
        Err(_) => ApiError::HttpError {
            status: response.status,
            body: response.body.clone(),
        },
    }
}

fn api_error(meta: &Meta) -> ApiError {
    let error_type = meta.error_type.clone().unwrap_or_else(|| "APIError".to_string());
    let message = meta.error_message.clone().unwrap_or_default();
    warn!(code = meta.code, %error_type, %message, "API returned an error");
    ApiError::Api {
        code: meta.code,
        error_type,
        message,
    }
}

/// Drop the query string so access tokens never reach the logs.
fn redact(url: &str) -> &str {
    url.split_once('?').map_or(url, |(head, _)| head)
}
