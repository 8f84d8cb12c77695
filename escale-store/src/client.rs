//! HTTP client for the upstream REST API.

use escale_core::CoreError;
use escale_shared::{ApiEnvelope, Pagination};
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::app_config::UpstreamConfig;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid upstream base url: {0}")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Thin wrapper around `reqwest` that speaks the upstream envelope
/// `{success, data, pagination?, message?}`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(config.base_url.clone()));
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            api_token: config.api_token.clone(),
        })
    }

    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET with query parameters; returns the payload and pagination block.
    pub async fn get<Q, R>(&self, path: &str, query: &Q) -> Result<(R, Option<Pagination>), CoreError>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let envelope = self.send::<(), R, Q>(Method::GET, path, Some(query), None).await?;
        let pagination = envelope.pagination.clone();
        Ok((require_data(envelope, path)?, pagination))
    }

    pub async fn post<T, R>(&self, path: &str, body: &T) -> Result<R, CoreError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let envelope = self.send::<T, R, ()>(Method::POST, path, None, Some(body)).await?;
        require_data(envelope, path)
    }

    pub async fn put<T, R>(&self, path: &str, body: &T) -> Result<R, CoreError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let envelope = self.send::<T, R, ()>(Method::PUT, path, None, Some(body)).await?;
        require_data(envelope, path)
    }

    pub async fn patch<T, R>(&self, path: &str, body: &T) -> Result<R, CoreError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let envelope = self.send::<T, R, ()>(Method::PATCH, path, None, Some(body)).await?;
        require_data(envelope, path)
    }

    pub async fn delete(&self, path: &str) -> Result<(), CoreError> {
        self.send::<(), serde_json::Value, ()>(Method::DELETE, path, None, None).await?;
        Ok(())
    }

    async fn send<T, R, Q>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&T>,
    ) -> Result<ApiEnvelope<R>, CoreError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint_url(path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        if let Some(q) = query {
            request = request.query(q);
        }
        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await.map_err(|e| {
            warn!("{} {} unreachable: {}", method, url, e);
            CoreError::NetworkError(e.to_string())
        })?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CoreError::NetworkError(e.to_string()))?;

        if status == StatusCode::NO_CONTENT || (status.is_success() && text.trim().is_empty()) {
            return Ok(ApiEnvelope {
                success: true,
                data: None,
                pagination: None,
                message: None,
                error: None,
                fallback: false,
            });
        }

        match serde_json::from_str::<ApiEnvelope<R>>(&text) {
            Ok(envelope) if status.is_success() && envelope.success => Ok(envelope),
            Ok(envelope) => {
                let message = envelope
                    .failure_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| default_message(status));
                Err(status_error(status, message))
            }
            Err(e) if status.is_success() => {
                warn!("{} {} returned an unreadable body: {}", method, url, e);
                Err(CoreError::InternalError(format!("Invalid API response from {}: {}", path, e)))
            }
            Err(_) => Err(status_error(status, extract_message(&text).unwrap_or_else(|| default_message(status)))),
        }
    }
}

fn require_data<R>(envelope: ApiEnvelope<R>, path: &str) -> Result<R, CoreError> {
    envelope
        .data
        .ok_or_else(|| CoreError::InternalError(format!("Missing data in response from {}", path)))
}

fn status_error(status: StatusCode, message: String) -> CoreError {
    if status == StatusCode::NOT_FOUND {
        CoreError::NotFound(message)
    } else {
        CoreError::UpstreamError { status: status.as_u16(), message }
    }
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

/// Error bodies that are not envelopes but still carry `{"message": ...}`.
fn extract_message(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
