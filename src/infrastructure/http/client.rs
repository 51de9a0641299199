//! # HTTP Client
//!
//! Thin wrapper over `reqwest` with a fixed timeout, JSON decoding and
//! status-code mapping.
//!
//! # Examples
//!
//! ```ignore
//! use move_quote::infrastructure::http::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let response: GeocodeResponse = client
//!     .get_with_params("https://geo.example.com/geocode", &[("address", "Toronto, ON")])
//!     .await?;
//! ```

use super::error::{HttpError, HttpResult};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// JSON HTTP client with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a client with the given timeout.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> HttpResult<Self> {
        Self::build(timeout_ms, HeaderMap::new())
    }

    /// Creates a client that sends a bearer token on every request.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Internal` if the token is not a valid header value
    /// or the client cannot be created.
    pub fn with_bearer_token(timeout_ms: u64, token: &str) -> HttpResult<Self> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| HttpError::internal(format!("invalid API token: {e}")))?;
        headers.insert(AUTHORIZATION, value);
        Self::build(timeout_ms, headers)
    }

    fn build(timeout_ms: u64, headers: HeaderMap) -> HttpResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| HttpError::internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, timeout_ms })
    }

    /// Configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// GET and decode a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpError`] for transport failures, non-success statuses
    /// and undecodable bodies.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> HttpResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// GET with query parameters and decode a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpError`] for transport failures, non-success statuses
    /// and undecodable bodies.
    pub async fn get_with_params<T: DeserializeOwned, P: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
    ) -> HttpResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> HttpResult<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| HttpError::decode(format!("failed to parse response: {e}")))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(self.map_status_error(status, &body))
        }
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> HttpError {
        if error.is_timeout() {
            HttpError::timeout(format!("request timed out after {}ms", self.timeout_ms))
        } else if error.is_connect() {
            HttpError::connection(format!("connection failed: {error}"))
        } else if error.is_decode() {
            HttpError::decode(format!("failed to read response: {error}"))
        } else {
            HttpError::connection(format!("request failed: {error}"))
        }
    }

    fn map_status_error(&self, status: StatusCode, body: &str) -> HttpError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                HttpError::authentication(format!("authentication failed: {body}"))
            }
            StatusCode::NOT_FOUND => HttpError::not_found(format!("resource not found: {body}")),
            StatusCode::TOO_MANY_REQUESTS => HttpError::rate_limited("rate limit exceeded"),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                HttpError::timeout(format!("upstream timeout ({status})"))
            }
            _ => HttpError::status(status.as_u16(), body.to_string()),
        }
    }
}
