//! # REST Handlers
//!
//! Request handlers for the quote, vendor and pricing endpoints.
//!
//! # Endpoints
//!
//! - `POST /api/v1/quotes` - Quote every serving vendor
//! - `GET /api/v1/vendors?origin=&destination=` - List serving vendors
//! - `POST /api/v1/pricing/refresh` - Refresh one pricing location or all
//! - `GET /api/v1/pricing/status` - Pricing cache status
//! - `GET /api/v1/health` - Health check

use crate::application::error::ApplicationError;
use crate::application::services::{
    CacheStatus, QuoteBatch, QuoteOrchestrator, RefreshOutcome, VendorInfo,
};
use crate::domain::entities::QuoteRequest;
use crate::domain::value_objects::LocationKey;
use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for REST handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Quote orchestrator.
    pub orchestrator: QuoteOrchestrator,
}

impl AppState {
    /// Wraps an orchestrator.
    #[must_use]
    pub fn new(orchestrator: QuoteOrchestrator) -> Self {
        Self { orchestrator }
    }
}

// ============================================================================
// Error Response
// ============================================================================

/// Standard error response format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Creates a new error response.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates an error response with details.
    #[must_use]
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl From<ApplicationError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ApplicationError) -> Self {
        let (status, code) = if err.is_validation() {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        } else if err.is_not_found() {
            (StatusCode::NOT_FOUND, "NOT_FOUND")
        } else if err.is_pricing_unavailable() {
            (StatusCode::BAD_GATEWAY, "PRICING_UNAVAILABLE")
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        };

        let response = match &err {
            ApplicationError::Pricing(e) => ErrorResponse::with_details(
                code,
                err.to_string(),
                serde_json::json!({
                    "location_key": e.key(),
                    "retryable": e.is_retryable(),
                }),
            ),
            _ => ErrorResponse::new(code, err.to_string()),
        };
        (status, Json(response))
    }
}

// ============================================================================
// Quotes
// ============================================================================

/// Quote every vendor serving the move.
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` for a malformed body or an invalid request.
/// Returns `INTERNAL_ERROR` if the dispatcher directory is unreachable.
#[instrument(skip(state, body))]
pub async fn create_quotes(
    State(state): State<Arc<AppState>>,
    body: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteBatch>, ApiError> {
    let Json(request) = body.map_err(|e| validation_error(&e.body_text()))?;
    info!(request_id = %request.id, rooms = request.rooms, "generating quotes");

    let batch = state.orchestrator.generate(&request).await.map_err(|e| {
        if !e.is_validation() {
            error!(request_id = %request.id, error = %e, "quote generation failed");
        }
        ApiError::from(e)
    })?;
    Ok(Json(batch))
}

// ============================================================================
// Vendors
// ============================================================================

/// Query parameters for the vendor listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorQuery {
    /// Pickup address.
    #[serde(default)]
    pub origin: String,
    /// Dropoff address.
    #[serde(default)]
    pub destination: String,
}

/// Vendor listing response.
#[derive(Debug, Clone, Serialize)]
pub struct VendorsResponse {
    /// Serving vendors.
    pub vendors: Vec<VendorInfo>,
    /// Number of vendors.
    pub total_count: usize,
}

/// List vendors able to serve a pickup address.
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` if either address is missing.
#[instrument(skip(state))]
pub async fn list_vendors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VendorQuery>,
) -> Result<Json<VendorsResponse>, ApiError> {
    let vendors = state
        .orchestrator
        .list_serving_vendors(&query.origin, &query.destination)
        .await?;
    Ok(Json(VendorsResponse {
        total_count: vendors.len(),
        vendors,
    }))
}

// ============================================================================
// Pricing
// ============================================================================

/// Body of a refresh request; an empty body refreshes every location.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshPricingRequest {
    /// Location to refresh.
    #[serde(default)]
    pub location_key: Option<LocationKey>,
}

/// Refresh one pricing location, or all of them.
///
/// # Errors
///
/// Returns `NOT_FOUND` for an unknown location key.
/// Returns `PRICING_UNAVAILABLE` if a single-location refresh fails.
#[instrument(skip(state, body))]
pub async fn refresh_pricing(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<RefreshOutcome>, ApiError> {
    let request = parse_refresh_request(&body)?;
    let outcome = state
        .orchestrator
        .refresh_pricing_cache(request.location_key)
        .await
        .map_err(|e| {
            warn!(error = %e, "pricing refresh failed");
            ApiError::from(e)
        })?;
    Ok(Json(outcome))
}

/// Pricing cache status.
#[instrument(skip(state))]
pub async fn pricing_status(State(state): State<Arc<AppState>>) -> Json<CacheStatus> {
    Json(state.orchestrator.cache_status())
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_refresh_request(body: &[u8]) -> Result<RefreshPricingRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RefreshPricingRequest::default());
    }
    let request: RefreshPricingRequest = serde_json::from_slice(body)
        .map_err(|e| validation_error(&format!("invalid refresh request: {e}")))?;
    if request.location_key.as_ref().is_some_and(LocationKey::is_empty) {
        return Err(validation_error("location_key cannot be empty"));
    }
    Ok(request)
}

fn validation_error(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("VALIDATION_ERROR", message)),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::error::PricingError;
    use crate::domain::errors::DomainError;

    #[test]
    fn error_response_new() {
        let err = ErrorResponse::new("NOT_FOUND", "missing");
        assert_eq!(err.code, "NOT_FOUND");
        assert!(err.details.is_none());
    }

    #[test]
    fn application_errors_map_to_status() {
        let cases = [
            (
                ApplicationError::validation("bad"),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                ApplicationError::Domain(DomainError::invalid_request("blank origin")),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                ApplicationError::not_found("PricingLocation", "Atlantis"),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                ApplicationError::Pricing(PricingError::unavailable("Toronto", "feed down")),
                StatusCode::BAD_GATEWAY,
                "PRICING_UNAVAILABLE",
            ),
            (
                ApplicationError::internal("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            let (got_status, Json(body)) = ApiError::from(err);
            assert_eq!(got_status, status);
            assert_eq!(body.code, code);
        }
    }

    #[test]
    fn pricing_errors_carry_details() {
        let (_, Json(body)) =
            ApiError::from(ApplicationError::Pricing(PricingError::unavailable("Toronto", "x")));
        let details = body.details.unwrap();
        assert_eq!(details["location_key"], "Toronto");
    }

    #[test]
    fn refresh_body_parsing() {
        assert!(parse_refresh_request(b"").unwrap().location_key.is_none());
        assert!(parse_refresh_request(b"  \n").unwrap().location_key.is_none());
        assert!(parse_refresh_request(b"{}").unwrap().location_key.is_none());
        assert_eq!(
            parse_refresh_request(br#"{"location_key":"Toronto"}"#)
                .unwrap()
                .location_key,
            Some(LocationKey::new("Toronto"))
        );
        assert!(parse_refresh_request(br#"{"location_key":""}"#).is_err());
        assert!(parse_refresh_request(b"not json").is_err());
    }

    #[tokio::test]
    async fn health_check_returns_healthy() {
        let response = health_check().await;
        assert_eq!(response.status, "healthy");
    }
}
