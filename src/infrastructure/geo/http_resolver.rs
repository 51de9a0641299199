//! # HTTP Geo Resolver
//!
//! Adapter for an external geocoding/routing service.
//!
//! Wire format:
//!
//! - `GET {base}/geocode?address=...` → `{ "lat": f64, "lng": f64 }`
//! - `GET {base}/route?origin=...&destination=...` →
//!   `{ "distance_meters": f64, "duration_seconds": f64 }`
//!
//! Outbound calls share one rate limiter so a burst of quote requests cannot
//! exceed the provider's quota.

use super::traits::{GeoError, GeoResolver, GeoResult};
use crate::domain::value_objects::{GeoPoint, RouteMetrics};
use crate::infrastructure::http::HttpClient;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::Deserialize;
use std::fmt;
use std::num::NonZeroU32;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    distance_meters: f64,
    duration_seconds: f64,
}

/// Rate-limited HTTP geo resolver.
pub struct HttpGeoResolver {
    client: HttpClient,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
}

impl fmt::Debug for HttpGeoResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpGeoResolver")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.client.timeout_ms())
            .finish_non_exhaustive()
    }
}

impl HttpGeoResolver {
    /// Creates a resolver.
    ///
    /// `requests_per_second` of zero is treated as one.
    #[must_use]
    pub fn new(client: HttpClient, base_url: impl Into<String>, requests_per_second: u32) -> Self {
        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter: RateLimiter::direct(Quota::per_second(rate)),
        }
    }

    /// Base URL without a trailing slash.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl GeoResolver for HttpGeoResolver {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> GeoResult<GeoPoint> {
        self.limiter.until_ready().await;
        let response: GeocodeResponse = self
            .client
            .get_with_params(
                &format!("{}/geocode", self.base_url),
                &[("address", address)],
            )
            .await
            .map_err(|e| match GeoError::from(e) {
                GeoError::NotFound { .. } => GeoError::not_found(address),
                other => other,
            })?;

        debug!(lat = response.lat, lng = response.lng, "geocoded");
        GeoPoint::new(response.lat, response.lng)
            .map_err(|e| GeoError::unavailable(format!("provider returned {e}")))
    }

    #[instrument(skip(self))]
    async fn route(&self, from: &str, to: &str) -> GeoResult<RouteMetrics> {
        self.limiter.until_ready().await;
        let response: RouteResponse = self
            .client
            .get_with_params(
                &format!("{}/route", self.base_url),
                &[("origin", from), ("destination", to)],
            )
            .await
            .map_err(|e| match GeoError::from(e) {
                GeoError::NotFound { .. } => GeoError::not_found(format!("{from} -> {to}")),
                other => other,
            })?;

        if !response.distance_meters.is_finite() || !response.duration_seconds.is_finite() {
            return Err(GeoError::unavailable("provider returned a non-finite route"));
        }
        Ok(RouteMetrics::new(
            response.distance_meters,
            response.duration_seconds,
        ))
    }
}
