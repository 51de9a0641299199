//! # REST Routes
//!
//! Route definitions for the REST API.
//!
//! # Route Structure
//!
//! ```text
//! /api/v1
//! ├── /health              GET  - Health check
//! ├── /quotes              POST - Generate quotes
//! ├── /vendors             GET  - List serving vendors
//! └── /pricing
//!     ├── /refresh         POST - Refresh pricing cache
//!     └── /status          GET  - Pricing cache status
//! ```

use crate::api::rest::handlers::{
    AppState, create_quotes, health_check, list_vendors, pricing_status, refresh_pricing,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

fn api_v1() -> Router<Arc<AppState>> {
    let pricing_routes = Router::new()
        .route("/refresh", post(refresh_pricing))
        .route("/status", get(pricing_status));

    Router::new()
        .route("/health", get(health_check))
        .route("/quotes", post(create_quotes))
        .route("/vendors", get(list_vendors))
        .nest("/pricing", pricing_routes)
}

/// Creates the REST API router with all endpoints.
///
/// CORS is permissive when `cors` is true and left off otherwise.
///
/// # Examples
///
/// ```ignore
/// let router = create_router(Arc::new(AppState::new(orchestrator)), true);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, router).await?;
/// ```
pub fn create_router(state: Arc<AppState>, cors: bool) -> Router {
    let router = Router::new()
        .nest("/api/v1", api_v1())
        .layer(TraceLayer::new_for_http());

    let router = if cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };
    router.with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::{
        OrchestratorConfig, PricingCache, PricingCacheConfig, QuoteOrchestrator,
    };
    use crate::domain::entities::{CrewRateRecord, PricingFeedRecord};
    use crate::domain::services::QuoteEngineRegistry;
    use crate::infrastructure::geo::InMemoryGeoResolver;
    use crate::infrastructure::persistence::InMemoryDispatcherDirectory;
    use crate::infrastructure::pricing_feed::{InMemoryPricingFeed, PricingFeed};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    fn record(name: &str) -> PricingFeedRecord {
        PricingFeedRecord {
            location_name: name.to_string(),
            default_rate: Some(Decimal::new(160, 0)),
            crew_rate_table: vec![CrewRateRecord {
                crew_size: 3,
                trucks: None,
                rate: Decimal::new(205, 0),
            }],
            ..PricingFeedRecord::default()
        }
    }

    async fn create_test_state() -> (Arc<AppState>, Arc<InMemoryPricingFeed>) {
        let feed = Arc::new(
            InMemoryPricingFeed::new()
                .with_record("Toronto", record("Toronto"))
                .with_record("Mississauga", record("Mississauga"))
                .with_record("Markham", record("Markham")),
        );
        let cache = Arc::new(PricingCache::new(
            Arc::clone(&feed) as Arc<dyn PricingFeed>,
            PricingCacheConfig::default(),
        ));
        let orchestrator = QuoteOrchestrator::new(
            Arc::new(InMemoryDispatcherDirectory::builtin().unwrap()),
            Arc::new(InMemoryGeoResolver::new()),
            cache,
            QuoteEngineRegistry::standard(),
            OrchestratorConfig::default(),
        );
        orchestrator.register_pricing_locations().await.unwrap();
        (Arc::new(AppState::new(orchestrator)), feed)
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (state, _) = create_test_state().await;
        let (status, body) = send(create_router(state, true), get_request("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn quotes_endpoint() {
        let (state, _) = create_test_state().await;
        let body = serde_json::json!({
            "origin_address": "Toronto, ON",
            "destination_address": "Mississauga, ON",
            "move_date": "2025-09-12",
            "rooms": 3
        });
        let (status, body) =
            send(create_router(state, false), post_json("/api/v1/quotes", &body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_count"], 4);
        assert_eq!(body["timed_out"], false);
        assert_eq!(body["quotes"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn quotes_validation_error() {
        let (state, _) = create_test_state().await;
        let body = serde_json::json!({
            "origin_address": "",
            "destination_address": "Mississauga, ON",
            "move_date": "2025-09-12",
            "rooms": 3
        });
        let (status, body) =
            send(create_router(state, false), post_json("/api/v1/quotes", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_quote_body_is_a_validation_error() {
        let (state, _) = create_test_state().await;
        let body = serde_json::json!({ "origin_address": "Toronto" });
        let (status, body) =
            send(create_router(state, false), post_json("/api/v1/quotes", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn vendors_endpoint() {
        let (state, _) = create_test_state().await;
        let (status, body) = send(
            create_router(state, false),
            get_request("/api/v1/vendors?origin=Oshawa%2C%20ON&destination=Toronto%2C%20ON"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_count"], 1);
        assert_eq!(body["vendors"][0]["vendor"], "easy_haul");
        assert_eq!(body["vendors"][0]["city_match"], "matched");
    }

    #[tokio::test]
    async fn vendors_requires_origin() {
        let (state, _) = create_test_state().await;
        let (status, _) = send(
            create_router(state, false),
            get_request("/api/v1/vendors?destination=Toronto"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn refresh_single_location() {
        let (state, feed) = create_test_state().await;
        let router = create_router(state, false);
        let (status, body) = send(
            router.clone(),
            post_json(
                "/api/v1/pricing/refresh",
                &serde_json::json!({ "location_key": "Toronto" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scope"], "location");
        assert_eq!(body["location_key"], "Toronto");

        feed.set_failing("Toronto", true);
        let (status, body) = send(
            router.clone(),
            post_json(
                "/api/v1/pricing/refresh",
                &serde_json::json!({ "location_key": "Toronto" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "PRICING_UNAVAILABLE");

        let (status, body) = send(
            router,
            post_json(
                "/api/v1/pricing/refresh",
                &serde_json::json!({ "location_key": "Atlantis" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn refresh_all_with_empty_body() {
        let (state, _) = create_test_state().await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/pricing/refresh")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(create_router(state, false), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scope"], "all");
        assert_eq!(body["refreshed"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn status_endpoint() {
        let (state, _) = create_test_state().await;
        let router = create_router(state, false);
        let (status, body) = send(router.clone(), get_request("/api/v1/pricing/status")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ttl_secs"], 14_400);
        assert_eq!(body["entries"]["Toronto"]["entry_present"], false);

        send(
            router.clone(),
            post_json(
                "/api/v1/pricing/refresh",
                &serde_json::json!({ "location_key": "Toronto" }),
            ),
        )
        .await;
        let (_, body) = send(router, get_request("/api/v1/pricing/status")).await;
        assert_eq!(body["entries"]["Toronto"]["entry_present"], true);
        assert_eq!(body["entries"]["Toronto"]["valid"], true);
    }
}
