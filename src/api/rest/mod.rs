//! # REST API
//!
//! axum endpoints over the quote orchestrator.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `POST /api/v1/quotes` - Generate quotes for a move
//! - `GET /api/v1/vendors?origin=&destination=` - Vendors serving an address
//! - `POST /api/v1/pricing/refresh` - Refresh one pricing location or all
//! - `GET /api/v1/pricing/status` - Pricing cache status
//!
//! # Usage
//!
//! ```ignore
//! use move_quote::api::rest::{AppState, create_router};
//! use std::sync::Arc;
//!
//! let router = create_router(Arc::new(AppState::new(orchestrator)), true);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, AppState, ErrorResponse, HealthResponse, RefreshPricingRequest, VendorQuery,
    VendorsResponse,
};
pub use routes::create_router;
