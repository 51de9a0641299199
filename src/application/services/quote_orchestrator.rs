//! # Quote Orchestrator
//!
//! Entry point for quote generation and the other public operations.
//!
//! For each vendor in the directory a task selects the serving dispatcher,
//! resolves travel, loads the pricing snapshot when the vendor needs one and
//! runs the vendor's strategy. The tasks share one [`Pickup`], so the pickup
//! address is geocoded once per request. Tasks run concurrently in a
//! [`JoinSet`] under one deadline; when it passes, unfinished tasks are
//! aborted and the batch holds whatever completed. A failing vendor is logged and left out of the
//! batch without affecting the others.
//!
//! # Examples
//!
//! ```ignore
//! let orchestrator = QuoteOrchestrator::new(
//!     directory,
//!     geo,
//!     cache,
//!     QuoteEngineRegistry::standard(),
//!     OrchestratorConfig::with_deadline(Duration::from_secs(30)),
//! );
//! let batch = orchestrator.generate(&request).await?;
//! println!("{} quotes in {} ms", batch.total_count, batch.elapsed_ms);
//! ```

use crate::application::error::{ApplicationError, ApplicationResult, DispatchError, QuoteError};
use crate::application::services::dispatch_selector::{
    CityMatch, DispatchSelection, GeographicDispatchSelector, Pickup,
};
use crate::application::services::pricing_cache::{CacheStatus, PricingCache, RefreshReport};
use crate::application::services::travel::TravelResolver;
use crate::domain::entities::{QuoteRequest, QuoteResult};
use crate::domain::services::{QuoteContext, QuoteEngineRegistry};
use crate::domain::value_objects::{
    LocationId, LocationKey, RequestId, RouteMetrics, Timestamp, TravelMetrics, VendorId,
};
use crate::infrastructure::geo::GeoResolver;
use crate::infrastructure::notifications::QuoteResultPublisher;
use crate::infrastructure::persistence::DispatcherDirectory;
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{self, JoinSet};
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Default global deadline for one `generate` call.
pub const DEFAULT_DEADLINE_MS: u64 = 30_000;

// ============================================================================
// Configuration
// ============================================================================

/// Orchestrator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Global deadline for quote generation.
    pub deadline: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_millis(DEFAULT_DEADLINE_MS),
        }
    }
}

impl OrchestratorConfig {
    /// Creates a configuration with the given deadline.
    #[must_use]
    pub fn with_deadline(deadline: Duration) -> Self {
        Self { deadline }
    }
}

// ============================================================================
// Results
// ============================================================================

/// A vendor left out of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorFailure {
    /// Vendor.
    pub vendor: VendorId,
    /// Failure class (`route_unresolvable`, `pricing_unavailable`, ...).
    pub kind: String,
    /// Error message.
    pub message: String,
}

/// Outcome of one `generate` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteBatch {
    /// Request the batch answers.
    pub request_id: RequestId,
    /// Priced and rejected results, ordered by vendor.
    pub quotes: Vec<QuoteResult>,
    /// Number of results in `quotes`.
    pub total_count: usize,
    /// When the batch was assembled.
    pub generated_at: Timestamp,
    /// Wall time spent.
    pub elapsed_ms: u64,
    /// Vendors a task was started for.
    pub vendors_attempted: usize,
    /// Vendors that failed or did not finish; not-served vendors are not
    /// failures.
    pub vendors_failed: Vec<VendorFailure>,
    /// Whether the deadline cut the batch short.
    pub timed_out: bool,
}

impl QuoteBatch {
    /// Priced results only.
    pub fn priced(&self) -> impl Iterator<Item = &QuoteResult> {
        self.quotes.iter().filter(|q| q.is_quoted())
    }
}

/// A vendor able to serve a pickup address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorInfo {
    /// Vendor.
    pub vendor: VendorId,
    /// Vendor display name.
    pub vendor_name: String,
    /// Selected dispatcher.
    pub dispatcher_id: LocationId,
    /// Dispatcher display name.
    pub dispatcher_name: String,
    /// Dispatcher to pickup, great-circle km.
    pub distance_km: f64,
    /// City the pickup resolved to.
    pub city: String,
    /// How the city was determined.
    pub city_match: CityMatch,
    /// Whether the vendor prices from the dynamic feed.
    pub dynamic_pricing: bool,
    /// Whether pickup to dropoff is within the vendor's ceilings; `None`
    /// when the route could not be resolved.
    pub route_within_limits: Option<bool>,
}

/// Result of a single-location refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationRefresh {
    /// Location key.
    pub location_key: LocationKey,
    /// When the new snapshot was fetched.
    pub fetched_at: Timestamp,
    /// Day rates in the new snapshot.
    pub day_rate_count: usize,
}

/// Result of `refresh_pricing_cache`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// One location was refreshed.
    Location(LocationRefresh),
    /// Every known location was refreshed.
    All(RefreshReport),
}

// ============================================================================
// Vendor pipeline
// ============================================================================

#[derive(Debug)]
struct VendorPipeline {
    selector: GeographicDispatchSelector,
    travel: TravelResolver,
    cache: Arc<PricingCache>,
    engines: QuoteEngineRegistry,
}

impl VendorPipeline {
    async fn quote(
        &self,
        vendor: VendorId,
        request: &QuoteRequest,
        pickup: &Pickup,
    ) -> Result<QuoteResult, QuoteError> {
        let engine = self
            .engines
            .get(vendor)
            .ok_or_else(|| QuoteError::calculation_fault(vendor, "no pricing strategy"))?;

        let DispatchSelection { location, .. } =
            self.selector.select_for(vendor, pickup).await?;
        let travel = self.travel.resolve(&location, request).await?;

        let ctx = QuoteContext::new(request, &location, &travel);
        if let Some((reason, message)) = engine.limits().violation(&travel) {
            debug!(vendor = %vendor, %reason, "route exceeds vendor ceiling");
            return Ok(ctx.reject(reason, message));
        }

        let snapshot = if engine.requires_pricing_snapshot() {
            if location.pricing_key().is_empty() {
                return Err(QuoteError::MissingSnapshot { vendor });
            }
            Some(self.cache.get(location.pricing_key()).await?)
        } else {
            None
        };
        let ctx = match snapshot.as_deref() {
            Some(snapshot) => ctx.with_snapshot(snapshot),
            None => ctx,
        };

        engine
            .calculate(&ctx)
            .map_err(|e| QuoteError::calculation_fault(vendor, e.to_string()))
    }

    async fn travel_route(&self, origin: &str, destination: &str) -> Option<RouteMetrics> {
        match self.travel.route_between(origin, destination).await {
            Ok(route) => Some(route),
            Err(e) => {
                debug!(error = %e, "route unavailable for vendor listing");
                None
            }
        }
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Concurrent multi-vendor quoting.
#[derive(Debug, Clone)]
pub struct QuoteOrchestrator {
    directory: Arc<dyn DispatcherDirectory>,
    pipeline: Arc<VendorPipeline>,
    publisher: Option<Arc<dyn QuoteResultPublisher>>,
    config: OrchestratorConfig,
}

impl QuoteOrchestrator {
    /// Creates an orchestrator.
    #[must_use]
    pub fn new(
        directory: Arc<dyn DispatcherDirectory>,
        geo: Arc<dyn GeoResolver>,
        cache: Arc<PricingCache>,
        engines: QuoteEngineRegistry,
        config: OrchestratorConfig,
    ) -> Self {
        let pipeline = VendorPipeline {
            selector: GeographicDispatchSelector::new(Arc::clone(&directory), Arc::clone(&geo)),
            travel: TravelResolver::new(geo),
            cache,
            engines,
        };
        Self {
            directory,
            pipeline: Arc::new(pipeline),
            publisher: None,
            config,
        }
    }

    /// Hands every batch to `publisher` after it is assembled.
    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn QuoteResultPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Returns the pricing cache.
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &Arc<PricingCache> {
        &self.pipeline.cache
    }

    /// Registers the directory's pricing locations with the cache so they
    /// show up in status reports and periodic refreshes.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Directory` if the directory fails.
    pub async fn register_pricing_locations(&self) -> ApplicationResult<usize> {
        let keys = self.directory.pricing_keys().await?;
        let count = keys.len();
        self.pipeline.cache.register(keys);
        info!(locations = count, "pricing locations registered");
        Ok(count)
    }

    /// Quotes every vendor serving the request.
    ///
    /// Never fails because of a single vendor; an empty batch is a valid
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid request and
    /// `ApplicationError::Directory` if the vendor list cannot be read.
    #[instrument(skip(self, request), fields(request_id = %request.id))]
    pub async fn generate(&self, request: &QuoteRequest) -> ApplicationResult<QuoteBatch> {
        request.validate()?;
        let started = Instant::now();
        let deadline = started + self.config.deadline;

        let vendors = self.directory.vendors().await?;
        let request = Arc::new(request.clone());
        let pickup = Arc::new(Pickup::new(request.origin_address.as_str()));

        let mut tasks = JoinSet::new();
        let mut pending: HashMap<task::Id, VendorId> = HashMap::with_capacity(vendors.len());
        for vendor in vendors.iter().copied() {
            let pipeline = Arc::clone(&self.pipeline);
            let request = Arc::clone(&request);
            let pickup = Arc::clone(&pickup);
            let handle = tasks.spawn(async move {
                (vendor, pipeline.quote(vendor, &request, &pickup).await)
            });
            pending.insert(handle.id(), vendor);
        }

        let mut quotes = Vec::with_capacity(vendors.len());
        let mut failures = Vec::new();
        let mut timed_out = false;

        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next_with_id()).await {
                Ok(Some(Ok((id, (vendor, outcome))))) => {
                    pending.remove(&id);
                    match outcome {
                        Ok(result) => quotes.push(result),
                        Err(e) if e.is_not_served() => {
                            debug!(vendor = %vendor, error = %e, "vendor does not serve request");
                        }
                        Err(e) => {
                            warn!(
                                vendor = %vendor,
                                request_id = %request.id,
                                kind = e.kind(),
                                error = %e,
                                "vendor excluded from batch"
                            );
                            failures.push(VendorFailure {
                                vendor,
                                kind: e.kind().to_string(),
                                message: e.to_string(),
                            });
                        }
                    }
                }
                Ok(Some(Err(join_error))) => {
                    let vendor = pending.remove(&join_error.id());
                    error!(
                        vendor = ?vendor,
                        request_id = %request.id,
                        error = %join_error,
                        "vendor task failed"
                    );
                    if let Some(vendor) = vendor {
                        failures.push(VendorFailure {
                            vendor,
                            kind: "task_failed".to_string(),
                            message: join_error.to_string(),
                        });
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    timed_out = true;
                    tasks.abort_all();
                    break;
                }
            }
        }

        if timed_out {
            let mut unfinished: Vec<VendorId> = pending.into_values().collect();
            unfinished.sort();
            warn!(
                request_id = %request.id,
                unfinished = ?unfinished,
                deadline_ms = self.config.deadline.as_millis(),
                "quote deadline reached, returning partial batch"
            );
            failures.extend(unfinished.into_iter().map(|vendor| VendorFailure {
                vendor,
                kind: "deadline_exceeded".to_string(),
                message: "did not finish before the deadline".to_string(),
            }));
        }

        quotes.sort_by_key(QuoteResult::vendor);
        failures.sort_by_key(|f| f.vendor);
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            quotes = quotes.len(),
            failed = failures.len(),
            timed_out,
            elapsed_ms,
            "quote batch assembled"
        );

        let batch = QuoteBatch {
            request_id: request.id,
            total_count: quotes.len(),
            quotes,
            generated_at: Timestamp::now(),
            elapsed_ms,
            vendors_attempted: vendors.len(),
            vendors_failed: failures,
            timed_out,
        };
        self.publish(request, &batch);
        Ok(batch)
    }

    fn publish(&self, request: Arc<QuoteRequest>, batch: &QuoteBatch) {
        let Some(publisher) = self.publisher.clone() else {
            return;
        };
        if batch.quotes.is_empty() {
            return;
        }
        let quotes = batch.quotes.clone();
        tokio::spawn(async move {
            if let Err(e) = publisher.publish(&request, &quotes).await {
                warn!(request_id = %request.id, error = %e, "quote batch publish failed");
            }
        });
    }

    /// Vendors able to serve a pickup address.
    ///
    /// Vendors that do not serve the address, or whose dispatcher cannot be
    /// located, are omitted. The call is bounded by the generation deadline;
    /// on expiry an empty list is returned.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank addresses and
    /// `ApplicationError::Directory` if the directory fails.
    #[instrument(skip(self))]
    pub async fn list_serving_vendors(
        &self,
        origin: &str,
        destination: &str,
    ) -> ApplicationResult<Vec<VendorInfo>> {
        if origin.trim().is_empty() || destination.trim().is_empty() {
            return Err(ApplicationError::validation(
                "origin and destination are required",
            ));
        }

        match tokio::time::timeout(self.config.deadline, self.serving_vendors(origin, destination))
            .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!("listing serving vendors timed out");
                Ok(Vec::new())
            }
        }
    }

    async fn serving_vendors(
        &self,
        origin: &str,
        destination: &str,
    ) -> ApplicationResult<Vec<VendorInfo>> {
        let vendors = self.directory.vendors().await?;
        let pipeline = &self.pipeline;
        let pickup = &Pickup::new(origin);

        let route = pipeline.travel_route(origin, destination);
        let selections = join_all(vendors.iter().map(|&vendor| async move {
            (vendor, pipeline.selector.select_for(vendor, pickup).await)
        }));
        let (route, selections) = tokio::join!(route, selections);
        let route = route.map(TravelMetrics::one_leg);

        let mut served = Vec::new();
        for (vendor, selection) in selections {
            let selection = match selection {
                Ok(selection) => selection,
                Err(DispatchError::Directory(e)) => {
                    return Err(e.into());
                }
                Err(e) => {
                    debug!(vendor = %vendor, error = %e, "vendor not listed");
                    continue;
                }
            };
            let route_within_limits = match (&route, pipeline.engines.get(vendor)) {
                (Some(travel), Some(engine)) => Some(engine.limits().permits(travel)),
                _ => None,
            };
            served.push(VendorInfo {
                vendor,
                vendor_name: vendor.display_name().to_string(),
                dispatcher_id: selection.location.id(),
                dispatcher_name: selection.location.name().to_string(),
                distance_km: selection.distance_km,
                city: selection.city,
                city_match: selection.city_match,
                dynamic_pricing: vendor.uses_dynamic_pricing(),
                route_within_limits,
            });
        }
        Ok(served)
    }

    /// Refreshes one pricing location, or all of them.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::NotFound` for a key the cache does not know
    /// - `ApplicationError::Pricing` if a single-location refresh fails
    #[instrument(skip(self))]
    pub async fn refresh_pricing_cache(
        &self,
        location_key: Option<LocationKey>,
    ) -> ApplicationResult<RefreshOutcome> {
        let cache = &self.pipeline.cache;
        match location_key {
            Some(key) => {
                if !cache.is_known(&key) {
                    return Err(ApplicationError::not_found("PricingLocation", key.as_str()));
                }
                let entry = cache.refresh(&key).await?;
                Ok(RefreshOutcome::Location(LocationRefresh {
                    location_key: key,
                    fetched_at: entry.fetched_at(),
                    day_rate_count: entry.snapshot().day_rates().len(),
                }))
            }
            None => Ok(RefreshOutcome::All(cache.refresh_all().await)),
        }
    }

    /// Age and validity of every known pricing location.
    #[must_use]
    pub fn cache_status(&self) -> CacheStatus {
        self.pipeline.cache.status()
    }
}
