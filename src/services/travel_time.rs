//! Travel-time oracle
//!
//! Resolves duration/distance of a leg through the configured routing service
//! and memoizes the answer per `(origin, destination, mode)`. Lookups never
//! fail: any backend problem turns into a straight-line estimate at
//! [`FALLBACK_SPEED_KMH`], flagged with `is_estimated`.
//!
//! Concurrent lookups of the same key share a single in-flight backend call.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::services::geo;
use crate::services::routing::RoutingService;
use crate::types::{Coordinates, TravelEstimate, TravelMode};

/// Assumed average speed for fallback estimates
pub const FALLBACK_SPEED_KMH: f64 = 30.0;

/// Cache key. Coordinates are compared by bit pattern so the key is `Eq + Hash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct LegKey {
    origin: (u64, u64),
    destination: (u64, u64),
    mode: TravelMode,
}

impl LegKey {
    fn new(origin: &Coordinates, destination: &Coordinates, mode: TravelMode) -> Self {
        Self {
            origin: (origin.lat.to_bits(), origin.lng.to_bits()),
            destination: (destination.lat.to_bits(), destination.lng.to_bits()),
            mode,
        }
    }
}

type InFlight = Shared<BoxFuture<'static, TravelEstimate>>;

enum CacheSlot {
    Ready(TravelEstimate),
    InFlight(InFlight),
}

/// Straight-line estimate used whenever the routing service cannot answer
pub fn fallback_estimate(origin: Option<&Coordinates>, destination: Option<&Coordinates>) -> TravelEstimate {
    let distance_km = geo::distance_km(origin, destination);
    TravelEstimate {
        duration_minutes: (distance_km / FALLBACK_SPEED_KMH * 60.0).round() as u32,
        distance_km,
        is_estimated: true,
    }
}

/// Memoizing travel-time lookup shared by all itineraries of the process
pub struct TravelTimeOracle {
    routing: Arc<dyn RoutingService>,
    slots: Mutex<HashMap<LegKey, CacheSlot>>,
}

impl TravelTimeOracle {
    pub fn new(routing: Arc<dyn RoutingService>) -> Self {
        Self {
            routing,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn routing_name(&self) -> &str {
        self.routing.name()
    }

    /// Resolve one leg. Missing coordinates skip the backend and the cache.
    pub async fn resolve(
        &self,
        origin: Option<&Coordinates>,
        destination: Option<&Coordinates>,
        mode: TravelMode,
    ) -> TravelEstimate {
        let (origin, destination) = match (origin, destination) {
            (Some(o), Some(d)) if o.is_valid() && d.is_valid() => (*o, *d),
            _ => {
                debug!("Leg has missing coordinates, using fallback estimate");
                return fallback_estimate(origin, destination);
            }
        };

        let key = LegKey::new(&origin, &destination, mode);

        let pending = {
            let mut slots = self.slots.lock();
            match slots.get(&key) {
                Some(CacheSlot::Ready(estimate)) => return *estimate,
                Some(CacheSlot::InFlight(shared)) => {
                    debug!("Joining in-flight {} lookup", mode.as_str());
                    shared.clone()
                }
                None => {
                    let routing = Arc::clone(&self.routing);
                    let lookup = async move { lookup(routing, origin, destination, mode).await }
                        .boxed()
                        .shared();
                    slots.insert(key, CacheSlot::InFlight(lookup.clone()));
                    lookup
                }
            }
        };

        let estimate = pending.await;
        self.slots.lock().insert(key, CacheSlot::Ready(estimate));
        estimate
    }

    /// Peek at a completed cache entry without triggering a lookup
    pub fn cached(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        mode: TravelMode,
    ) -> Option<TravelEstimate> {
        match self.slots.lock().get(&LegKey::new(origin, destination, mode)) {
            Some(CacheSlot::Ready(estimate)) => Some(*estimate),
            _ => None,
        }
    }

    /// Number of completed cache entries
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| matches!(slot, CacheSlot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.slots.lock().clear();
    }
}

async fn lookup(
    routing: Arc<dyn RoutingService>,
    origin: Coordinates,
    destination: Coordinates,
    mode: TravelMode,
) -> TravelEstimate {
    match routing.route(&origin, &destination, mode).await {
        Ok(leg)
            if !leg.fallback
                && leg.distance_km.is_finite()
                && leg.duration_minutes.is_finite()
                && leg.distance_km >= 0.0
                && leg.duration_minutes >= 0.0 =>
        {
            debug!(
                "{} resolved {} leg: {:.1} km, {:.0} min",
                routing.name(),
                mode.as_str(),
                leg.distance_km,
                leg.duration_minutes
            );
            TravelEstimate {
                duration_minutes: leg.duration_minutes.round() as u32,
                distance_km: leg.distance_km,
                is_estimated: false,
            }
        }
        Ok(_) => {
            debug!("{} answered without a routed path, using fallback estimate", routing.name());
            fallback_estimate(Some(&origin), Some(&destination))
        }
        Err(e) => {
            warn!("{} lookup failed: {}. Using fallback estimate.", routing.name(), e);
            fallback_estimate(Some(&origin), Some(&destination))
        }
    }
}
