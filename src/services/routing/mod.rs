//! Routing service for single-leg travel time lookups
//!
//! Backends: the trip routes proxy, Valhalla, or offline (always fails, so the
//! travel-time oracle answers from its straight-line fallback).

mod routes_api;
mod valhalla;

pub use routes_api::{RoutesApiClient, RoutesApiConfig};
pub use valhalla::{ValhallaClient, ValhallaConfig};

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::{Coordinates, TravelMode};

/// Answer of a routing backend for one leg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLeg {
    pub distance_km: f64,
    pub duration_minutes: f64,
    #[serde(default)]
    pub traffic_aware: bool,
    /// Set by backends that answered with their own estimate instead of a
    /// routed path
    #[serde(default)]
    pub fallback: bool,
}

/// Routing service trait for abstraction (routes proxy, Valhalla, offline)
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Route a single leg. Any error is recoverable for the caller.
    async fn route(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        mode: TravelMode,
    ) -> Result<RouteLeg>;

    /// Get service name for logging
    fn name(&self) -> &str;
}

/// Backend that never answers. Every lookup ends in the fallback estimate.
#[derive(Debug, Default)]
pub struct OfflineRouting;

#[async_trait]
impl RoutingService for OfflineRouting {
    async fn route(
        &self,
        _origin: &Coordinates,
        _destination: &Coordinates,
        _mode: TravelMode,
    ) -> Result<RouteLeg> {
        anyhow::bail!("routing service not configured")
    }

    fn name(&self) -> &str {
        "Offline"
    }
}

/// Which routing backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingBackend {
    Routes,
    Valhalla,
    Offline,
}

impl std::str::FromStr for RoutingBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "routes" => Ok(RoutingBackend::Routes),
            "valhalla" => Ok(RoutingBackend::Valhalla),
            "offline" | "none" => Ok(RoutingBackend::Offline),
            other => anyhow::bail!("unknown routing backend '{}'", other),
        }
    }
}

/// Routing backend selection
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    pub backend: RoutingBackend,
    pub base_url: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            backend: RoutingBackend::Offline,
            base_url: None,
            timeout_seconds: 10,
        }
    }
}

/// Create routing service based on configuration.
///
/// Falls back to [`OfflineRouting`] when the backend needs a URL that is not
/// configured, when the HTTP client cannot be built, or when Valhalla fails
/// its health check.
pub async fn create_routing_service_with_fallback(config: &RoutingConfig) -> Arc<dyn RoutingService> {
    let url = match (config.backend, config.base_url.as_deref()) {
        (RoutingBackend::Offline, _) => {
            info!("Using offline routing (straight-line estimates only)");
            return Arc::new(OfflineRouting);
        }
        (_, None) => {
            warn!("Routing backend {:?} has no URL configured. Falling back to offline routing.", config.backend);
            return Arc::new(OfflineRouting);
        }
        (_, Some(url)) => url,
    };

    match config.backend {
        RoutingBackend::Routes => {
            match RoutesApiClient::new(RoutesApiConfig::new(url, config.timeout_seconds)) {
                Ok(client) => {
                    info!("Routes proxy configured at {}", url);
                    Arc::new(client)
                }
                Err(e) => {
                    warn!("Cannot build routes proxy client: {}. Falling back to offline routing.", e);
                    Arc::new(OfflineRouting)
                }
            }
        }
        RoutingBackend::Valhalla => {
            if let Err(e) = check_valhalla_health(url).await {
                warn!("Valhalla not available at {}: {}. Falling back to offline routing.", url, e);
                return Arc::new(OfflineRouting);
            }
            match ValhallaClient::new(ValhallaConfig::new(url, config.timeout_seconds)) {
                Ok(client) => {
                    info!("Valhalla routing service available at {}", url);
                    Arc::new(client)
                }
                Err(e) => {
                    warn!("Cannot build Valhalla client: {}. Falling back to offline routing.", e);
                    Arc::new(OfflineRouting)
                }
            }
        }
        RoutingBackend::Offline => Arc::new(OfflineRouting),
    }
}

/// Check if Valhalla is healthy by making a simple status request
async fn check_valhalla_health(base_url: &str) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;

    let url = format!("{}/status", base_url);
    let response = client.get(&url).send().await?;

    if response.status().is_success() {
        Ok(())
    } else {
        anyhow::bail!("Valhalla returned status {}", response.status())
    }
}
