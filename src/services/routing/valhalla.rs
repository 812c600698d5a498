//! Valhalla routing engine client
//!
//! Valhalla API documentation:
//! https://valhalla.github.io/valhalla/api/turn-by-turn/api-reference/

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{RouteLeg, RoutingService};
use crate::types::{Coordinates, TravelMode};

/// Valhalla client configuration
#[derive(Debug, Clone)]
pub struct ValhallaConfig {
    /// Base URL of Valhalla server (e.g., "http://localhost:8002")
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ValhallaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8002".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl ValhallaConfig {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_seconds,
        }
    }
}

/// Valhalla routing client
pub struct ValhallaClient {
    client: Client,
    config: ValhallaConfig,
}

impl ValhallaClient {
    pub fn new(config: ValhallaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn build_route_request(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        mode: TravelMode,
    ) -> RouteRequest {
        let location = |c: &Coordinates| ValhallaLocation {
            lat: c.lat,
            lon: c.lng,
            // Place coordinates from the search provider may sit off the
            // road network (building centroid vs road edge)
            radius: Some(200),
        };

        RouteRequest {
            locations: vec![location(origin), location(destination)],
            costing: costing_for(mode).to_string(),
            units: "kilometers".to_string(),
            directions_type: "none".to_string(),
        }
    }
}

/// Valhalla costing model for a travel mode
fn costing_for(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Driving => "auto",
        TravelMode::Transit => "multimodal",
    }
}

#[async_trait]
impl RoutingService for ValhallaClient {
    async fn route(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        mode: TravelMode,
    ) -> Result<RouteLeg> {
        let request = self.build_route_request(origin, destination, mode);
        let url = format!("{}/route", self.config.base_url);

        debug!("Requesting {} route from Valhalla", request.costing);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send route request to Valhalla")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Valhalla route returned error {}: {}", status, body);
        }

        let route_response: RouteResponse = response
            .json()
            .await
            .context("Failed to parse Valhalla route response")?;

        let summary = route_response.trip.summary;

        Ok(RouteLeg {
            distance_km: summary.length,
            duration_minutes: summary.time / 60.0,
            traffic_aware: false,
            fallback: false,
        })
    }

    fn name(&self) -> &str {
        "Valhalla"
    }
}

// Valhalla API types

#[derive(Debug, Serialize, Clone)]
struct ValhallaLocation {
    lat: f64,
    lon: f64,
    /// Radius in meters for snapping to roads
    #[serde(skip_serializing_if = "Option::is_none")]
    radius: Option<u32>,
}

#[derive(Debug, Serialize)]
struct RouteRequest {
    locations: Vec<ValhallaLocation>,
    costing: String,
    units: String,
    directions_type: String,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    trip: Trip,
}

#[derive(Debug, Deserialize)]
struct Trip {
    summary: Summary,
}

#[derive(Debug, Deserialize)]
struct Summary {
    /// Distance in kilometers (when units="kilometers")
    length: f64,
    /// Time in seconds
    time: f64,
}
