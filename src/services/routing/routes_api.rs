//! Client for the trip backend's routes proxy.
//!
//! `GET {base}/api/routes/compute?originLat&originLng&destLat&destLng&travelMode`
//! answers `{distance, duration, travelMode, fallback, trafficAware}` with the
//! distance in kilometers and the duration in minutes.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{RouteLeg, RoutingService};
use crate::types::{Coordinates, TravelMode};

#[derive(Debug, Clone)]
pub struct RoutesApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl RoutesApiConfig {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_seconds,
        }
    }
}

pub struct RoutesApiClient {
    client: Client,
    config: RoutesApiConfig,
}

impl RoutesApiClient {
    pub fn new(config: RoutesApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn compute_url(&self) -> String {
        format!("{}/api/routes/compute", self.config.base_url)
    }
}

/// Travel mode name understood by the proxy
fn proxy_travel_mode(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Driving => "DRIVE",
        TravelMode::Transit => "TRANSIT",
    }
}

fn query_params(origin: &Coordinates, destination: &Coordinates, mode: TravelMode) -> Vec<(&'static str, String)> {
    vec![
        ("originLat", origin.lat.to_string()),
        ("originLng", origin.lng.to_string()),
        ("destLat", destination.lat.to_string()),
        ("destLng", destination.lng.to_string()),
        ("travelMode", proxy_travel_mode(mode).to_string()),
    ]
}

#[async_trait]
impl RoutingService for RoutesApiClient {
    async fn route(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        mode: TravelMode,
    ) -> Result<RouteLeg> {
        debug!("Requesting {} route from routes proxy", proxy_travel_mode(mode));

        let response = self
            .client
            .get(self.compute_url())
            .query(&query_params(origin, destination, mode))
            .send()
            .await
            .context("Failed to send request to routes proxy")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Routes proxy returned error {}: {}", status, body);
        }

        let body: ComputeResponse = response
            .json()
            .await
            .context("Failed to parse routes proxy response")?;

        Ok(body.into())
    }

    fn name(&self) -> &str {
        "RoutesApi"
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputeResponse {
    #[serde(alias = "distanceKm")]
    distance: f64,
    #[serde(alias = "durationMinutes")]
    duration: f64,
    #[serde(default)]
    fallback: bool,
    #[serde(default)]
    traffic_aware: bool,
}

impl From<ComputeResponse> for RouteLeg {
    fn from(r: ComputeResponse) -> Self {
        RouteLeg {
            distance_km: r.distance,
            duration_minutes: r.duration,
            traffic_aware: r.traffic_aware,
            fallback: r.fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        let a = Coordinates { lat: 34.5, lng: 135.25 };
        let b = Coordinates { lat: 34.75, lng: 135.5 };
        let params = query_params(&a, &b, TravelMode::Driving);

        assert_eq!(params[0], ("originLat", "34.5".to_string()));
        assert_eq!(params[3], ("destLng", "135.5".to_string()));
        assert_eq!(params[4], ("travelMode", "DRIVE".to_string()));
    }

    #[test]
    fn test_compute_url_strips_trailing_slash() {
        let client = RoutesApiClient::new(RoutesApiConfig::new("http://api.local/", 5)).unwrap();
        assert_eq!(client.compute_url(), "http://api.local/api/routes/compute");
    }

    #[test]
    fn test_parse_proxy_response() {
        let body = r#"{"distance": 4.2, "duration": 17.0, "travelMode": "TRANSIT",
                       "fallback": false, "trafficAware": false}"#;
        let leg: RouteLeg = serde_json::from_str::<ComputeResponse>(body).unwrap().into();
        assert_eq!(leg.distance_km, 4.2);
        assert_eq!(leg.duration_minutes, 17.0);
        assert!(!leg.fallback);
    }

    #[test]
    fn test_parse_proxy_response_spec_field_names() {
        let body = r#"{"distanceKm": 3.0, "durationMinutes": 9.0, "fallback": true}"#;
        let leg: RouteLeg = serde_json::from_str::<ComputeResponse>(body).unwrap().into();
        assert_eq!(leg.distance_km, 3.0);
        assert!(leg.fallback);
    }
}
