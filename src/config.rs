//! Configuration management

use anyhow::{Context, Result};

use crate::services::routing::{RoutingBackend, RoutingConfig};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// Routing backend for travel-time lookups
    pub routing: RoutingConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup.
    ///
    /// `ROUTING_BACKEND` defaults to `routes` when `ROUTING_URL` is set and to
    /// `offline` otherwise.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let nats_url = var("NATS_URL").unwrap_or_else(|| "nats://localhost:4222".to_string());

        let base_url = var("ROUTING_URL").filter(|u| !u.trim().is_empty());

        let backend = match var("ROUTING_BACKEND") {
            Some(name) => name.parse::<RoutingBackend>()?,
            None if base_url.is_some() => RoutingBackend::Routes,
            None => RoutingBackend::Offline,
        };

        let timeout_seconds = match var("ROUTING_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("ROUTING_TIMEOUT_SECS must be a number of seconds, got '{}'", raw))?,
            None => RoutingConfig::default().timeout_seconds,
        };

        Ok(Self {
            nats_url,
            routing: RoutingConfig {
                backend,
                base_url,
                timeout_seconds,
            },
        })
    }
}
