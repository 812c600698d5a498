//! NATS message handlers

pub mod itinerary;
pub mod ping;

use std::sync::Arc;

use anyhow::Result;
use async_nats::Client;
use tokio::select;
use tracing::{error, info};

use crate::config::Config;
use crate::services::routing::create_routing_service_with_fallback;
use crate::services::travel_time::TravelTimeOracle;

pub const SUBJECT_PING: &str = "tripplan.ping";
pub const SUBJECT_PLAN: &str = "tripplan.itinerary.plan";
pub const SUBJECT_EDIT: &str = "tripplan.itinerary.edit";
pub const SUBJECT_LEG_RESOLVE: &str = "tripplan.leg.resolve";

/// Start all message handlers
pub async fn start_handlers(client: Client, config: &Config) -> Result<()> {
    info!("Starting message handlers...");

    // Create routing service, falling back to offline estimates
    let routing_service = create_routing_service_with_fallback(&config.routing).await;
    info!("Routing service initialized: {}", routing_service.name());

    // One oracle for the whole process so every request shares the cache
    let oracle = Arc::new(TravelTimeOracle::new(routing_service));

    // Subscribe to all subjects
    let ping_sub = client.subscribe(SUBJECT_PING).await?;
    let plan_sub = client.subscribe(SUBJECT_PLAN).await?;
    let edit_sub = client.subscribe(SUBJECT_EDIT).await?;
    let leg_resolve_sub = client.subscribe(SUBJECT_LEG_RESOLVE).await?;

    info!("Subscribed to NATS subjects");

    let client_ping = client.clone();
    let client_plan = client.clone();
    let client_edit = client.clone();
    let client_leg_resolve = client.clone();

    let oracle_ping = Arc::clone(&oracle);
    let oracle_plan = Arc::clone(&oracle);
    let oracle_edit = Arc::clone(&oracle);
    let oracle_leg_resolve = Arc::clone(&oracle);

    // Spawn handlers
    let ping_handle = tokio::spawn(async move {
        ping::handle_ping(client_ping, ping_sub, oracle_ping).await
    });

    let plan_handle = tokio::spawn(async move {
        itinerary::handle_plan(client_plan, plan_sub, oracle_plan).await
    });

    let edit_handle = tokio::spawn(async move {
        itinerary::handle_edit(client_edit, edit_sub, oracle_edit).await
    });

    let leg_resolve_handle = tokio::spawn(async move {
        itinerary::handle_leg_resolve(client_leg_resolve, leg_resolve_sub, oracle_leg_resolve).await
    });

    info!("All handlers started, waiting for messages...");

    // Wait for any handler to finish (which would indicate an error)
    select! {
        result = ping_handle => {
            error!("Ping handler finished: {:?}", result);
        }
        result = plan_handle => {
            error!("Itinerary plan handler finished: {:?}", result);
        }
        result = edit_handle => {
            error!("Itinerary edit handler finished: {:?}", result);
        }
        result = leg_resolve_handle => {
            error!("Leg resolve handler finished: {:?}", result);
        }
    }

    Ok(())
}
