//! Itinerary message handlers

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::PlannerResult;
use crate::services::itinerary::{Itinerary, ItineraryView, ScheduleEdit};
use crate::services::planner::{build_trip_input, distribute};
use crate::services::travel_time::TravelTimeOracle;
use crate::types::{
    DistributionResult, ErrorResponse, LegResolveRequest, Request, SuccessResponse, TravelEstimate,
    TripRequest,
};

/// Edit of a previously planned schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    /// Trip the schedule was planned for (windows and mode)
    pub trip: TripRequest,
    /// Schedule as returned by the last plan or edit
    pub schedule: DistributionResult,
    pub edit: ScheduleEdit,
}

/// Distribute the trip, annotate every leg and wait for all lookups.
pub async fn plan_itinerary(oracle: Arc<TravelTimeOracle>, request: &TripRequest) -> PlannerResult<ItineraryView> {
    let input = build_trip_input(request)?;
    let result = distribute(&input)?;

    let mut itinerary = Itinerary::assemble(result, &input.windows, input.mode, oracle)?;
    itinerary.resolve_all().await;

    let view = itinerary.view();
    itinerary.discard();
    Ok(view)
}

/// Apply one edit to a stored schedule and re-annotate it. Unchanged legs are
/// answered from the oracle cache.
pub async fn edit_itinerary(oracle: Arc<TravelTimeOracle>, request: EditRequest) -> PlannerResult<ItineraryView> {
    let input = build_trip_input(&request.trip)?;

    let mut itinerary = Itinerary::assemble(request.schedule, &input.windows, input.mode, oracle)?;
    let outcome = itinerary.apply_edit(request.edit)?;
    debug!(
        "Edit applied: {} new legs, {} reused",
        outcome.new_legs, outcome.reused_legs
    );
    itinerary.resolve_all().await;

    let view = itinerary.view();
    itinerary.discard();
    Ok(view)
}

async fn reply_error(client: &Client, reply: async_nats::Subject, id: Uuid, code: &str, message: String) -> Result<()> {
    let error = ErrorResponse::new(id, code, message);
    let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
    Ok(())
}

/// Handle itinerary.plan messages
pub async fn handle_plan(client: Client, mut subscriber: Subscriber, oracle: Arc<TravelTimeOracle>) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received itinerary.plan message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<TripRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse itinerary.plan request: {}", e);
                reply_error(&client, reply, Uuid::nil(), "INVALID_REQUEST", e.to_string()).await?;
                continue;
            }
        };

        match plan_itinerary(Arc::clone(&oracle), &request.payload).await {
            Ok(view) => {
                info!(
                    "Planned {} days, {} unplaceable",
                    view.days.len(),
                    view.unplaceable.len()
                );
                let success = SuccessResponse::new(request.id, view);
                let _ = client.publish(reply, serde_json::to_vec(&success)?.into()).await;
            }
            Err(e) => {
                warn!("Rejected itinerary.plan request: {}", e);
                reply_error(&client, reply, request.id, "INVALID_INPUT", e.to_string()).await?;
            }
        }
    }

    Ok(())
}

/// Handle itinerary.edit messages
pub async fn handle_edit(client: Client, mut subscriber: Subscriber, oracle: Arc<TravelTimeOracle>) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received itinerary.edit message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<EditRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse itinerary.edit request: {}", e);
                reply_error(&client, reply, Uuid::nil(), "INVALID_REQUEST", e.to_string()).await?;
                continue;
            }
        };

        let id = request.id;
        match edit_itinerary(Arc::clone(&oracle), request.payload).await {
            Ok(view) => {
                let success = SuccessResponse::new(id, view);
                let _ = client.publish(reply, serde_json::to_vec(&success)?.into()).await;
            }
            Err(e) => {
                warn!("Rejected itinerary.edit request: {}", e);
                reply_error(&client, reply, id, "INVALID_INPUT", e.to_string()).await?;
            }
        }
    }

    Ok(())
}

/// Handle leg.resolve messages. Lookups never fail; routing problems show up
/// as `isEstimated` in the answer.
pub async fn handle_leg_resolve(client: Client, mut subscriber: Subscriber, oracle: Arc<TravelTimeOracle>) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => continue,
        };

        let request: Request<LegResolveRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse leg.resolve request: {}", e);
                reply_error(&client, reply, Uuid::nil(), "INVALID_REQUEST", e.to_string()).await?;
                continue;
            }
        };

        let leg = &request.payload;
        let estimate: TravelEstimate = oracle
            .resolve(Some(&leg.origin), Some(&leg.destination), leg.mode)
            .await;

        let success = SuccessResponse::new(request.id, estimate);
        let _ = client.publish(reply, serde_json::to_vec(&success)?.into()).await;
    }

    Ok(())
}
