//! Ping handler for health checks

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::services::travel_time::TravelTimeOracle;

#[derive(Debug, Serialize, Deserialize)]
struct PingRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PongResponse {
    message: String,
    timestamp: String,
    /// Routing backend answering leg lookups
    routing: String,
    cached_legs: usize,
}

fn pong(request: PingRequest, oracle: &TravelTimeOracle) -> PongResponse {
    PongResponse {
        message: request
            .message
            .map(|m| format!("Pong: {}", m))
            .unwrap_or_else(|| "Pong".to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
        routing: oracle.routing_name().to_string(),
        cached_legs: oracle.len(),
    }
}

/// Handle ping messages
pub async fn handle_ping(client: Client, mut subscriber: Subscriber, oracle: Arc<TravelTimeOracle>) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received ping message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                error!("Ping message without reply subject");
                continue;
            }
        };

        // Empty body counts as a bare ping
        let request: PingRequest = if msg.payload.is_empty() {
            PingRequest { message: None }
        } else {
            match serde_json::from_slice(&msg.payload) {
                Ok(req) => req,
                Err(e) => {
                    error!("Failed to parse ping request: {}", e);
                    let error_response = serde_json::json!({
                        "error": {
                            "code": "INVALID_REQUEST",
                            "message": format!("Failed to parse request: {}", e)
                        }
                    });
                    let _ = client.publish(reply, error_response.to_string().into()).await;
                    continue;
                }
            }
        };

        let response_bytes = serde_json::to_vec(&pong(request, &oracle))?;
        client.publish(reply, response_bytes.into()).await?;

        debug!("Sent pong response");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::routing::OfflineRouting;

    #[test]
    fn test_pong_echoes_message_and_routing() {
        let oracle = TravelTimeOracle::new(Arc::new(OfflineRouting));

        let response = pong(
            PingRequest {
                message: Some("hello".to_string()),
            },
            &oracle,
        );

        assert_eq!(response.message, "Pong: hello");
        assert_eq!(response.routing, "Offline");
        assert_eq!(response.cached_legs, 0);
    }

    #[test]
    fn test_pong_without_message() {
        let oracle = TravelTimeOracle::new(Arc::new(OfflineRouting));
        let json = serde_json::to_value(pong(PingRequest { message: None }, &oracle)).unwrap();

        assert_eq!(json["message"], "Pong");
        assert_eq!(json["cachedLegs"], 0);
    }
}
