//! WebSocket turn loop
//!
//! One text frame in, one text frame out. Errors are reported in-band and
//! never close the socket.

use super::types::{InboundFrame, OutboundFrame};
use crate::runtime::DialogRuntime;
use crate::store::SessionStore;
use axum::extract::ws::{Message, WebSocket};

pub const MISSING_FIELDS: &str = "Missing thread_id, token or message";

/// Drive a socket until the client goes away
pub async fn serve_socket<S: SessionStore>(mut socket: WebSocket, runtime: &DialogRuntime<S>) {
    let connection_id = uuid::Uuid::new_v4();
    tracing::info!(%connection_id, "WebSocket connected");

    while let Some(frame) = socket.recv().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(%connection_id, error = %e, "WebSocket receive failed");
                break;
            }
        };

        let response = handle_frame(runtime, &text).await;
        let body = match serde_json::to_string(&response) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(%connection_id, error = %e, "Failed to encode frame");
                continue;
            }
        };

        if socket.send(Message::Text(body)).await.is_err() {
            break;
        }
    }

    tracing::info!(%connection_id, "WebSocket disconnected");
}

/// Turn one inbound text frame into the frame to send back
pub async fn handle_frame<S: SessionStore>(runtime: &DialogRuntime<S>, text: &str) -> OutboundFrame {
    let frame: InboundFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => return OutboundFrame::error(format!("Invalid JSON: {e}")),
    };

    let Some(turn) = frame.into_turn() else {
        return OutboundFrame::error(MISSING_FIELDS);
    };

    match runtime.process_turn(&turn.thread_id, &turn.message).await {
        Ok(message) => OutboundFrame::Reply {
            thread_id: turn.thread_id,
            message,
        },
        Err(e) => {
            tracing::error!(thread_id = %turn.thread_id, error = %e, "Turn failed");
            OutboundFrame::error(format!("Internal error: {e}"))
        }
    }
}
