//! Wire types for the WebSocket turn protocol and HTTP responses

use serde::{Deserialize, Serialize};

/// Inbound WebSocket frame. Every field is optional on the wire so a
/// malformed frame can be answered instead of dropping the connection.
#[derive(Debug, Default, Deserialize)]
pub struct InboundFrame {
    #[serde(default)]
    pub thread_id: Option<String>,
    /// Required but not verified
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A frame that names a session and carries an utterance
#[derive(Debug, PartialEq, Eq)]
pub struct TurnRequest {
    pub thread_id: String,
    pub message: String,
}

impl InboundFrame {
    /// Validate required fields. An empty message is allowed.
    pub fn into_turn(self) -> Option<TurnRequest> {
        let thread_id = self.thread_id.filter(|t| !t.trim().is_empty())?;
        self.token.filter(|t| !t.trim().is_empty())?;
        let message = self.message?;
        Some(TurnRequest { thread_id, message })
    }
}

/// Outbound WebSocket frame
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum OutboundFrame {
    Reply { thread_id: String, message: String },
    Error { error: String },
}

impl OutboundFrame {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

/// Service banner
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub sessions: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> InboundFrame {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_complete_frame_becomes_turn() {
        let turn = parse(r#"{"thread_id":"t1","token":"abc","message":"Central Hospital"}"#)
            .into_turn()
            .unwrap();
        assert_eq!(
            turn,
            TurnRequest {
                thread_id: "t1".to_string(),
                message: "Central Hospital".to_string()
            }
        );
    }

    #[test]
    fn test_empty_message_is_allowed() {
        let turn = parse(r#"{"thread_id":"t1","token":"abc","message":""}"#).into_turn();
        assert_eq!(turn.unwrap().message, "");
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        assert!(parse(r#"{"token":"abc","message":"hi"}"#).into_turn().is_none());
        assert!(parse(r#"{"thread_id":"t1","message":"hi"}"#).into_turn().is_none());
        assert!(parse(r#"{"thread_id":"t1","token":"abc"}"#).into_turn().is_none());
        assert!(parse(r#"{"thread_id":" ","token":"abc","message":"hi"}"#)
            .into_turn()
            .is_none());
    }

    #[test]
    fn test_outbound_frames_are_flat() {
        let reply = OutboundFrame::Reply {
            thread_id: "t1".to_string(),
            message: "hello".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            serde_json::json!({ "thread_id": "t1", "message": "hello" })
        );
        assert_eq!(
            serde_json::to_value(OutboundFrame::error("boom")).unwrap(),
            serde_json::json!({ "error": "boom" })
        );
    }
}
