/// Wire message types for the notification stream
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use crate::models::Notification;

/// Outbound messages from client to server
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum WsClientMessage {
    /// Keep-alive heartbeat
    #[serde(rename = "ping")]
    Ping,

    /// Reconciliation request for notifications missed before the
    /// connection was established
    #[serde(rename = "notifications_sync")]
    NotificationsSync { unread_only: bool, limit: u32 },
}

/// Inbound messages from server to client
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum WsServerMessage {
    /// Answer to a keep-alive ping; carries no content
    #[serde(rename = "pong")]
    Pong,

    /// The server accepted the connection's credentials
    #[serde(rename = "authenticated")]
    Authenticated,

    /// A notification push
    #[serde(rename = "notification")]
    Notification(PushPayload),

    /// Alternate push spelling used by older server builds
    #[serde(rename = "notification_received")]
    NotificationReceived(PushPayload),
}

/// Push frame body, before normalization
///
/// The record arrives either wrapped (`{"notification": {...}}`) or flat,
/// with its fields beside the message type. Both shapes normalize to one
/// `Notification`.
#[derive(Debug, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    notification: Option<serde_json::Value>,
    #[serde(flatten)]
    inline: serde_json::Map<String, serde_json::Value>,
}

impl PushPayload {
    pub fn into_notification(self) -> ClientResult<Notification> {
        let record = match self.notification {
            Some(wrapped) => wrapped,
            None => serde_json::Value::Object(self.inline),
        };
        Ok(serde_json::from_value(record)?)
    }
}

const RECOGNIZED_TYPES: [&str; 4] = ["pong", "authenticated", "notification", "notification_received"];

/// Parses one inbound text frame.
///
/// A frame with a well-formed but unknown `type` tag is reported as
/// `UnrecognizedMessage` so the session can drop it without treating the
/// payload as corrupt.
pub fn parse_server_message(raw: &str) -> ClientResult<WsServerMessage> {
    match serde_json::from_str(raw) {
        Ok(message) => Ok(message),
        Err(err) => {
            let tag = serde_json::from_str::<serde_json::Value>(raw)
                .ok()
                .and_then(|value| value.get("type").and_then(|t| t.as_str()).map(str::to_owned));
            match tag {
                Some(tag) if !RECOGNIZED_TYPES.contains(&tag.as_str()) => {
                    Err(ClientError::UnrecognizedMessage(tag))
                }
                _ => Err(ClientError::MalformedMessage(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationKind;

    #[test]
    fn outbound_frames_serialize_with_type_tag() {
        let ping = serde_json::to_value(WsClientMessage::Ping).unwrap();
        assert_eq!(ping, serde_json::json!({"type": "ping"}));

        let sync = serde_json::to_value(WsClientMessage::NotificationsSync {
            unread_only: true,
            limit: 50,
        })
        .unwrap();
        assert_eq!(
            sync,
            serde_json::json!({"type": "notifications_sync", "unread_only": true, "limit": 50})
        );
    }

    #[test]
    fn wrapped_push_normalizes_to_the_record() {
        let raw = serde_json::json!({
            "type": "notification",
            "notification": {
                "id": "n1",
                "notification_type": "new_message",
                "title": "New message",
                "body": "hello",
                "related_id": "c1"
            }
        })
        .to_string();

        match parse_server_message(&raw).unwrap() {
            WsServerMessage::Notification(payload) => {
                let record = payload.into_notification().unwrap();
                assert_eq!(record.id, "n1");
                assert_eq!(record.kind, NotificationKind::NewMessage);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn flat_push_normalizes_to_the_same_record() {
        let raw = serde_json::json!({
            "type": "notification_received",
            "id": "n1",
            "notification_type": "new_message",
            "title": "New message",
            "body": "hello",
            "related_id": "c1"
        })
        .to_string();

        match parse_server_message(&raw).unwrap() {
            WsServerMessage::NotificationReceived(payload) => {
                let record = payload.into_notification().unwrap();
                assert_eq!(record.id, "n1");
                assert_eq!(record.related_id.as_deref(), Some("c1"));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn pong_and_authenticated_parse_as_control_messages() {
        assert!(matches!(
            parse_server_message(r#"{"type":"pong"}"#).unwrap(),
            WsServerMessage::Pong
        ));
        assert!(matches!(
            parse_server_message(r#"{"type":"authenticated"}"#).unwrap(),
            WsServerMessage::Authenticated
        ));
    }

    #[test]
    fn unknown_type_tag_is_reported_as_unrecognized() {
        let err = parse_server_message(r#"{"type":"presence","user":"u1"}"#).unwrap_err();
        match err {
            ClientError::UnrecognizedMessage(tag) => assert_eq!(tag, "presence"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn client_only_tags_are_unrecognized_inbound() {
        let err = parse_server_message(r#"{"type":"notifications_sync"}"#).unwrap_err();
        assert!(matches!(err, ClientError::UnrecognizedMessage(_)));
    }

    #[test]
    fn unparseable_frame_is_reported_as_malformed() {
        let err = parse_server_message("{not json").unwrap_err();
        assert!(matches!(err, ClientError::MalformedMessage(_)));

        // a non-string tag cannot be classified, so it stays malformed
        let err = parse_server_message(r#"{"type":5}"#).unwrap_err();
        assert!(matches!(err, ClientError::MalformedMessage(_)));
    }

    #[test]
    fn push_without_a_record_fails_normalization() {
        let raw = r#"{"type":"notification"}"#;
        match parse_server_message(raw).unwrap() {
            WsServerMessage::Notification(payload) => {
                assert!(payload.into_notification().is_err());
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
