use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification type enumeration
///
/// Unknown wire values parse as `Other` so a new server-side type never
/// fails an otherwise valid payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// New chat message in a conversation
    NewMessage,
    /// Incoming session booking request
    SessionRequest,
    /// A session request was accepted
    SessionAccept,
    /// Outgoing payment completed
    PaymentSuccess,
    /// Incoming payment arrived
    PaymentReceived,
    /// Anything the client does not recognize
    #[serde(other)]
    Other,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NewMessage => "new_message",
            NotificationKind::SessionRequest => "session_request",
            NotificationKind::SessionAccept => "session_accept",
            NotificationKind::PaymentSuccess => "payment_success",
            NotificationKind::PaymentReceived => "payment_received",
            NotificationKind::Other => "other",
        }
    }
}

/// Server-issued notification record
///
/// The server owns the record; the client keeps a cached, mutable copy in
/// its local list. `notification_type` is the canonical wire name of the
/// kind field, with `type` accepted as an alias for older payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    /// Opaque unique identifier
    pub id: String,

    #[serde(rename = "notification_type", alias = "type")]
    pub kind: NotificationKind,

    pub title: String,

    pub body: String,

    /// Identifier of the related conversation, session or payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,

    /// Read status
    #[serde(default)]
    pub is_read: bool,

    /// Creation timestamp; pushed frames may omit it
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}
