/// Client side of the real-time notification stream
///
/// The wire protocol is JSON text frames in both directions:
/// 1. Outbound: keep-alive pings and reconciliation sync requests
/// 2. Inbound: pong, authentication acknowledgment, notification pushes
/// 3. Push payloads arrive wrapped or flat and are normalized here
pub mod messages;

pub use messages::{parse_server_message, PushPayload, WsClientMessage, WsServerMessage};
