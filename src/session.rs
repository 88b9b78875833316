/// Notification session manager
///
/// Owns the cached notification list, the unread counter and the lifecycle
/// of one streaming connection per authenticated session. Supports:
/// - Initial hydration over REST, then streaming updates
/// - Keep-alive ping/pong over the stream
/// - A single pending reconnection attempt after stream loss
/// - Optimistic-free local mutations (mark read, mark all read, delete)
///
/// Handles are cheap clones over one shared instance. Call `disconnect`
/// on teardown so the socket and the reconnect timer are released.
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use crate::api::NotificationApi;
use crate::auth::CredentialProvider;
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::metrics;
use crate::models::Notification;
use crate::navigation::NavigationTarget;
use crate::sinks::{DisplaySink, NavigationSink, Toast};
use crate::websocket::{parse_server_message, WsClientMessage, WsServerMessage};

/// Lifecycle of the streaming connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Open,
    AwaitingReconnect,
}

#[derive(Debug, Default)]
struct SessionState {
    /// Cached notification list, newest first, unique by id
    notifications: Vec<Notification>,
    unread_count: u64,
    loading: bool,
    connection: ConnectionState,
}

/// Bookkeeping for the at-most-one active connection
#[derive(Default)]
struct ConnectionSlot {
    /// Incremented per attempt; a finishing task may only touch the slot
    /// while its generation is still current
    generation: u64,
    outbound: Option<mpsc::UnboundedSender<WsClientMessage>>,
    /// Single-slot reconnect scheduler; the earliest pending timer wins
    reconnect: Option<JoinHandle<()>>,
    intentional: bool,
}

struct Inner {
    config: Config,
    api: NotificationApi,
    credentials: Arc<dyn CredentialProvider>,
    display: Arc<dyn DisplaySink>,
    navigation: Arc<dyn NavigationSink>,
    state: RwLock<SessionState>,
    // Lock order: `conn` before `state` wherever both are held
    conn: Mutex<ConnectionSlot>,
}

#[derive(Clone)]
pub struct NotificationSession {
    inner: Arc<Inner>,
}

impl NotificationSession {
    pub fn new(
        config: Config,
        credentials: Arc<dyn CredentialProvider>,
        display: Arc<dyn DisplaySink>,
        navigation: Arc<dyn NavigationSink>,
    ) -> Self {
        let api = NotificationApi::new(config.api_base_url.clone(), credentials.clone());
        NotificationSession {
            inner: Arc::new(Inner {
                config,
                api,
                credentials,
                display,
                navigation,
                state: RwLock::new(SessionState::default()),
                conn: Mutex::new(ConnectionSlot::default()),
            }),
        }
    }

    /// Hydrates the list and the unread counter concurrently, then opens
    /// the stream. `is_loading` covers both fetches.
    pub async fn start(&self) {
        self.inner.state.write().await.loading = true;
        let (_, _) = tokio::join!(self.fetch_notifications(false), self.fetch_unread_count());
        self.inner.state.write().await.loading = false;
        self.connect().await;
    }

    /// Fetches one page and replaces the cached list with it.
    ///
    /// On transport failure the cached list is left untouched and an empty
    /// page is returned; an empty result does not imply success.
    pub async fn fetch_notifications(&self, unread_only: bool) -> Vec<Notification> {
        let inner = &self.inner;
        match inner.api.list(inner.config.page_limit, 0, unread_only).await {
            Ok(page) => {
                inner.state.write().await.notifications = page.clone();
                page
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch notifications");
                Vec::new()
            }
        }
    }

    /// Fetches the server-side unread counter and replaces the local one.
    ///
    /// On failure the cached counter is returned unchanged.
    pub async fn fetch_unread_count(&self) -> u64 {
        match self.inner.api.unread_count().await {
            Ok(count) => {
                self.inner.state.write().await.unread_count = count;
                count
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch unread count");
                self.inner.state.read().await.unread_count
            }
        }
    }

    pub async fn mark_as_read(&self, id: &str) {
        if let Err(err) = self.inner.api.mark_read(id).await {
            tracing::warn!(error = %err, id, "failed to mark notification read");
            return;
        }
        let mut state = self.inner.state.write().await;
        if let Some(entry) = state.notifications.iter_mut().find(|n| n.id == id) {
            entry.is_read = true;
        }
        state.unread_count = state.unread_count.saturating_sub(1);
    }

    pub async fn mark_all_as_read(&self) {
        if let Err(err) = self.inner.api.mark_all_read().await {
            tracing::warn!(error = %err, "failed to mark all notifications read");
            return;
        }
        let mut state = self.inner.state.write().await;
        for entry in &mut state.notifications {
            entry.is_read = true;
        }
        state.unread_count = 0;
    }

    pub async fn delete_notification(&self, id: &str) {
        if let Err(err) = self.inner.api.delete(id).await {
            tracing::warn!(error = %err, id, "failed to delete notification");
            return;
        }
        let mut state = self.inner.state.write().await;
        if let Some(position) = state.notifications.iter().position(|n| n.id == id) {
            let removed = state.notifications.remove(position);
            if !removed.is_read {
                state.unread_count = state.unread_count.saturating_sub(1);
            }
        }
    }

    /// Marks an unread notification read, resolves its target view and
    /// forwards the path to the navigation sink.
    pub async fn handle_notification_click(&self, notification: &Notification) -> NavigationTarget {
        if !notification.is_read {
            self.mark_as_read(&notification.id).await;
        }
        let target = NavigationTarget::for_notification(notification);
        self.inner.navigation.navigate(&target.path());
        target
    }

    /// Opens the stream. A no-op while a connection is open or being
    /// established; aborted without retry when no credential is available.
    pub async fn connect(&self) {
        if let Err(err) = self.try_connect().await {
            tracing::debug!(error = %err, "notification stream connect aborted");
        }
    }

    /// Closes the stream with the intentional signal, suppressing
    /// auto-reconnect and cancelling any pending reconnect timer.
    pub async fn disconnect(&self) {
        let mut slot = self.inner.conn.lock().await;
        slot.intentional = true;
        if let Some(pending) = slot.reconnect.take() {
            pending.abort();
        }
        // dropping the sender asks the connection task for a clean close
        slot.outbound = None;
        self.inner.state.write().await.connection = ConnectionState::Disconnected;
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.inner.state.read().await.notifications.clone()
    }

    pub async fn unread_count(&self) -> u64 {
        self.inner.state.read().await.unread_count
    }

    pub async fn is_connected(&self) -> bool {
        self.inner.state.read().await.connection == ConnectionState::Open
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.loading
    }

    pub async fn connection_state(&self) -> ConnectionState {
        self.inner.state.read().await.connection
    }

    async fn try_connect(&self) -> ClientResult<()> {
        let inner = &self.inner;
        let mut slot = inner.conn.lock().await;

        {
            let state = inner.state.read().await;
            if matches!(
                state.connection,
                ConnectionState::Open | ConnectionState::Connecting
            ) {
                return Ok(());
            }
        }

        if !inner.credentials.is_authenticated() {
            return Err(ClientError::MissingToken);
        }
        let token = inner.credentials.token().ok_or(ClientError::MissingToken)?;

        if let Some(pending) = slot.reconnect.take() {
            pending.abort();
        }
        slot.generation += 1;
        slot.intentional = false;
        let generation = slot.generation;

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        slot.outbound = Some(outbound_tx);

        inner.state.write().await.connection = ConnectionState::Connecting;
        drop(slot);

        let session = self.clone();
        tokio::spawn(async move {
            session.run_connection(generation, token, outbound_rx).await;
        });
        Ok(())
    }

    async fn run_connection(
        &self,
        generation: u64,
        token: String,
        mut outbound: mpsc::UnboundedReceiver<WsClientMessage>,
    ) {
        let inner = &self.inner;
        let url = format!(
            "{}/ws/chat/notifications/?token={}",
            inner.config.ws_base_url.trim_end_matches('/'),
            urlencoding::encode(&token)
        );

        let (mut ws, _) = match connect_async(url.as_str()).await {
            Ok(connection) => connection,
            Err(err) => {
                let err = ClientError::from(err);
                tracing::warn!(error = %err, "notification stream connect failed");
                self.finish_connection(generation, false).await;
                return;
            }
        };

        {
            // teardown or a superseding attempt may have taken the slot
            // while the handshake was in flight
            let slot = inner.conn.lock().await;
            if slot.generation != generation || slot.intentional {
                drop(slot);
                let _ = ws.close(None).await;
                self.finish_connection(generation, true).await;
                return;
            }
        }

        inner.state.write().await.connection = ConnectionState::Open;
        tracing::info!("notification stream open");

        let mut heartbeat =
            tokio::time::interval(Duration::from_secs(inner.config.heartbeat_interval_secs));
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        heartbeat.tick().await; // consume the immediate first tick

        let mut clean_close = false;
        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    match serde_json::to_string(&WsClientMessage::Ping) {
                        Ok(frame) => {
                            if ws.send(WsMessage::Text(frame.into())).await.is_err() {
                                break;
                            }
                            metrics::observe_heartbeat();
                        }
                        Err(err) => tracing::error!(error = %err, "failed to encode keep-alive frame"),
                    }
                }
                queued = outbound.recv() => {
                    match queued {
                        Some(message) => match serde_json::to_string(&message) {
                            Ok(frame) => {
                                if ws.send(WsMessage::Text(frame.into())).await.is_err() {
                                    break;
                                }
                            }
                            Err(err) => tracing::error!(error = %err, "failed to encode outbound frame"),
                        },
                        // sender dropped: local teardown requested the close
                        None => {
                            let _ = ws.close(None).await;
                            clean_close = true;
                            break;
                        }
                    }
                }
                incoming = ws.next() => {
                    match incoming {
                        Some(Ok(WsMessage::Text(frame))) => self.handle_frame(frame.as_str()).await,
                        Some(Ok(WsMessage::Ping(payload))) => {
                            if ws.send(WsMessage::Pong(payload)).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(WsMessage::Close(frame))) => {
                            clean_close = frame
                                .map(|f| f.code == CloseCode::Normal)
                                .unwrap_or(false);
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(err)) => {
                            let err = ClientError::from(err);
                            tracing::warn!(error = %err, "notification stream failed");
                            break;
                        }
                        None => break,
                    }
                }
            }
        }

        self.finish_connection(generation, clean_close).await;
    }

    async fn finish_connection(&self, generation: u64, clean_close: bool) {
        let inner = &self.inner;
        let mut slot = inner.conn.lock().await;
        if slot.generation != generation {
            // a newer attempt owns the slot; nothing to clean up here
            return;
        }
        slot.outbound = None;

        if slot.intentional || clean_close {
            inner.state.write().await.connection = ConnectionState::Disconnected;
            tracing::info!("notification stream closed");
            return;
        }

        inner.state.write().await.connection = ConnectionState::AwaitingReconnect;
        let pending = slot
            .reconnect
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false);
        if pending {
            return;
        }

        metrics::observe_reconnect_scheduled();
        tracing::info!(
            delay_ms = inner.config.reconnect_delay_ms,
            "scheduling notification stream reconnect"
        );
        let delay = Duration::from_millis(inner.config.reconnect_delay_ms);
        let session = self.clone();
        slot.reconnect = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut slot = session.inner.conn.lock().await;
                slot.reconnect = None;
            }
            if session.inner.credentials.is_authenticated() {
                session.connect().await;
            }
        }));
    }

    async fn handle_frame(&self, raw: &str) {
        match parse_server_message(raw) {
            Ok(WsServerMessage::Pong) => {}
            Ok(WsServerMessage::Authenticated) => {
                tracing::debug!("notification stream authenticated, requesting sync");
                self.send_message(WsClientMessage::NotificationsSync {
                    unread_only: true,
                    limit: self.inner.config.page_limit,
                })
                .await;
            }
            Ok(WsServerMessage::Notification(payload))
            | Ok(WsServerMessage::NotificationReceived(payload)) => {
                match payload.into_notification() {
                    Ok(notification) => self.accept_push(notification).await,
                    Err(err) => {
                        tracing::warn!(error = %err, "dropping push with malformed payload")
                    }
                }
            }
            Err(err) => tracing::warn!(error = %err, "dropping unhandled stream message"),
        }
    }

    /// Merges one pushed notification into local state.
    ///
    /// A new id is prepended, counted and surfaced as a toast; an id we
    /// already hold is refreshed in place without recounting or toasting.
    async fn accept_push(&self, notification: Notification) {
        metrics::observe_push(notification.kind.as_str());
        let toast = Toast::notification(notification.title.clone(), notification.body.clone());

        let mut state = self.inner.state.write().await;
        match state
            .notifications
            .iter()
            .position(|n| n.id == notification.id)
        {
            Some(position) => {
                state.notifications[position] = notification;
            }
            None => {
                state.notifications.insert(0, notification);
                state.unread_count += 1;
                drop(state);
                self.inner.display.show(toast);
            }
        }
    }

    async fn send_message(&self, message: WsClientMessage) {
        let slot = self.inner.conn.lock().await;
        if let Some(outbound) = &slot.outbound {
            let _ = outbound.send(message);
        }
    }
}
