//! Realtime change notifications over the hosted Phoenix websocket.
//!
//! A subscription joins one channel for `postgres_changes` on a table,
//! keeps it alive with heartbeats and forwards every insert or update as a
//! [`ChangeEvent`]. The channel is left when the subscription is dropped or
//! [`RealtimeSubscription::unsubscribe`] is called.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use studyshare_core::realtime::{ChangeEvent, ChangeKind};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as TungsteniteMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::config::BackendConfig;
use crate::error::{BackendError, Result};

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

const SCHEMA: &str = "public";
const JOIN_REF: &str = "1";
const SUBSCRIBED_KINDS: [ChangeKind; 2] = [ChangeKind::Insert, ChangeKind::Update];
const LEAVE_TIMEOUT: Duration = Duration::from_secs(2);

/// One Phoenix channel frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_ref: Option<String>,
}

impl PhoenixMessage {
    fn new(topic: &str, event: &str, payload: Value, reference: u64) -> Self {
        Self {
            topic: topic.to_string(),
            event: event.to_string(),
            payload,
            reference: Some(reference.to_string()),
            join_ref: None,
        }
    }
}

/// What the subscription task should do with an incoming frame.
#[derive(Debug, PartialEq)]
pub enum FrameAction {
    Change(ChangeEvent),
    JoinFailed(String),
    Ignore,
}

pub fn channel_topic(table: &str) -> String {
    format!("realtime:{}:{}", SCHEMA, table)
}

/// Join frame subscribing to inserts and updates on `table`.
pub fn join_message(table: &str, access_token: &str) -> PhoenixMessage {
    let changes: Vec<Value> = SUBSCRIBED_KINDS
        .iter()
        .map(|kind| json!({ "event": kind_name(*kind), "schema": SCHEMA, "table": table }))
        .collect();
    let mut message = PhoenixMessage::new(
        &channel_topic(table),
        "phx_join",
        json!({
            "config": {
                "broadcast": { "self": false },
                "presence": { "key": "" },
                "postgres_changes": changes,
            },
            "access_token": access_token,
        }),
        1,
    );
    message.join_ref = Some(JOIN_REF.to_string());
    message
}

pub fn heartbeat_message(reference: u64) -> PhoenixMessage {
    PhoenixMessage::new("phoenix", "heartbeat", json!({}), reference)
}

pub fn leave_message(table: &str, reference: u64) -> PhoenixMessage {
    let mut message = PhoenixMessage::new(&channel_topic(table), "phx_leave", json!({}), reference);
    message.join_ref = Some(JOIN_REF.to_string());
    message
}

fn kind_name(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Insert => "INSERT",
        ChangeKind::Update => "UPDATE",
        ChangeKind::Delete => "DELETE",
    }
}

/// Classifies one text frame received on the socket.
///
/// Understands both the `postgres_changes` envelope (change under
/// `payload.data`) and the older per-kind events (change directly in
/// `payload`). Changes for other tables are ignored.
pub fn parse_frame(text: &str, table: &str) -> FrameAction {
    let message: PhoenixMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            warn!("Ignoring malformed realtime frame: {}", e);
            return FrameAction::Ignore;
        }
    };
    if message.topic != channel_topic(table) {
        return FrameAction::Ignore;
    }

    match message.event.as_str() {
        "postgres_changes" => parse_change(&message.payload["data"], table),
        "INSERT" | "UPDATE" | "DELETE" => parse_change(&message.payload, table),
        "phx_reply" if message.payload["status"] == "error" => {
            FrameAction::JoinFailed(message.payload["response"].to_string())
        }
        "phx_error" => FrameAction::JoinFailed("channel crashed".to_string()),
        "system" if message.payload["status"] == "error" => FrameAction::JoinFailed(
            message.payload["message"]
                .as_str()
                .unwrap_or("subscription refused")
                .to_string(),
        ),
        _ => FrameAction::Ignore,
    }
}

fn parse_change(data: &Value, table: &str) -> FrameAction {
    if data["table"].as_str() != Some(table) {
        return FrameAction::Ignore;
    }
    let Ok(kind) = serde_json::from_value::<ChangeKind>(data["type"].clone()) else {
        debug!("Ignoring change with unknown type {}", data["type"]);
        return FrameAction::Ignore;
    };
    let record = data.get("record").filter(|r| r.is_object()).cloned();
    FrameAction::Change(ChangeEvent {
        table: table.to_string(),
        kind,
        record,
    })
}

/// Opens realtime subscriptions against the hosted backend.
#[derive(Debug, Clone)]
pub struct RealtimeClient {
    config: BackendConfig,
}

impl RealtimeClient {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    /// Connects, joins the channel for `table` and starts forwarding changes
    /// into `events`.
    pub async fn subscribe(
        &self,
        table: &str,
        events: mpsc::UnboundedSender<ChangeEvent>,
    ) -> Result<RealtimeSubscription> {
        let url = self.config.realtime_url()?;
        let (mut socket, _) = connect_async(url).await?;
        send_message(&mut socket, &join_message(table, &self.config.api_key)).await?;
        info!("Joined realtime channel {}", channel_topic(table));

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_channel(
            socket,
            table.to_string(),
            self.config.heartbeat_interval,
            events,
            shutdown_rx,
        ));

        Ok(RealtimeSubscription {
            topic: channel_topic(table),
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }
}

/// Live channel subscription. Dropping it leaves the channel.
#[derive(Debug)]
pub struct RealtimeSubscription {
    topic: String,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RealtimeSubscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// True while the channel task is still running.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Leaves the channel and waits briefly for the socket to close.
    pub async fn unsubscribe(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            let abort = task.abort_handle();
            if tokio::time::timeout(LEAVE_TIMEOUT, task).await.is_err() {
                warn!("Realtime channel {} did not close in time", self.topic);
                abort.abort();
            }
        }
    }
}

impl Drop for RealtimeSubscription {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn send_message(socket: &mut Socket, message: &PhoenixMessage) -> Result<()> {
    let text = serde_json::to_string(message)?;
    socket.send(TungsteniteMessage::Text(text.into())).await?;
    Ok(())
}

async fn run_channel(
    mut socket: Socket,
    table: String,
    heartbeat_interval: Duration,
    events: mpsc::UnboundedSender<ChangeEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let start = tokio::time::Instant::now() + heartbeat_interval;
    let mut heartbeat = tokio::time::interval_at(start, heartbeat_interval);
    let mut next_ref: u64 = 2;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                if let Err(e) = send_message(&mut socket, &leave_message(&table, next_ref)).await {
                    debug!("Could not send leave for {}: {}", table, e);
                }
                let _ = socket.close(None).await;
                info!("Left realtime channel {}", channel_topic(&table));
                break;
            }
            _ = heartbeat.tick() => {
                if let Err(e) = send_message(&mut socket, &heartbeat_message(next_ref)).await {
                    error!("Realtime heartbeat failed: {}", e);
                    break;
                }
                next_ref += 1;
            }
            frame = socket.next() => match frame {
                Some(Ok(TungsteniteMessage::Text(txt))) => match parse_frame(&txt, &table) {
                    FrameAction::Change(event) => {
                        debug!("Realtime {:?} on {}", event.kind, table);
                        if events.send(event).is_err() {
                            info!("Change receiver closed; stopping realtime channel");
                            break;
                        }
                    }
                    FrameAction::JoinFailed(reason) => {
                        error!("{}", BackendError::realtime(reason));
                        break;
                    }
                    FrameAction::Ignore => {}
                },
                Some(Ok(TungsteniteMessage::Close(_))) | None => {
                    warn!("Realtime socket closed by server");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!("Realtime socket error: {}", e);
                    break;
                }
            }
        }
    }
}
