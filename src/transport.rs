use std::time::Duration;

use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};
use rand::Rng;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};

pub const DEFAULT_PING_INTERVAL_MS: u64 = 1000;
const MAX_PING_PAYLOAD: u32 = 0xFF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Uninitialized,
    Connecting,
    Open,
    Erroring,
    /// The peer closed the connection.
    Closed,
}

impl ConnectionState {
    pub fn on_event(self, event: &TransportEvent) -> Self {
        match event {
            TransportEvent::Connecting => ConnectionState::Connecting,
            TransportEvent::Open => ConnectionState::Open,
            TransportEvent::Frame(_) => self,
            TransportEvent::Error(_) => ConnectionState::Erroring,
            TransportEvent::Closed => ConnectionState::Closed,
        }
    }
}

/// Events surfaced by the transport thread, in receipt order.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    Connecting,
    Open,
    /// A raw text frame, not yet parsed.
    Frame(String),
    Error(String),
    Closed,
}

/// Identity of a transport subscription. A new value means a new connection;
/// bumping `generation` is how a remount is requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransportKey {
    pub uri: String,
    pub ping_interval_ms: u64,
    pub generation: u64,
}

/// Open the connection on a dedicated thread and stream its events.
///
/// The thread hosts a current-thread tokio runtime, so frame handling and the
/// liveness loop never run concurrently with each other. It exits once the
/// connection ends or the receiver is dropped.
pub fn connect(key: &TransportKey) -> mpsc::UnboundedReceiver<TransportEvent> {
    let key = key.clone();
    let (tx, rx) = mpsc::unbounded();
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                warn!("failed to start transport runtime: {e}");
                let _ = tx.unbounded_send(TransportEvent::Error(e.to_string()));
                return;
            }
        };
        runtime.block_on(run_connection(key, tx));
    });
    rx
}

/// Random integer sent as text to keep the connection alive.
pub fn liveness_payload<R: Rng>(rng: &mut R) -> String {
    rng.gen_range(0..=MAX_PING_PAYLOAD).to_string()
}

async fn run_connection(key: TransportKey, tx: mpsc::UnboundedSender<TransportEvent>) {
    if tx.unbounded_send(TransportEvent::Connecting).is_err() {
        return;
    }
    info!(uri = %key.uri, generation = key.generation, "connecting");

    let (ws, _) = match connect_async(key.uri.as_str()).await {
        Ok(v) => v,
        Err(e) => {
            warn!("connect failed: {e}");
            let _ = tx.unbounded_send(TransportEvent::Error(e.to_string()));
            return;
        }
    };
    info!("connected");
    if tx.unbounded_send(TransportEvent::Open).is_err() {
        return;
    }

    let (mut sink, mut stream) = ws.split();
    let mut liveness = tokio::time::interval(Duration::from_millis(key.ping_interval_ms.max(1)));
    liveness.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let last = loop {
        tokio::select! {
            _ = liveness.tick() => {
                if tx.is_closed() {
                    debug!("receiver dropped, stopping transport");
                    return;
                }
                let payload = liveness_payload(&mut rand::thread_rng());
                // A failed send means the connection is no longer open.
                if let Err(e) = sink.send(WsMessage::text(payload)).await {
                    debug!("liveness loop ended: {e}");
                    break TransportEvent::Closed;
                }
            }
            incoming = stream.next() => match incoming {
                Some(Ok(WsMessage::Text(text))) => {
                    debug!(bytes = text.len(), "frame received");
                    if tx.unbounded_send(TransportEvent::Frame(text.as_str().to_owned())).is_err() {
                        return;
                    }
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    info!(?frame, "closed by peer");
                    break TransportEvent::Closed;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("read failed: {e}");
                    break TransportEvent::Error(e.to_string());
                }
                None => break TransportEvent::Closed,
            }
        }
    };
    let _ = tx.unbounded_send(last);
}
