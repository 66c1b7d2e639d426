// WebSocket dashboard stream

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::watch;
use tokio::time::{Duration, MissedTickBehavior, interval, timeout};

use super::AppState;
use crate::models::RenderedState;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// WS /ws/state: pushes the rendered state on connect and after every applied poll.
/// Each open socket counts as a viewer and keeps the poller running.
pub(super) async fn ws_state(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let rx = state.state_rx.clone();
    let visibility = state.visibility.clone();
    ws.on_upgrade(move |socket| async move {
        let _viewer = visibility.attach_viewer();
        tracing::info!(
            viewers = visibility.viewer_count(),
            "Dashboard viewer connected"
        );
        if let Err(e) = stream_state(socket, rx).await {
            tracing::info!("State stream error: {}", e);
        }
        tracing::info!("Dashboard viewer disconnected");
    })
}

/// false when the client is gone or too slow.
async fn send(sender: &mut SplitSink<WebSocket, Message>, msg: Message) -> bool {
    matches!(timeout(WS_SEND_TIMEOUT, sender.send(msg)).await, Ok(Ok(())))
}

async fn stream_state(
    socket: WebSocket,
    mut rx: watch::Receiver<RenderedState>,
) -> anyhow::Result<()> {
    let (mut sender, mut receiver) = socket.split();

    let json = serde_json::to_string(&*rx.borrow_and_update())?;
    if !send(&mut sender, Message::Text(json.into())).await {
        return Ok(());
    }

    let mut ping_interval = interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let json = serde_json::to_string(&*rx.borrow_and_update())?;
                if !send(&mut sender, Message::Text(json.into())).await {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            _ = ping_interval.tick() => {
                if !send(&mut sender, Message::Ping(Bytes::new())).await {
                    break;
                }
            }
        }
    }
    Ok(())
}
