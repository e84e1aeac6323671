//! WebSocket upgrade handler and session loop

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::{AppState, ConnectedPeer};
use crate::game::PeerCommand;
use crate::util::rate_limit::PeerRateLimiter;
use crate::util::time::unix_millis;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Preferred display name (the client's persisted local preference)
    pub name: Option<String>,
}

/// WebSocket upgrade handler. Each connection becomes a peer with a fresh
/// id; login/identity flow is outside this server.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> Response {
    let peer_id = Uuid::new_v4();
    info!(peer_id = %peer_id, "WebSocket upgrade");
    ws.on_upgrade(move |socket| handle_socket(socket, peer_id, query.name, state))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(
    socket: WebSocket,
    peer_id: Uuid,
    display_name: Option<String>,
    state: AppState,
) {
    info!(peer_id = %peer_id, "New WebSocket connection");

    state.peers.insert(
        peer_id,
        ConnectedPeer {
            connected_at: unix_millis(),
        },
    );

    let (mut ws_sink, ws_stream) = socket.split();

    // Send welcome message
    let welcome = ServerMsg::Welcome {
        peer_id,
        server_time: unix_millis(),
    };
    if let Err(e) = send_msg(&mut ws_sink, &welcome).await {
        error!(peer_id = %peer_id, error = %e, "Failed to send welcome");
        state.peers.remove(&peer_id);
        return;
    }

    let command_tx = state.arena.command_tx.clone();
    let broadcast_rx = state.arena.broadcast_tx.subscribe();

    run_session(
        peer_id,
        display_name,
        ws_sink,
        ws_stream,
        command_tx,
        broadcast_rx,
    )
    .await;

    // Cleanup on disconnect
    state.peers.remove(&peer_id);
    info!(peer_id = %peer_id, "WebSocket connection closed");
}

/// Run the WebSocket session with read/write split. `preferred_name` is the
/// connection's `?name=` query value, substituted into a `Join` that carries
/// no display name of its own.
async fn run_session(
    peer_id: Uuid,
    preferred_name: Option<String>,
    mut ws_sink: futures::stream::SplitSink<WebSocket, Message>,
    mut ws_stream: futures::stream::SplitStream<WebSocket>,
    command_tx: mpsc::Sender<PeerCommand>,
    mut broadcast_rx: broadcast::Receiver<ServerMsg>,
) {
    let rate_limiter = PeerRateLimiter::new();

    // Spawn writer task: arena broadcasts -> WebSocket
    let writer_peer_id = peer_id;
    let writer_handle = tokio::spawn(async move {
        loop {
            match broadcast_rx.recv().await {
                Ok(msg) => {
                    if let Err(e) = send_msg(&mut ws_sink, &msg).await {
                        debug!(peer_id = %writer_peer_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(
                        peer_id = %writer_peer_id,
                        lagged_count = n,
                        "Client lagged, skipping {} messages", n
                    );
                    // Continue - don't disconnect for lag
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(peer_id = %writer_peer_id, "Broadcast channel closed");
                    break;
                }
            }
        }
    });

    // Reader loop: WebSocket -> arena task
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check_input() {
                    warn!(peer_id = %peer_id, "Rate limited input message");
                    continue;
                }

                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(client_msg) => {
                        let command = PeerCommand {
                            peer_id,
                            msg: with_default_name(client_msg, &preferred_name),
                            received_at: unix_millis(),
                        };

                        if command_tx.send(command).await.is_err() {
                            debug!(peer_id = %peer_id, "Command channel closed");
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(peer_id = %peer_id, error = %e, "Failed to parse client message");
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(peer_id = %peer_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) => {
                debug!(peer_id = %peer_id, "Received ping");
            }
            Ok(Message::Pong(_)) => {
                debug!(peer_id = %peer_id, "Received pong");
            }
            Ok(Message::Close(_)) => {
                info!(peer_id = %peer_id, "Client initiated close");
                break;
            }
            Err(e) => {
                error!(peer_id = %peer_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Signal disconnect to the arena so the entity despawns
    let _ = command_tx
        .send(PeerCommand {
            peer_id,
            msg: ClientMsg::Leave,
            received_at: unix_millis(),
        })
        .await;

    // Abort writer task
    writer_handle.abort();
}

/// Fill a `Join` that carries no display name with the connection's
/// `?name=` preference; every other message passes through untouched.
fn with_default_name(msg: ClientMsg, preferred: &Option<String>) -> ClientMsg {
    match msg {
        ClientMsg::Join { display_name: None } => ClientMsg::Join {
            display_name: preferred.clone(),
        },
        other => other,
    }
}

/// Send a message over WebSocket
async fn send_msg(
    sink: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMsg,
) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json))
        .await
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_name_backfills_anonymous_join() {
        let preferred = Some("Alice".to_string());
        let msg = with_default_name(ClientMsg::Join { display_name: None }, &preferred);
        match msg {
            ClientMsg::Join { display_name } => {
                assert_eq!(display_name.as_deref(), Some("Alice"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn explicit_join_name_wins_over_query_name() {
        let preferred = Some("Alice".to_string());
        let msg = with_default_name(
            ClientMsg::Join {
                display_name: Some("Bob".to_string()),
            },
            &preferred,
        );
        match msg {
            ClientMsg::Join { display_name } => {
                assert_eq!(display_name.as_deref(), Some("Bob"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn non_join_messages_pass_through() {
        let preferred = Some("Alice".to_string());
        let msg = with_default_name(ClientMsg::Ping { t: 42 }, &preferred);
        assert!(matches!(msg, ClientMsg::Ping { t: 42 }));
    }
}
