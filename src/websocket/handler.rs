//! WebSocket Handler
//!
//! Upgrades `/ws` requests and runs one dashboard session per connection.
//! The session's filter state lives in the receive task and is dropped
//! with the connection.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::hub::ConnectionHub;
use super::messages::{ClientMessage, ServerMessage};
use crate::api::AppState;
use crate::dashboard::{Dashboard, Session};

/// WebSocket upgrade handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let hub = Arc::clone(&state.ws_hub);
    let dashboard = Arc::clone(&state.dashboard);
    ws.on_upgrade(move |socket| handle_socket(socket, hub, dashboard))
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, hub: Arc<ConnectionHub>, dashboard: Arc<Dashboard>) {
    let (mut sender, mut receiver) = socket.split();

    // Channel feeding this connection's writer
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let mut session = Session::new();
    let connection_id = session.id.to_string();

    if let Err(e) = hub.register(connection_id.clone(), tx).await {
        tracing::warn!(error = %e, "Rejected WebSocket connection");
        let error_msg = ServerMessage::Error {
            message: e.to_string(),
        };
        if let Ok(text) = serde_json::to_string(&error_msg) {
            let _ = sender.send(Message::Text(text)).await;
        }
        return;
    }

    // Greeting and the initial page
    let _ = hub
        .send_to(
            &connection_id,
            ServerMessage::Connected {
                session_id: connection_id.clone(),
            },
        )
        .await;
    let _ = hub
        .send_to(
            &connection_id,
            ServerMessage::Dashboard {
                view: Box::new(session.render(&dashboard)),
            },
        )
        .await;

    let conn_id_for_send = connection_id.clone();

    // Task to forward messages from channel to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        tracing::debug!(
                            connection_id = %conn_id_for_send,
                            "WebSocket send failed, closing connection"
                        );
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize message");
                }
            }
        }
    });

    let hub_for_recv = Arc::clone(&hub);
    let conn_id_for_recv = connection_id.clone();

    // Task to receive client events and re-render
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_ws_message(
                        &hub_for_recv,
                        &dashboard,
                        &mut session,
                        &conn_id_for_recv,
                        msg,
                    )
                    .await
                    {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %conn_id_for_recv,
                        error = %e,
                        "WebSocket receive error"
                    );
                    break;
                }
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    hub.unregister(&connection_id).await;
}

/// Handle a received WebSocket message
///
/// Returns false if the connection should be closed.
async fn handle_ws_message(
    hub: &ConnectionHub,
    dashboard: &Dashboard,
    session: &mut Session,
    connection_id: &str,
    message: Message,
) -> bool {
    match message {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    for reply in handle_client_message(dashboard, session, client_msg) {
                        let _ = hub.send_to(connection_id, reply).await;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        text = %text,
                        "Invalid client message"
                    );
                    // Keep the connection open
                    let error_msg = ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    };
                    let _ = hub.send_to(connection_id, error_msg).await;
                }
            }
            true
        }
        Message::Binary(_) => {
            let error_msg = ServerMessage::Error {
                message: "Binary messages not supported".to_string(),
            };
            let _ = hub.send_to(connection_id, error_msg).await;
            true
        }
        // Axum answers pings itself
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(connection_id = %connection_id, "Client requested close");
            false
        }
    }
}

/// Replies to a parsed client message
fn handle_client_message(
    dashboard: &Dashboard,
    session: &mut Session,
    message: ClientMessage,
) -> Vec<ServerMessage> {
    match message.into_event() {
        Some(event) => session
            .dispatch(dashboard, event)
            .into_iter()
            .map(|panel| ServerMessage::Panel {
                panel: Box::new(panel),
            })
            .collect(),
        None => vec![ServerMessage::Pong],
    }
}
