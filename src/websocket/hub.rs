//! WebSocket Connection Hub
//!
//! Tracks live dashboard sessions and their outbound channels, and caps
//! how many may be open at once.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};

use super::messages::ServerMessage;

/// Unique identifier for a WebSocket connection
pub type ConnectionId = String;

/// Manages all WebSocket connections
pub struct ConnectionHub {
    /// Active connections: ConnectionId → outbound channel
    connections: Arc<RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<ServerMessage>>>>,
    /// Configuration
    config: HubConfig,
}

/// Configuration for the connection hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 256,
        }
    }
}

impl ConnectionHub {
    /// Create a new connection hub
    pub fn new(config: HubConfig) -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Register a connection under its session id
    ///
    /// Fails once the connection limit has been reached.
    pub async fn register(
        &self,
        id: ConnectionId,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<(), HubError> {
        let mut connections = self.connections.write().await;
        if connections.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }
        connections.insert(id.clone(), sender);

        tracing::info!(connection_id = %id, active = connections.len(), "WebSocket connected");
        Ok(())
    }

    /// Unregister a connection
    pub async fn unregister(&self, id: &str) {
        let remaining = {
            let mut connections = self.connections.write().await;
            connections.remove(id);
            connections.len()
        };

        tracing::info!(connection_id = %id, active = remaining, "WebSocket disconnected");
    }

    /// Send a message directly to a specific connection
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let connections = self.connections.read().await;
        let sender = connections.get(id).ok_or(HubError::ConnectionNotFound)?;

        sender.send(message).map_err(|_| HubError::SendFailed)
    }

    /// Get the current connection count
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub fn max_connections(&self) -> usize {
        self.config.max_connections
    }
}

/// Errors that can occur in the connection hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections (limit: {0})")]
    TooManyConnections(usize),

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Failed to send message")]
    SendFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_unregister() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        hub.register("a".to_string(), tx).await.unwrap();
        assert_eq!(hub.connection_count().await, 1);

        hub.unregister("a").await;
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_connection_limit() {
        let hub = ConnectionHub::new(HubConfig { max_connections: 1 });
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        hub.register("a".to_string(), tx1).await.unwrap();
        let err = hub.register("b".to_string(), tx2).await.unwrap_err();
        assert!(matches!(err, HubError::TooManyConnections(1)));
        assert_eq!(err.to_string(), "Too many connections (limit: 1)");
    }

    #[tokio::test]
    async fn test_send_to() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.register("a".to_string(), tx).await.unwrap();

        hub.send_to("a", ServerMessage::Pong).await.unwrap();
        assert!(matches!(rx.recv().await, Some(ServerMessage::Pong)));

        assert!(matches!(
            hub.send_to("missing", ServerMessage::Pong).await,
            Err(HubError::ConnectionNotFound)
        ));
    }
}
