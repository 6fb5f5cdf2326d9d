//! WebSocket Message Types
//!
//! Messages exchanged between a dashboard client and its server-side
//! session.

use serde::{Deserialize, Serialize};

use crate::dashboard::FilterEvent;
use crate::present::{DashboardView, PanelView};

/// Messages sent from client to server
///
/// Filter events and control messages share the `type` tag on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClientMessage {
    Filter(FilterEvent),
    Control(ControlMessage),
}

/// Session control messages
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Ping for keepalive
    Ping,
}

impl ClientMessage {
    /// The filter event carried by this message, if any
    pub fn into_event(self) -> Option<FilterEvent> {
        match self {
            ClientMessage::Filter(event) => Some(event),
            ClientMessage::Control(_) => None,
        }
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Session established
    Connected {
        /// Unique session identifier
        session_id: String,
    },
    /// Every panel, sent once after connecting
    Dashboard { view: Box<DashboardView> },
    /// A panel re-rendered after a filter change
    Panel { panel: Box<PanelView> },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
}
