//! WebSocket Dashboard Sessions
//!
//! Interactive filtering over a WebSocket. Each connection gets its own
//! `Session`; filter events re-render only the panels they affect.
//!
//! ## Architecture
//!
//! - **ConnectionHub**: Tracks live connections and enforces the session cap
//! - **Handler**: Handles WebSocket upgrade and message processing
//! - **Messages**: Defines client and server message formats
//!
//! ## Example
//!
//! ```javascript
//! // Browser
//! const ws = new WebSocket('ws://localhost:8501/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'select_location', value: 'Downtown'}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'panel') redraw(msg.panel);
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{ConnectionHub, HubConfig, HubError};
pub use messages::{ClientMessage, ControlMessage, ServerMessage};
