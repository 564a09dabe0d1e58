//! WebSocket implementation of the push frame channel.
//!
//! The backend streams [`StreamEvent`]s as JSON text frames on
//! `{ws_base}/browser/ws/{session_id}`.  This module only adapts that
//! socket to the [`PushChannel`]/[`PushStream`] traits; the decision of
//! what to do when the channel dies belongs to the connection manager.

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use viewport_core::{SessionId, StreamEvent};

use crate::application::connection::{PushChannel, PushStream, TransportError};

/// Opens WebSocket push channels against a fixed base URL.
#[derive(Debug, Clone)]
pub struct WsPushChannel {
    ws_base: String,
}

impl WsPushChannel {
    /// `ws_base` is the WebSocket base URL including any API prefix,
    /// e.g. `ws://127.0.0.1:8001/api`.
    pub fn new(ws_base: &str) -> Self {
        Self {
            ws_base: ws_base.trim_end_matches('/').to_string(),
        }
    }

    fn session_url(&self, session: &SessionId) -> String {
        format!("{}/browser/ws/{session}", self.ws_base)
    }
}

#[async_trait]
impl PushChannel for WsPushChannel {
    async fn connect(&self, session: &SessionId) -> Result<Box<dyn PushStream>, TransportError> {
        let url = self.session_url(session);
        debug!(%session, "opening push channel at {url}");
        let (socket, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        Ok(Box::new(WsPushStream { socket }))
    }
}

struct WsPushStream {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl PushStream for WsPushStream {
    async fn next_event(&mut self) -> Option<StreamEvent> {
        loop {
            let message = self.socket.next().await?;
            match message {
                Ok(WsMessage::Text(text)) => match serde_json::from_str(&text) {
                    Ok(event) => return Some(event),
                    // An event this client does not know is not fatal;
                    // skip it and keep the channel alive.
                    Err(e) => debug!("ignoring unrecognized stream event: {e}"),
                },
                // Protocol-level ping/pong is handled by tungstenite.
                Ok(WsMessage::Ping(_)) | Ok(WsMessage::Pong(_)) => {}
                Ok(WsMessage::Close(_)) => return None,
                Ok(other) => debug!("ignoring non-text frame: {other:?}"),
                Err(e) => {
                    warn!("push channel error: {e}");
                    return None;
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_url_is_built_from_base_and_session() {
        let channel = WsPushChannel::new("ws://127.0.0.1:8001/api");
        let url = channel.session_url(&SessionId("sess-42".to_string()));
        assert_eq!(url, "ws://127.0.0.1:8001/api/browser/ws/sess-42");
    }

    #[test]
    fn test_trailing_slash_on_base_is_tolerated() {
        let channel = WsPushChannel::new("wss://viewport.example.com/api/");
        let url = channel.session_url(&SessionId("s".to_string()));
        assert_eq!(url, "wss://viewport.example.com/api/browser/ws/s");
    }
}
