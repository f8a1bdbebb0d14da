//! Socket abstraction for the listener.
//!
//! [`WsTransport`] opens real WebSocket connections; tests drive the
//! listener through scripted implementations of the same traits.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;
use url::Url;

use crate::{Error, Result};

/// An open, bidirectional text connection.
#[async_trait]
pub trait Connection: Send {
    async fn send_text(&mut self, text: &str) -> Result<()>;

    /// Next inbound text frame. `None` once the peer has closed the stream.
    async fn next_text(&mut self) -> Option<Result<String>>;

    async fn close(&mut self);
}

/// Opens connections to an endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn connect(&self, endpoint: &Url) -> Result<Box<dyn Connection>>;
}

/// `tokio-tungstenite` client transport (`ws://` and `wss://`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WsTransport;

#[async_trait]
impl Transport for WsTransport {
    async fn connect(&self, endpoint: &Url) -> Result<Box<dyn Connection>> {
        let (stream, response) = connect_async(endpoint.as_str()).await?;
        debug!("WebSocket handshake completed: HTTP {}", response.status());
        Ok(Box::new(WsConnection { stream }))
    }
}

struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Connection for WsConnection {
    async fn send_text(&mut self, text: &str) -> Result<()> {
        self.stream
            .send(Message::Text(text.to_owned().into()))
            .await?;
        Ok(())
    }

    async fn next_text(&mut self) -> Option<Result<String>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text.as_str().to_owned())),
                Ok(Message::Close(frame)) => {
                    debug!("Server closed the connection: {frame:?}");
                    return None;
                }
                // tungstenite queues the pong itself
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => {}
                Ok(Message::Binary(bytes)) => {
                    debug!("Ignoring {} byte binary frame", bytes.len());
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!("Error while closing WebSocket: {e}");
        }
    }
}

/// Build the Socket.IO endpoint from the server root, e.g.
/// `wss://host` -> `wss://host/socket.io/?EIO=4&transport=websocket`.
/// `http`/`https` roots are mapped to `ws`/`wss`.
pub fn endpoint_url(root_url: &str) -> Result<Url> {
    let base = root_url.trim().trim_end_matches('/');
    let mut url = Url::parse(&format!("{base}/socket.io/"))?;

    let scheme = match url.scheme() {
        "ws" | "http" => "ws",
        "wss" | "https" => "wss",
        other => return Err(Error::UnsupportedScheme(other.to_string())),
    };
    if url.set_scheme(scheme).is_err() {
        return Err(Error::UnsupportedScheme(url.scheme().to_string()));
    }

    url.query_pairs_mut()
        .append_pair("EIO", "4")
        .append_pair("transport", "websocket");
    Ok(url)
}
