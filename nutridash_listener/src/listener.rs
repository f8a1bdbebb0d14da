use nutridash_config::ListenerConfig;
use nutridash_core::{
    ConnectionState, ExtractedRecord, Extractor, InboundMessage, RecordLog, StateSender,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::frame::{self, Frame, FrameError, NAMESPACE_CONNECT, PONG};
use crate::transport::{Connection, Transport, endpoint_url};
use crate::Result;

/// Number of connection attempts made so far. Cloning shares the counter.
#[derive(Debug, Clone, Default)]
pub struct AttemptCounter(Arc<AtomicU64>);

impl AttemptCounter {
    #[must_use]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn increment(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Keeps one connection to the remote message stream alive forever and
/// feeds every chat message to the extractor.
pub struct Listener<T: Transport> {
    endpoint: Url,
    probe: String,
    reconnect_delay: Duration,
    extractor: Extractor,
    log: RecordLog,
    state: StateSender,
    transport: T,
    attempts: AttemptCounter,
}

impl<T: Transport> Listener<T> {
    /// Create a listener for the endpoint described by `config`.
    pub fn new(
        config: &ListenerConfig,
        extractor: Extractor,
        log: RecordLog,
        state: StateSender,
        transport: T,
    ) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint_url(&config.root_url)?,
            probe: config.probe.clone(),
            reconnect_delay: Duration::from_secs(config.reconnect_delay_secs),
            extractor,
            log,
            state,
            transport,
            attempts: AttemptCounter::default(),
        })
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Shared handle to the attempt counter, for status reporting.
    #[must_use]
    pub fn attempts(&self) -> AttemptCounter {
        self.attempts.clone()
    }

    /// Connect, read until the connection drops, wait the fixed delay, and
    /// start over. Never returns; stop it by dropping or aborting the task.
    pub async fn run(self) {
        loop {
            let attempt = self.attempts.increment();
            info!(
                "Connecting to WebSocket server (attempt {attempt}): {}",
                self.endpoint
            );

            match self.transport.connect(&self.endpoint).await {
                Ok(mut conn) => {
                    self.state.send_replace(ConnectionState::Connected);
                    info!("WebSocket connection established");

                    let result = self.pump(conn.as_mut()).await;
                    // Readers must not see a dead session while the close
                    // handshake is still running.
                    self.state.send_replace(ConnectionState::Disconnected);
                    match result {
                        Ok(()) => info!("WebSocket connection closed"),
                        Err(e) => warn!("WebSocket error: {e}"),
                    }
                    conn.close().await;
                }
                Err(e) => {
                    warn!("Error in WebSocket connection: {e}");
                    self.state.send_replace(ConnectionState::Disconnected);
                }
            }

            info!(
                "WebSocket disconnected. Reconnecting in {} seconds...",
                self.reconnect_delay.as_secs()
            );
            sleep(self.reconnect_delay).await;
        }
    }

    async fn pump(&self, conn: &mut dyn Connection) -> Result<()> {
        conn.send_text(&self.probe).await?;

        while let Some(text) = conn.next_text().await {
            let text = text?;
            match self.handle_frame(&text) {
                Ok(Some(reply)) => conn.send_text(reply).await?,
                Ok(None) => {}
                Err(e) => warn!("Error processing message: {e}"),
            }
        }

        Ok(())
    }

    /// React to one inbound frame. Returns the frame to send back, if any.
    ///
    /// # Errors
    /// Returns an error for a malformed event payload; the connection stays up.
    pub fn handle_frame(
        &self,
        text: &str,
    ) -> std::result::Result<Option<&'static str>, FrameError> {
        let frame = frame::decode(text)?;
        if let Some(message) = frame.message_text()? {
            self.ingest(&InboundMessage::new(message));
            return Ok(None);
        }

        match frame {
            Frame::Open(handshake) => {
                debug!("Engine.IO handshake: {handshake}");
                Ok(Some(NAMESPACE_CONNECT))
            }
            Frame::Ping => Ok(Some(PONG)),
            Frame::Event { name, .. } => {
                debug!("Ignoring event: {name}");
                Ok(None)
            }
            other => {
                debug!("Ignoring frame: {other:?}");
                Ok(None)
            }
        }
    }

    /// Extract, log and publish one chat message.
    pub fn ingest(&self, message: &InboundMessage) -> ExtractedRecord {
        info!("Received message: {}", message.text);
        let record = self.extractor.extract(message);

        if record.has_mention() {
            info!(
                "Extracted food={:?} calories={:?}",
                record.food_item, record.calories
            );
        }

        self.log.append(record.clone());
        record
    }
}
