//! Text frames of the Engine.IO v4 / Socket.IO wire format.
//!
//! Only the handful of packet types the listener reacts to are decoded;
//! anything else comes back as [`Frame::Other`].

use serde_json::Value;
use thiserror::Error;

/// Prefix of an event-carrying payload (`4` message + `2` event).
pub const EVENT_PREFIX: &str = "42";

/// Engine.IO pong, sent in reply to a server ping.
pub const PONG: &str = "3";

/// Socket.IO connect to the default namespace.
pub const NAMESPACE_CONNECT: &str = "40";

/// Event whose data is fed to the extractor.
pub const MESSAGE_EVENT: &str = "message";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("event payload is not valid JSON: {0}")]
    Json(String),

    #[error("event payload is not a JSON array")]
    NotAnArray,

    #[error("event payload has no event name")]
    MissingName,

    #[error("event name is not a string")]
    BadEventName,

    #[error("event {0:?} carries no data")]
    MissingData(String),

    #[error("message event data is not text")]
    NonTextMessage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Engine.IO open packet with its handshake JSON.
    Open(String),
    Ping,
    Pong,
    /// Namespace connect acknowledgement.
    Connected,
    Disconnect,
    /// `42["name", data]`
    Event { name: String, data: Value },
    Other(String),
}

impl Frame {
    /// The chat text of a `message` event.
    ///
    /// # Errors
    /// Returns [`FrameError::NonTextMessage`] when the event is a message
    /// but its data is not a string.
    pub fn message_text(&self) -> Result<Option<&str>, FrameError> {
        match self {
            Self::Event { name, data } if name == MESSAGE_EVENT => {
                data.as_str().map(Some).ok_or(FrameError::NonTextMessage)
            }
            _ => Ok(None),
        }
    }
}

/// Decode one inbound text frame.
///
/// # Errors
/// Returns an error when an event-carrying frame does not decode to an
/// `[event_name, event_data]` array.
pub fn decode(text: &str) -> Result<Frame, FrameError> {
    if let Some(payload) = text.strip_prefix(EVENT_PREFIX) {
        return decode_event(payload);
    }

    let frame = match text.as_bytes().first() {
        Some(b'0') => Frame::Open(text[1..].to_string()),
        Some(b'2') => Frame::Ping,
        Some(b'3') => Frame::Pong,
        Some(b'4') if text.starts_with(NAMESPACE_CONNECT) => Frame::Connected,
        Some(b'4') if text.starts_with("41") => Frame::Disconnect,
        _ => Frame::Other(text.to_string()),
    };
    Ok(frame)
}

fn decode_event(payload: &str) -> Result<Frame, FrameError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| FrameError::Json(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(FrameError::NotAnArray);
    };

    let mut items = items.into_iter();
    let name = match items.next() {
        Some(Value::String(name)) => name,
        Some(_) => return Err(FrameError::BadEventName),
        None => return Err(FrameError::MissingName),
    };
    let data = items.next().ok_or_else(|| FrameError::MissingData(name.clone()))?;

    Ok(Frame::Event { name, data })
}
