#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Background listener for a remote Socket.IO chat stream.

mod error;
pub mod frame;
mod listener;
pub mod transport;

pub use error::{Error, Result};
pub use frame::{Frame, FrameError};
pub use listener::{AttemptCounter, Listener};
pub use transport::{Connection, Transport, WsTransport, endpoint_url};
