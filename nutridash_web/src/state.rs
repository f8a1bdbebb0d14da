use std::sync::Arc;

use nutridash_core::{Catalogue, ConnectionState, RecordLog, StateReceiver};
use nutridash_listener::AttemptCounter;
use nutridash_store::FoodStore;
use tokio::sync::broadcast;

use crate::{AppError, Result};

/// Encoded push events buffered per client before it starts lagging.
pub const EVENT_CAPACITY: usize = 256;

pub struct AppState {
    pub catalogue: Catalogue,
    pub store: Option<FoodStore>,
    pub records: RecordLog,
    pub connection: StateReceiver,
    pub attempts: AttemptCounter,
    /// Remote message server shown on the dashboard.
    pub server_url: String,
    pub events: broadcast::Sender<String>,
}

impl AppState {
    pub fn new(
        catalogue: Catalogue,
        store: Option<FoodStore>,
        records: RecordLog,
        connection: StateReceiver,
        attempts: AttemptCounter,
        server_url: impl Into<String>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Arc::new(Self {
            catalogue,
            store,
            records,
            connection,
            attempts,
            server_url: server_url.into(),
            events,
        })
    }

    pub fn store(&self) -> Result<&FoodStore> {
        self.store.as_ref().ok_or(AppError::NoStore)
    }

    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        *self.connection.borrow()
    }
}
