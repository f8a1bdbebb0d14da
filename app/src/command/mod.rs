//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use nutridash_config::Config;
use nutridash_core::{Extractor, RecordLog, StateSender};
use nutridash_listener::{AttemptCounter, Listener, WsTransport};
use nutridash_store::FoodStore;
use tokio::task::JoinHandle;
use tracing::{info, warn};

mod info;
mod init;
mod listen;
mod seed;
mod serve;
mod version;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use listen::ListenStrategy;
pub use seed::SeedStrategy;
pub use serve::{ServeInput, ServeStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Build the listener from `config` and start it on its own task.
fn spawn_listener(
    config: &Config,
    log: RecordLog,
    state: StateSender,
) -> anyhow::Result<(AttemptCounter, JoinHandle<()>)> {
    let extractor = Extractor::new(&config.extraction)?;
    let listener = Listener::new(&config.listener, extractor, log, state, WsTransport)?;
    info!("Starting listener for {}", listener.endpoint());

    let attempts = listener.attempts();
    Ok((attempts, tokio::spawn(listener.run())))
}

/// Connect to the configured database, or `None` when it is disabled or
/// unreachable. The dashboard keeps working without it.
async fn open_store(config: &Config) -> Option<FoodStore> {
    if !config.database.is_enabled() {
        info!("No database configured, persisted endpoints disabled");
        return None;
    }

    match FoodStore::connect(&config.database.url).await {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("Database unavailable, persisted endpoints disabled: {e}");
            None
        }
    }
}
