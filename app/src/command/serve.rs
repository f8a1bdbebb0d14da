use nutridash_config::Config;
use nutridash_core::{Catalogue, RecordLog, connection_state_channel};
use nutridash_listener::AttemptCounter;
use nutridash_web::{AppState, serve, ws::spawn_relay};
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct ServeInput {
    pub port: Option<u16>,
    pub no_listener: bool,
}

/// Strategy for running the dashboard server with the background listener.
#[derive(Debug, Clone, Copy)]
pub struct ServeStrategy;

impl super::CommandStrategy for ServeStrategy {
    type Input = ServeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let mut config = Config::load_or_default()?;
        if let Some(port) = input.port {
            config.server.port = port;
        }

        let catalogue = Catalogue::builtin()?;
        let store = super::open_store(&config).await;

        let (log, delivery) = RecordLog::with_capacity(config.listener.record_capacity);
        let (state_tx, state_rx) = connection_state_channel();

        let listener = if config.listener.enabled && !input.no_listener {
            Some(super::spawn_listener(&config, log.clone(), state_tx)?)
        } else {
            info!("Listener disabled");
            None
        };
        let attempts = listener
            .as_ref()
            .map_or_else(AttemptCounter::default, |(attempts, _)| attempts.clone());

        let state = AppState::new(
            catalogue,
            store,
            log,
            state_rx,
            attempts,
            config.listener.root_url.clone(),
        );
        let relay = spawn_relay(delivery, state.events.clone());

        serve(state, &config.server.address()).await?;

        if let Some((_, task)) = listener {
            task.abort();
        }
        relay.abort();
        Ok(())
    }
}
