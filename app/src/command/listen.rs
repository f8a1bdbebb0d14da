use nutridash_config::Config;
use nutridash_core::{RecordLog, connection_state_channel};
use tracing::info;

/// Strategy for running only the listener in the foreground.
///
/// Records are logged by the listener itself; this command additionally
/// reports connection state changes until Ctrl-C.
#[derive(Debug, Clone, Copy)]
pub struct ListenStrategy;

impl super::CommandStrategy for ListenStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;

        // No live subscribers here, records are only kept in the log.
        let log = RecordLog::detached(config.listener.record_capacity);
        let (state_tx, mut state_rx) = connection_state_channel();
        let (_attempts, task) = super::spawn_listener(&config, log.clone(), state_tx)?;

        loop {
            tokio::select! {
                changed = state_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    info!("Connection state: {}", *state_rx.borrow_and_update());
                }
                result = tokio::signal::ctrl_c() => {
                    result?;
                    break;
                }
            }
        }

        task.abort();
        info!("Stopped after {} records", log.total_appended());
        Ok(())
    }
}
