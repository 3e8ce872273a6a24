//! Polling loop command implementation.

use std::path::Path;
use std::time::Duration;

use invaders::store::FileStore;
use invaders::Reconciler;
use tracing::info;

use super::{load_config, CliError};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the store directory
/// cannot be opened, or any cycle of a bounded run failed.
pub(crate) fn execute(config: &Path, interval: Option<u64>, cycles: Option<u64>) -> Result<(), CliError> {
    let config = load_config(config)?;
    let state = config.build_state()?;
    let store = FileStore::open(&config.store.dir)?;
    let interval = interval.map_or_else(|| config.poll_interval(), Duration::from_secs);

    info!(
        teams = state.teams().len(),
        store = %store.dir().display(),
        interval_secs = interval.as_secs(),
        "starting"
    );

    let mut reconciler = Reconciler::new(store, state, config.reconcile_settings());
    let summary = reconciler.run(interval, cycles);

    if summary.failures > 0 {
        return Err(CliError::new(format!(
            "{} of {} cycles failed",
            summary.failures, summary.cycles
        )));
    }
    Ok(())
}
