//! One-shot cycle command implementation.

use std::path::Path;

use invaders::store::{FileStore, MemoryStore};
use invaders::view::{render_text, Snapshot};
use invaders::Reconciler;

use super::{load_config, CliError, ShowFormat};

/// Execute the show command. The cycle runs against an in-memory copy of
/// the store, so nothing on disk changes.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the cycle fails.
pub(crate) fn execute(config: &Path, format: ShowFormat) -> Result<(), CliError> {
    let config = load_config(config)?;
    let state = config.build_state()?;
    let file = FileStore::open(&config.store.dir)?;
    let snapshot = MemoryStore::snapshot(&file, &config.sheets.all())?;

    let mut reconciler = Reconciler::new(snapshot, state, config.reconcile_settings());
    let report = reconciler.run_cycle()?;

    match format {
        ShowFormat::Text => {
            print!("{}", render_text(reconciler.state(), config.problem_count));
            println!();
            println!(
                "Cycle: {} new rows, {} queued, {} captures",
                report.new_rows,
                report.queued,
                report.captures.len()
            );
            if !reconciler.warnings().is_empty() {
                println!("Warnings:");
                for warning in reconciler.warnings() {
                    println!("  {} | {} | {}", warning.team, warning.value, warning.kind);
                }
            }
        }
        ShowFormat::Json => {
            let snapshot = Snapshot::new(reconciler.state(), config.problem_count);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}
