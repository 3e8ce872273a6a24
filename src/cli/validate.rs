//! Configuration validation command implementation.

use std::path::Path;

use invaders::game::reachable_fields;

use super::{load_config, CliError};

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or is invalid.
pub(crate) fn execute(config: &Path) -> Result<(), CliError> {
    println!("Validating: {}", config.display());
    let config = load_config(config)?;
    let state = config.build_state()?;

    println!();
    println!("Teams:");
    for team in state.teams() {
        let home: Vec<String> = team.owned_fields().iter().map(ToString::to_string).collect();
        let reachable = reachable_fields(&state, team.id).len();
        println!(
            "  {} {:<20} home: {:<12} reachable: {reachable}",
            team.letter,
            team.name,
            home.join(" ")
        );
    }

    let capturable = state.grid().iter().filter(|f| f.weight > 0).count();
    println!();
    println!("Summary:");
    println!("  Capturable fields: {capturable}");
    println!("  Store directory:   {}", config.store.dir.display());
    println!("  Poll interval:     {}s", config.poll_interval_secs);
    println!();
    println!("Validation successful!");

    Ok(())
}
