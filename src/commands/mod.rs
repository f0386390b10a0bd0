pub mod compare;
pub mod correlate;
pub mod predict;

// Re-export command functions for convenience
pub use compare::{compare, CompareParams};
pub use correlate::{correlate, CorrelateParams};
pub use predict::{predict, PredictParams};

use anyhow::{Context, Result};
use serde::Serialize;

/// Print a chart structure as JSON on stdout
pub fn write_output<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to encode output JSON")?;

    println!("{json}");
    Ok(())
}
