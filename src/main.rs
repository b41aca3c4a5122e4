//! Generate the run charts for the current project.
//!
//! Takes no arguments. Exits non-zero if an export cannot be loaded or any
//! chart fails to render.

use anyhow::{bail, Context};
use ledger_charts::config::{self, ChartConfig};
use ledger_charts::{generate_charts, logging};

fn main() -> anyhow::Result<()> {
    logging::init();

    let root = config::resolve_root().context("Failed to locate project root")?;
    let config = ChartConfig::load(&root).context("Failed to load chart settings")?;
    let paths = config.paths(&root);

    let report = generate_charts(&paths, &config).context("Chart generation aborted")?;

    let failures = report.failures();
    if !failures.is_empty() {
        let names: Vec<&str> = failures.iter().map(|(kind, _)| kind.stem()).collect();
        bail!("Failed to render {}", names.join(", "));
    }

    Ok(())
}
