//! Init command - Generate configuration file

use std::path::Path;

use anyhow::Result;
use tracing::info;

use devguard::config::write_default_config;

use crate::cli::CommandContext;

pub fn run(ctx: &CommandContext, output: &Path, force: bool) -> Result<()> {
    info!("Generating config file: {}", output.display());

    write_default_config(output, force)?;

    ctx.printer.success("Configuration file created");
    ctx.printer.kv("Location", &output.display().to_string());
    ctx.printer.dimmed(&format!(
        "Edit {} to choose the driver service and store backend.",
        output.display()
    ));

    Ok(())
}
