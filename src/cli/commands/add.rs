//! Add command - Hash an identifier and put its token on the list

use anyhow::Result;

use devguard::allowlist::AddOutcome;

use crate::cli::CommandContext;

pub fn run(ctx: &CommandContext, identifier: &str, service: Option<&str>) -> Result<()> {
    let list = ctx.open_allowlist(service)?;
    let outcome = list.add(identifier)?;

    if ctx.is_json() {
        ctx.printer.json(&outcome)?;
        return Ok(());
    }

    match &outcome {
        AddOutcome::Added { token, normalized } => {
            ctx.printer.success(&format!("Added: {token}"));
            ctx.printer.kv("From serial", normalized);
        }
        AddOutcome::AlreadyExists { token, .. } => {
            ctx.printer.warning(&format!("Already exists: {token}"));
        }
    }

    if outcome.normalized().is_empty() {
        ctx.printer
            .warning("Identifier is empty after normalization; every blank serial maps to this token");
    }

    Ok(())
}
