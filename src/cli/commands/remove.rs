//! Remove command - Take a token off the list

use anyhow::Result;

use devguard::fingerprinting::FingerprintToken;

use crate::cli::CommandContext;

pub fn run(ctx: &CommandContext, token: &str, service: Option<&str>) -> Result<()> {
    // Malformed tokens are still removed; the list may hold anything
    let malformed = FingerprintToken::parse(token).err();

    let list = ctx.open_allowlist(service)?;
    let outcome = list.remove(token)?;

    if ctx.is_json() {
        ctx.printer.json(&outcome)?;
        return Ok(());
    }

    if let Some(err) = malformed {
        ctx.printer.warning(&format!("Not a well-formed token: {err}"));
    }
    ctx.printer.success(&format!("Removed: {}", outcome.token));
    if !outcome.was_present {
        ctx.printer.dimmed("  (token was not on the list)");
    }
    ctx.printer.kv("Remaining", &outcome.remaining.to_string());

    Ok(())
}
