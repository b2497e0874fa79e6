//! Check command - Would the driver accept this device?
//!
//! Uses the driver's own reading of the list: entries are parsed as hex
//! numbers, unparseable ones are skipped, and the match is numeric.

use anyhow::Result;

use crate::cli::CommandContext;

/// Returns whether the identifier is allowed
pub fn run(ctx: &CommandContext, identifier: &str, service: Option<&str>) -> Result<bool> {
    let list = ctx.open_allowlist(service)?;
    let outcome = list.check(identifier)?;

    if ctx.is_json() {
        ctx.printer.json(&outcome)?;
        return Ok(outcome.allowed);
    }

    if outcome.allowed {
        ctx.printer.success(&format!("Allowed: {}", outcome.token));
    } else {
        ctx.printer.warning(&format!("Not listed: {}", outcome.token));
    }
    ctx.printer.kv("Normalized", &outcome.normalized);
    ctx.printer.kv("Service", &list.config().service);

    if !outcome.ignored_entries.is_empty() {
        ctx.printer.info(&format!(
            "{} stored entries are ignored by the driver:",
            outcome.ignored_entries.len()
        ));
        for entry in &outcome.ignored_entries {
            ctx.printer.item(entry, None);
        }
    }

    Ok(outcome.allowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{test_context, OutputFormat};
    use tempfile::tempdir;

    #[test]
    fn listed_identifier_is_allowed() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), OutputFormat::Text);
        crate::cli::commands::add::run(&ctx, "ABC-123&0&1", None).unwrap();

        assert!(run(&ctx, "abc-123", None).unwrap());
        assert!(!run(&ctx, "XYZ", None).unwrap());
        assert!(!run(&ctx, "ABC-123", Some("OtherDriver")).unwrap());
    }

    #[test]
    fn json_output() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path(), OutputFormat::Json);
        assert!(!run(&ctx, "ABC-123", None).unwrap());
    }
}
