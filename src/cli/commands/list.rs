//! List command - Show the stored fingerprint tokens

use anyhow::Result;
use serde::Serialize;

use devguard::allowlist::parse_for_driver;

use crate::cli::CommandContext;

#[derive(Debug, Serialize)]
struct ListReport<'a> {
    service: &'a str,
    value_name: &'a str,
    backend: &'static str,
    count: usize,
    entries: &'a [String],
    /// Entries the driver would skip when loading the list
    ignored_by_driver: &'a [String],
}

pub fn run(ctx: &CommandContext, service: Option<&str>) -> Result<()> {
    let list = ctx.open_allowlist(service)?;
    let entries = list.list()?;
    let view = parse_for_driver(&entries);
    let config = list.config();

    if ctx.is_json() {
        ctx.printer.json(&ListReport {
            service: &config.service,
            value_name: &config.value_name,
            backend: list.store().backend_name(),
            count: entries.len(),
            entries: &entries,
            ignored_by_driver: &view.ignored,
        })?;
        return Ok(());
    }

    ctx.printer.header(&format!(
        "[{}] {} ({} items):",
        config.service,
        config.value_name,
        entries.len()
    ));
    for entry in &entries {
        let note = view
            .ignored
            .contains(entry)
            .then_some("not a valid token, ignored by the driver");
        ctx.printer.item(entry, note);
    }

    Ok(())
}
