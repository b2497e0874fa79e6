//! Hash command - Show the token for an identifier without touching the store

use anyhow::Result;
use serde::Serialize;

use devguard::fingerprinting::{FingerprintHasher, FingerprintToken, SerialNormalizer};

use crate::cli::CommandContext;

#[derive(Debug, Serialize)]
struct HashReport {
    normalized: String,
    token: FingerprintToken,
}

pub fn run(ctx: &CommandContext, identifier: &str) -> Result<()> {
    let normalized = SerialNormalizer::normalize(identifier);
    let token = FingerprintHasher::hash_normalized(&normalized);

    if ctx.is_json() {
        ctx.printer.json(&HashReport { normalized, token })?;
        return Ok(());
    }

    ctx.printer.kv("Normalized", &normalized);
    ctx.printer.kv("Hash", &token.to_string());
    Ok(())
}
