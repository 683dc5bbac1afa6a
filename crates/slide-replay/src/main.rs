//! Replays a scripted carousel session and prints what happened.
//!
//! Usage: `slide-replay <script.json>`. Set `RUST_LOG=debug` to see every
//! step and suppressed tick.

mod script;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::script::Script;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: slide-replay <script.json>");
    };

    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read script {}", path))?;
    let script = Script::from_json(&json)?;

    info!(script = %path, steps = script.steps.len(), "replaying");
    let report = script.run()?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
