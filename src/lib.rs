//! Library root for `calm-bot`.
//!
//! Calm-bot is a small Slack app that listens on Socket Mode and answers:
//! - the `/calm` slash command with a thank-you acknowledgment
//! - `@`-mentions with a greeting in the channel
//! - direct messages with a fixed reply
//!
//! Event routing lives in [`interaction`], Slack plumbing in [`service`].

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Installs the crypto provider, builds the runtime (dispatcher and Slack
/// client), and serves events until the process is interrupted.
pub async fn start(config: Config) -> Void {
    info!("Starting calm-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the default crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
