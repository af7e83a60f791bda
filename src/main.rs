//! feedback-curator - feedback curation background service
//!
//! Accumulates user correction feedback from a prompt-classification front
//! end and curates a golden set of labeled examples.

use feedback_curator::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (WARN level by default, use RUST_LOG=info for more)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    cli::run().await
}
