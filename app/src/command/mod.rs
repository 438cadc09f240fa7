//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type, dispatched
//! statically from `main`.

use movieq_config::Config;
use movieq_core::{MovieLookup, RuleRegistry, movie_registry};
use movieq_providers::{OmdbProvider, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod ask;
mod info;
mod init;
mod version;

pub use ask::{AskInput, AskStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

fn retry_policy(config: &Config) -> RetryPolicy {
    RetryPolicy::from_secs(
        &config.retry.base_delays,
        config.retry.final_retries,
        config.retry.final_delay,
    )
}

/// Wire the OMDb provider into the movie rule set.
fn build_registry(config: &Config) -> anyhow::Result<RuleRegistry> {
    let omdb = &config.providers.omdb;
    if omdb.api_key.is_empty() {
        warn!(
            "No OMDb API key configured; set {} or run 'movieq init'",
            movieq_config::API_KEY_ENV
        );
    }

    let provider = OmdbProvider::new(omdb.api_key.clone(), Duration::from_secs(omdb.timeout_secs))?
        .with_base_url(omdb.base_url.clone())
        .with_retry(retry_policy(config));

    let lookup: Arc<dyn MovieLookup> = Arc::new(provider);
    let registry = movie_registry(&lookup, config.years.bounds())?;
    info!("Registered {} question patterns", registry.len());

    Ok(registry)
}
