use movieq_config::Config;
use std::time::Duration;

/// Strategy for displaying configuration information.
///
/// Outputs the OMDb settings (API key masked), the retry schedule, the year
/// window and every question pattern in matching order.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== movieq Configuration ===\n");

        println!("OMDb:");
        println!("  API Key: {}", mask_api_key(&config.providers.omdb.api_key));
        println!("  Base URL: {}", config.providers.omdb.base_url);
        println!("  Timeout: {}s", config.providers.omdb.timeout_secs);
        println!();

        let retry = super::retry_policy(&config);
        println!("Retry:");
        println!("  Attempts: {}", retry.attempts());
        println!("  Waits: {}", format_waits(&retry.waits()));
        println!();

        println!("Years:");
        println!("  Earliest: {}", config.years.earliest);
        println!("  Latest: {}", config.years.latest);
        println!();

        let registry = super::build_registry(&config)?;
        println!("Questions:");
        for rule in registry.rules() {
            println!("  {:<40} -> {}", rule.pattern.to_string(), rule.action.name());
        }

        Ok(())
    }
}

fn format_waits(waits: &[Duration]) -> String {
    if waits.is_empty() {
        return "(none)".to_string();
    }
    waits
        .iter()
        .map(|wait| format!("{}s", wait.as_secs()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn mask_api_key(key: &str) -> String {
    if key.is_empty() {
        "(not set)".to_string()
    } else if key.len() > 8 && key.is_ascii() {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_waits_lists_actual_schedule() {
        let policy = movieq_providers::RetryPolicy::from_secs(&[1, 2], 1, 4);
        assert_eq!(format_waits(&policy.waits()), "1s, 2s");
        assert_eq!(format_waits(&[]), "(none)");
    }

    #[test]
    fn mask_api_key_hides_the_middle() {
        assert_eq!(mask_api_key(""), "(not set)");
        assert_eq!(mask_api_key("short"), "***");
        assert_eq!(mask_api_key("abcd1234wxyz"), "abcd...wxyz");
    }
}
