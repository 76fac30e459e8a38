use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Application-level constants
pub const APP_NAME: &str = "CardioCheck";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Artificial "analysis in progress" wait used by the web client.
pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 2000;

const ENV_ANALYSIS_DELAY_MS: &str = "CARDIOCHECK_ANALYSIS_DELAY_MS";
const ENV_DEMO_SEED: &str = "CARDIOCHECK_DEMO_SEED";

/// Get the application data directory
/// ~/CardioCheck/ on all platforms. Falls back to the working directory
/// when no home directory can be resolved.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Directory holding persisted session blobs (one JSON file per key).
pub fn session_dir() -> PathBuf {
    app_data_dir().join("session")
}

/// Default `EnvFilter` directive when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,cardiocheck_lib=debug"
}

/// Runtime knobs for [`crate::service::CardioService`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Wait applied before an analysis resolves.
    #[serde(with = "millis")]
    pub analysis_delay: Duration,
    /// Seed for demo-data jitter. `None` draws from OS entropy.
    pub rng_seed: Option<u64>,
    /// Populate the store with the demo roster on entering a demo session.
    pub seed_demo_data: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            analysis_delay: Duration::from_millis(DEFAULT_ANALYSIS_DELAY_MS),
            rng_seed: None,
            seed_demo_data: true,
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by `CARDIOCHECK_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_ANALYSIS_DELAY_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.analysis_delay = Duration::from_millis(ms),
                Err(_) => tracing::warn!(
                    var = ENV_ANALYSIS_DELAY_MS,
                    value = %raw,
                    "Ignoring malformed analysis delay"
                ),
            }
        }

        if let Some(raw) = lookup(ENV_DEMO_SEED) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.rng_seed = Some(seed),
                Err(_) => tracing::warn!(
                    var = ENV_DEMO_SEED,
                    value = %raw,
                    "Ignoring malformed demo seed"
                ),
            }
        }

        config
    }

    /// Config for tests: no delay, fixed seed.
    pub fn immediate(seed: u64) -> Self {
        Self {
            analysis_delay: Duration::ZERO,
            rng_seed: Some(seed),
            seed_demo_data: true,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_ends_with_app_name() {
        assert!(app_data_dir().ends_with("CardioCheck"));
    }

    #[test]
    fn session_dir_under_app_data() {
        assert!(session_dir().starts_with(app_data_dir()));
        assert!(session_dir().ends_with("session"));
    }

    #[test]
    fn app_name_is_cardiocheck() {
        assert_eq!(APP_NAME, "CardioCheck");
    }

    #[test]
    fn default_delay_is_two_seconds() {
        let config = ServiceConfig::default();
        assert_eq!(config.analysis_delay, Duration::from_secs(2));
        assert!(config.rng_seed.is_none());
        assert!(config.seed_demo_data);
    }

    #[test]
    fn env_overrides_are_applied() {
        let config = ServiceConfig::from_lookup(|key| match key {
            "CARDIOCHECK_ANALYSIS_DELAY_MS" => Some("50".into()),
            "CARDIOCHECK_DEMO_SEED" => Some(" 42 ".into()),
            _ => None,
        });
        assert_eq!(config.analysis_delay, Duration::from_millis(50));
        assert_eq!(config.rng_seed, Some(42));
    }

    #[test]
    fn malformed_env_falls_back_to_defaults() {
        let config = ServiceConfig::from_lookup(|key| match key {
            "CARDIOCHECK_ANALYSIS_DELAY_MS" => Some("soon".into()),
            "CARDIOCHECK_DEMO_SEED" => Some("-1".into()),
            _ => None,
        });
        assert_eq!(config.analysis_delay, Duration::from_secs(2));
        assert!(config.rng_seed.is_none());
    }

    #[test]
    fn deserializes_from_json_with_partial_fields() {
        let config: ServiceConfig =
            serde_json::from_str(r#"{"analysis_delay": 10, "rng_seed": 7}"#).unwrap();
        assert_eq!(config.analysis_delay, Duration::from_millis(10));
        assert_eq!(config.rng_seed, Some(7));
        assert!(config.seed_demo_data);
    }
}
