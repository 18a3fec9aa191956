//! Configuration for the load generator.
//!
//! Configuration is merged from the following sources (highest precedence first):
//!
//! 1. Environment variables (prefixed with `LOADGEN__`)
//! 2. YAML configuration file (specified via `-c` or `--config`)
//! 3. Defaults
//!
//! Nested fields use double underscores in environment variables, for example
//! `LOADGEN__LOGGING__FILTER=loadgen=debug`. Durations are written in humantime notation:
//!
//! ```yaml
//! base_rate: 80
//! decay_rate: 0.001
//! duration: 500s
//! request_timeout: 5s
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::schedule::ProcessParameters;

/// Environment variable prefix for all configuration options.
const ENV_PREFIX: &str = "LOADGEN__";

/// Load generator configuration.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Arrivals per second at the start of the test.
    pub base_rate: f64,

    /// Exponential decay constant of the arrival rate, per second.
    pub decay_rate: f64,

    /// Length of the test window.
    #[serde(with = "humantime_serde")]
    pub duration: Duration,

    /// Upper bound for a single request, including reading the response.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Seed for the arrival process. A random seed is used if unset.
    pub seed: Option<u64>,

    /// Logging configuration.
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_rate: 80.0,
            decay_rate: 0.001,
            duration: Duration::from_secs(500),
            request_timeout: Duration::from_secs(5),
            seed: None,
            logging: Logging::default(),
        }
    }
}

impl Config {
    /// Loads configuration from defaults, an optional YAML file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = figment::Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// The arrival process described by this configuration.
    pub fn process_parameters(&self) -> ProcessParameters {
        ProcessParameters::new(
            self.base_rate,
            self.decay_rate,
            self.duration.as_secs_f64(),
        )
    }
}

/// Logging configuration.
///
/// Logs are written to stderr, so that request results on stdout can be piped. `RUST_LOG`
/// takes precedence over `filter` when set.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Logging {
    /// Log filter in `RUST_LOG` syntax, such as `warn` or `info,loadgen=debug`.
    pub filter: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = Config::load(None).unwrap();

            let params = config.process_parameters();
            assert_eq!(params, ProcessParameters::new(80.0, 0.001, 500.0));
            assert_eq!(config.request_timeout, Duration::from_secs(5));
            assert_eq!(config.seed, None);
            assert_eq!(config.logging.filter, "info");

            Ok(())
        });
    }

    #[test]
    fn configurable_via_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("LOADGEN__BASE_RATE", "20");
            jail.set_env("LOADGEN__DECAY_RATE", "0.5");
            jail.set_env("LOADGEN__DURATION", "1m");
            jail.set_env("LOADGEN__SEED", "1234");
            jail.set_env("LOADGEN__LOGGING__FILTER", "warn,loadgen=debug");

            let config = Config::load(None).unwrap();

            assert_eq!(config.base_rate, 20.0);
            assert_eq!(config.decay_rate, 0.5);
            assert_eq!(config.duration, Duration::from_secs(60));
            assert_eq!(config.seed, Some(1234));
            assert_eq!(config.logging.filter, "warn,loadgen=debug");

            Ok(())
        });
    }

    #[test]
    fn configured_with_env_and_yaml() {
        let mut tempfile = tempfile::NamedTempFile::new().unwrap();
        tempfile
            .write_all(
                br#"
            base_rate: 10
            decay_rate: 0
            duration: 10s
            request_timeout: 250ms
            "#,
            )
            .unwrap();

        figment::Jail::expect_with(|jail| {
            jail.set_env("LOADGEN__BASE_RATE", "12.5");

            let config = Config::load(Some(tempfile.path())).unwrap();

            // Env should overwrite the yaml config
            assert_eq!(config.base_rate, 12.5);
            assert_eq!(config.decay_rate, 0.0);
            assert_eq!(config.duration, Duration::from_secs(10));
            assert_eq!(config.request_timeout, Duration::from_millis(250));

            Ok(())
        });
    }
}
