//! Settings of the target server.
//!
//! Defaults are overridden by an optional YAML file (`-c`/`--config`), which in turn is overridden
//! by `LOADGEN_TARGET__` environment variables. Nested keys are separated by `__`:
//!
//! ```yaml
//! # LOADGEN_TARGET__HTTP_ADDR=127.0.0.1:9000
//! http_addr: 127.0.0.1:9000
//!
//! logging:
//!   # LOADGEN_TARGET__LOGGING__LEVEL=debug
//!   level: debug
//!   # LOADGEN_TARGET__LOGGING__FORMAT=json
//!   format: json
//! ```

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Result;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

const ENV_PREFIX: &str = "LOADGEN_TARGET__";

/// How log lines are rendered on stderr.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `pretty` when stderr is a terminal, `simplified` otherwise.
    #[default]
    Auto,
    /// Multi-line, colored output.
    Pretty,
    /// One plain line per event.
    Simplified,
    /// One JSON object per event.
    Json,
}

/// Log verbosity and rendering. `RUST_LOG` overrides `level` when set.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Logging {
    /// Most verbose level that is written, `info` by default.
    #[serde(with = "level_filter")]
    pub level: LevelFilter,
    /// Output format, `auto` by default.
    pub format: LogFormat,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Auto,
        }
    }
}

/// Serializes a [`LevelFilter`] through its string form (`off`, `error`, ..., `trace`).
mod level_filter {
    use std::borrow::Cow;

    use serde::{Deserialize, Deserializer, Serializer, de};
    use tracing::level_filters::LevelFilter;

    pub fn serialize<S: Serializer>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(level)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LevelFilter, D::Error> {
        let level = Cow::<str>::deserialize(deserializer)?;
        level.parse().map_err(de::Error::custom)
    }
}

/// Target server configuration.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Address to listen on, `0.0.0.0:8080` by default.
    pub http_addr: SocketAddr,
    /// Logging settings.
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            logging: Logging::default(),
        }
    }
}

impl Config {
    /// Merges defaults, the YAML file at `path` if given, and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")).extract()?)
    }
}
