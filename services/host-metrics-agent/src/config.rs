//! Agent configuration, sourced once at process start.
//!
//! The destination URL comes from `PLOT_KEY`; tuning knobs come from
//! `AGENT_*` variables. An optional `.env` file is merged into the process
//! environment first.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::collectors::cpu::DEFAULT_CPU_WINDOW;
use crate::error::ConfigLoadError;

/// Environment variable holding the reporting destination URL.
pub const DESTINATION_ENV_KEY: &str = "PLOT_KEY";

/// Prefix for the remaining settings, e.g. `AGENT_CPU_WINDOW_MS`.
pub const ENV_PREFIX: &str = "AGENT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Where samples are POSTed. `None` disables remote reporting. Only ever
    /// taken from `PLOT_KEY`.
    #[serde(skip_deserializing)]
    pub destination_url: Option<String>,
    /// CPU sampling window in milliseconds. Raised to sysinfo's minimum
    /// update interval by the reader.
    pub cpu_window_ms: u64,
    /// How long to wait for an in-flight report before exiting. `0` exits
    /// immediately.
    pub report_grace_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            destination_url: None,
            cpu_window_ms: DEFAULT_CPU_WINDOW.as_millis() as u64,
            report_grace_ms: 0,
        }
    }
}

impl AgentConfig {
    /// Loads from the process environment, falling back to defaults (while
    /// still honoring the destination) when the settings are malformed.
    pub fn load() -> Self {
        let vars: HashMap<String, String> = std::env::vars().collect();
        match Self::from_vars(vars.clone()) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Error loading configuration, using defaults");
                Self {
                    destination_url: destination_from(&vars),
                    ..Self::default()
                }
            }
        }
    }

    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigLoadError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let destination = destination_from(&vars);
        let defaults = Self::default();

        let settings = Config::builder()
            .set_default("cpu_window_ms", defaults.cpu_window_ms)?
            .set_default("report_grace_ms", defaults.report_grace_ms)?
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(Some(vars)),
            )
            .build()?;

        let mut config: Self = settings.try_deserialize()?;
        config.destination_url = destination;
        Ok(config)
    }

    pub fn cpu_window(&self) -> Duration {
        Duration::from_millis(self.cpu_window_ms)
    }

    pub fn report_grace(&self) -> Duration {
        Duration::from_millis(self.report_grace_ms)
    }
}

fn destination_from(vars: &HashMap<String, String>) -> Option<String> {
    vars.get(DESTINATION_ENV_KEY)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Merges `.env` from the current directory (or a parent) into the process
/// environment. Variables already set are left untouched.
pub fn load_env_file() -> Result<PathBuf, ConfigLoadError> {
    let path = dotenvy::dotenv()?;
    info!(path = %path.display(), "Loaded environment file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_variables() {
        let config = AgentConfig::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config, AgentConfig::default());
        assert_eq!(config.cpu_window(), DEFAULT_CPU_WINDOW);
        assert_eq!(config.report_grace(), Duration::ZERO);
    }

    #[test]
    fn test_destination_from_plot_key() {
        let config =
            AgentConfig::from_vars([("PLOT_KEY", "http://localhost:3010/system-data")]).unwrap();
        assert_eq!(
            config.destination_url.as_deref(),
            Some("http://localhost:3010/system-data")
        );
    }

    #[test]
    fn test_empty_destination_disables_reporting() {
        let config = AgentConfig::from_vars([("PLOT_KEY", "  ")]).unwrap();
        assert_eq!(config.destination_url, None);
    }

    #[test]
    fn test_destination_is_only_read_from_plot_key() {
        for value in ["", "http://elsewhere.local/"] {
            let config = AgentConfig::from_vars([("AGENT_DESTINATION_URL", value)]).unwrap();
            assert_eq!(config.destination_url, None);
        }

        let config = AgentConfig::from_vars([
            ("AGENT_DESTINATION_URL", "http://elsewhere.local/"),
            ("PLOT_KEY", "http://collector.local/"),
        ])
        .unwrap();
        assert_eq!(config.destination_url.as_deref(), Some("http://collector.local/"));
    }

    #[test]
    fn test_prefixed_overrides() {
        let config = AgentConfig::from_vars([
            ("AGENT_CPU_WINDOW_MS", "50"),
            ("AGENT_REPORT_GRACE_MS", "1500"),
            ("UNRELATED", "ignored"),
        ])
        .unwrap();
        assert_eq!(config.cpu_window_ms, 50);
        assert_eq!(config.report_grace_ms, 1500);
        assert_eq!(config.destination_url, None);
    }

    #[test]
    fn test_malformed_override_is_an_error() {
        let err = AgentConfig::from_vars([("AGENT_CPU_WINDOW_MS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Settings(_)), "{err}");
    }
}
