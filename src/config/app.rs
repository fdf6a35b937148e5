//! Main application configuration
//!
//! This module defines the top-level configuration of the `glicko` tools:
//! which rating system to run, its parameters and logging settings. Values
//! come from a TOML file or from `GLICKO_*` environment variables.

use crate::config::rating::{Glicko2Config, GlickoConfig};
use crate::rating::{Glicko, Glicko2, RatingSystem};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingSettings,
    /// Rating system used for updates
    pub system: SystemKind,
    pub glicko: GlickoConfig,
    pub glicko2: Glicko2Config,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Available rating systems
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
    Glicko,
    #[default]
    Glicko2,
}

impl std::fmt::Display for SystemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemKind::Glicko => write!(f, "glicko"),
            SystemKind::Glicko2 => write!(f, "glicko2"),
        }
    }
}

impl FromStr for SystemKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "glicko" => Ok(SystemKind::Glicko),
            "glicko2" | "glicko-2" => Ok(SystemKind::Glicko2),
            _ => Err(anyhow!("Unknown rating system: {}", s)),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| env::var(key).ok())?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_overrides(|key| env::var(key).ok())?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Apply `GLICKO_*` overrides read through `lookup`
    ///
    /// Rating parameters apply to whichever system is selected after the
    /// `GLICKO_SYSTEM` override.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(log_level) = lookup("GLICKO_LOG_LEVEL") {
            self.logging.level = log_level;
        }
        if let Some(system) = lookup("GLICKO_SYSTEM") {
            self.system = system.parse()?;
        }

        let parse_f64 = |key: &str| -> Result<Option<f64>> {
            lookup(key)
                .map(|value| {
                    value
                        .parse::<f64>()
                        .map_err(|_| anyhow!("Invalid {} value: {}", key, value))
                })
                .transpose()
        };

        let mu = parse_f64("GLICKO_MU")?;
        let sigma = parse_f64("GLICKO_SIGMA")?;
        let period = lookup("GLICKO_PERIOD_SECONDS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .map_err(|_| anyhow!("Invalid GLICKO_PERIOD_SECONDS value: {}", value))
            })
            .transpose()?;

        match self.system {
            SystemKind::Glicko => {
                if let Some(mu) = mu {
                    self.glicko.mu = mu;
                }
                if let Some(sigma) = sigma {
                    self.glicko.sigma = sigma;
                }
                if let Some(period) = period {
                    self.glicko.period_seconds = period;
                }
            }
            SystemKind::Glicko2 => {
                if let Some(mu) = mu {
                    self.glicko2.mu = mu;
                }
                if let Some(sigma) = sigma {
                    self.glicko2.sigma = sigma;
                }
                if let Some(period) = period {
                    self.glicko2.period_seconds = period;
                }
                if let Some(volatility) = parse_f64("GLICKO_VOLATILITY")? {
                    self.glicko2.volatility = volatility;
                }
                if let Some(tau) = parse_f64("GLICKO_TAU")? {
                    self.glicko2.tau = tau;
                }
                if let Some(epsilon) = parse_f64("GLICKO_EPSILON")? {
                    self.glicko2.epsilon = epsilon;
                }
                if let Some(max_iterations) = lookup("GLICKO_MAX_ITERATIONS") {
                    self.glicko2.max_iterations = max_iterations.parse().map_err(|_| {
                        anyhow!("Invalid GLICKO_MAX_ITERATIONS value: {}", max_iterations)
                    })?;
                }
            }
        }

        Ok(())
    }

    /// Build the configured rating system
    pub fn build_system(&self) -> Result<Box<dyn RatingSystem>> {
        let system: Box<dyn RatingSystem> = match self.system {
            SystemKind::Glicko => Box::new(Glicko::new(self.glicko.clone())?),
            SystemKind::Glicko2 => Box::new(Glicko2::new(self.glicko2.clone())?),
        };
        Ok(system)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.logging.level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.logging.level)),
    }

    // Only the selected system has to be usable
    match config.system {
        SystemKind::Glicko => config.glicko.validate()?,
        SystemKind::Glicko2 => config.glicko2.validate()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.system, SystemKind::Glicko2);
        assert_eq!(config.logging.level, "info");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_system_kind_parsing() {
        assert_eq!("glicko".parse::<SystemKind>().unwrap(), SystemKind::Glicko);
        assert_eq!("Glicko2".parse::<SystemKind>().unwrap(), SystemKind::Glicko2);
        assert_eq!("glicko-2".parse::<SystemKind>().unwrap(), SystemKind::Glicko2);
        assert!("elo".parse::<SystemKind>().is_err());
        assert_eq!(SystemKind::Glicko2.to_string(), "glicko2");
    }

    #[test]
    fn test_overrides_apply_to_selected_system() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("GLICKO_SYSTEM", "glicko2"),
                ("GLICKO_TAU", "0.5"),
                ("GLICKO_MU", "1200"),
                ("GLICKO_MAX_ITERATIONS", "50"),
                ("GLICKO_LOG_LEVEL", "debug"),
            ]))
            .unwrap();

        assert_eq!(config.glicko2.tau, 0.5);
        assert_eq!(config.glicko2.mu, 1200.0);
        assert_eq!(config.glicko2.max_iterations, 50);
        assert_eq!(config.glicko.mu, 1500.0);
        assert_eq!(config.logging.level, "debug");

        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("GLICKO_SYSTEM", "glicko"),
                ("GLICKO_SIGMA", "250"),
            ]))
            .unwrap();
        assert_eq!(config.system, SystemKind::Glicko);
        assert_eq!(config.glicko.sigma, 250.0);
        assert_eq!(config.glicko2.sigma, 350.0);
    }

    #[test]
    fn test_invalid_override_values() {
        let mut config = AppConfig::default();
        assert!(config
            .apply_overrides(lookup_from(&[("GLICKO_TAU", "fast")]))
            .is_err());

        let mut config = AppConfig::default();
        assert!(config
            .apply_overrides(lookup_from(&[("GLICKO_SYSTEM", "trueskill")]))
            .is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.glicko2.tau = 0.0;
        assert!(validate_config(&config).is_err());

        // The unused system is not validated
        config.system = SystemKind::Glicko;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
system = "glicko2"

[logging]
level = "warn"

[glicko2]
tau = 0.5
epsilon = 0.0001
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.glicko2.tau, 0.5);
        assert_eq!(config.glicko2.epsilon, 0.0001);
        assert_eq!(config.glicko2.volatility, 0.06);
    }

    #[test]
    fn test_from_file_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[glicko2]\nepsilon = 1.5").unwrap();
        assert!(AppConfig::from_file(file.path()).is_err());

        assert!(AppConfig::from_file(Path::new("/nonexistent/glicko.toml")).is_err());
    }

    #[test]
    fn test_build_system() {
        let config = AppConfig::default();
        let system = config.build_system().unwrap();
        assert_eq!(system.default_rating().volatility(), 0.06);

        let config = AppConfig {
            system: SystemKind::Glicko,
            glicko: GlickoConfig {
                mu: 1000.0,
                ..GlickoConfig::default()
            },
            ..AppConfig::default()
        };
        let system = config.build_system().unwrap();
        assert_eq!(system.default_rating().mu(), 1000.0);
        assert!(system.rate(&system.default_rating(), &[], Some(0.0)).is_ok());
    }
}
