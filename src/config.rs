use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants;
use crate::error::{MarketError, Result};
use crate::normalize::days::DayNamePolicy;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub normalizer: NormalizerConfig,
    pub logging: LoggingConfig,
}

/// Defaults the normalizer falls back to when a stored record is missing data
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub default_country: String,
    pub default_season_start: String,
    pub default_season_end: String,
    pub fallback_day_of_week: u8,
    /// How a single scalar `dayOfWeek` name is resolved
    pub single_day_names: DayNamePolicy,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            default_country: constants::DEFAULT_COUNTRY.to_string(),
            default_season_start: constants::DEFAULT_SEASON_START.to_string(),
            default_season_end: constants::DEFAULT_SEASON_END.to_string(),
            fallback_day_of_week: constants::FALLBACK_DAY_OF_WEEK,
            single_day_names: DayNamePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_name: String,
    /// Used when RUST_LOG is not set
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_name: "market_tracker.log".to_string(),
            default_filter: "market_tracker=info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit TOML file. A missing file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_content = fs::read_to_string(path).map_err(|e| {
            MarketError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration the way the binaries do: `.env` first, then an
    /// explicit path, then `MARKET_TRACKER_CONFIG`, then `config.toml` if it
    /// exists, then built-in defaults. Environment overrides apply last.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let requested: Option<PathBuf> = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(constants::CONFIG_PATH_ENV).ok().map(PathBuf::from));

        let mut config = match requested {
            Some(path) => Self::load(&path)?,
            None => {
                let default_path = Path::new(constants::DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)?
                } else {
                    debug!("No config file found, using built-in defaults");
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(country) = std::env::var(constants::DEFAULT_COUNTRY_ENV) {
            if !country.trim().is_empty() {
                self.normalizer.default_country = country.trim().to_string();
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.normalizer.fallback_day_of_week > 6 {
            return Err(MarketError::Config(format!(
                "fallback_day_of_week must be between 0 and 6, got {}",
                self.normalizer.fallback_day_of_week
            )));
        }
        Ok(())
    }
}
