use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::recs::{StrategyWeights, DEFAULT_PERSONALIZED_LIMIT, DEFAULT_SIMILAR_LIMIT};

/// Effective application configuration. Load order: defaults, then an
/// optional TOML file, then `SHOPFRONT_*` environment overrides, then
/// programmatic overrides, then validation.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub recommendations: RecsConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct RecsConfig {
    pub personalized_limit: usize,
    pub similar_limit: usize,
    pub weights: StrategyWeights,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub personalized_limit: Option<usize>,
    pub similar_limit: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://shopfront.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            recommendations: RecsConfig {
                personalized_limit: DEFAULT_PERSONALIZED_LIMIT,
                similar_limit: DEFAULT_SIMILAR_LIMIT,
                weights: StrategyWeights::default(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("shopfront.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(recs) = patch.recommendations {
            if let Some(personalized_limit) = recs.personalized_limit {
                self.recommendations.personalized_limit = personalized_limit;
            }
            if let Some(similar_limit) = recs.similar_limit {
                self.recommendations.similar_limit = similar_limit;
            }
            if let Some(weights) = recs.weights {
                let defaults = &mut self.recommendations.weights;
                if let Some(cart) = weights.cart {
                    defaults.cart = cart;
                }
                if let Some(wishlist) = weights.wishlist {
                    defaults.wishlist = wishlist;
                }
                if let Some(purchase_history) = weights.purchase_history {
                    defaults.purchase_history = purchase_history;
                }
                if let Some(browsing_history) = weights.browsing_history {
                    defaults.browsing_history = browsing_history;
                }
                if let Some(collaborative) = weights.collaborative {
                    defaults.collaborative = collaborative;
                }
                if let Some(content) = weights.content {
                    defaults.content = content;
                }
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SHOPFRONT_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("SHOPFRONT_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_u32("SHOPFRONT_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("SHOPFRONT_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("SHOPFRONT_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("SHOPFRONT_RECS_PERSONALIZED_LIMIT") {
            self.recommendations.personalized_limit =
                parse_usize("SHOPFRONT_RECS_PERSONALIZED_LIMIT", &value)?;
        }
        if let Some(value) = read_env("SHOPFRONT_RECS_SIMILAR_LIMIT") {
            self.recommendations.similar_limit =
                parse_usize("SHOPFRONT_RECS_SIMILAR_LIMIT", &value)?;
        }

        if let Some(value) = read_env("SHOPFRONT_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("SHOPFRONT_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(personalized_limit) = overrides.personalized_limit {
            self.recommendations.personalized_limit = personalized_limit;
        }
        if let Some(similar_limit) = overrides.similar_limit {
            self.recommendations.similar_limit = similar_limit;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_recommendations(&self.recommendations)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then(|| path.to_path_buf());
    }

    [PathBuf::from("shopfront.toml"), PathBuf::from("config/shopfront.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_recommendations(recs: &RecsConfig) -> Result<(), ConfigError> {
    if recs.personalized_limit == 0 || recs.personalized_limit > 100 {
        return Err(ConfigError::Validation(
            "recommendations.personalized_limit must be in range 1..=100".to_string(),
        ));
    }
    if recs.similar_limit == 0 || recs.similar_limit > 100 {
        return Err(ConfigError::Validation(
            "recommendations.similar_limit must be in range 1..=100".to_string(),
        ));
    }

    let weights = [
        ("cart", recs.weights.cart),
        ("wishlist", recs.weights.wishlist),
        ("purchase_history", recs.weights.purchase_history),
        ("browsing_history", recs.weights.browsing_history),
        ("collaborative", recs.weights.collaborative),
        ("content", recs.weights.content),
    ];
    for (name, weight) in weights {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "recommendations.weights.{name} must be a positive finite number"
            )));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    recommendations: Option<RecsPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RecsPatch {
    personalized_limit: Option<usize>,
    similar_limit: Option<usize>,
    weights: Option<WeightsPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct WeightsPatch {
    cart: Option<f64>,
    wishlist: Option<f64>,
    purchase_history: Option<f64>,
    browsing_history: Option<f64>,
    collaborative: Option<f64>,
    content: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
