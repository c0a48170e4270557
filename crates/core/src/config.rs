use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::listing::ReferenceListing;
use crate::errors::{ApplicationError, DatasetError};
use crate::valuation::market::{MarketPolicy, ReferenceDataset};
use crate::valuation::tiers::PriceBands;
use crate::valuation::weights::ValuationWeights;
use crate::valuation::DeterministicValuationEngine;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub market: MarketConfig,
    pub valuation: ValuationConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct MarketConfig {
    /// TOML file of `[[listings]]`; the built-in catalogue is used when unset.
    pub reference_data: Option<PathBuf>,
    pub default_average: Decimal,
    pub similar_size_tolerance: Decimal,
}

#[derive(Clone, Debug)]
pub struct ValuationConfig {
    pub base_price: Decimal,
    pub price_per_sqm: Decimal,
    pub distance_penalty_per_km: Decimal,
    pub floor_bonus_threshold: i32,
    pub floor_bonus_per_level: Decimal,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub reference_data: Option<PathBuf>,
    pub default_average: Option<Decimal>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
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
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("could not read reference data `{path}`: {source}")]
    ReadReferenceData { path: PathBuf, source: std::io::Error },
    #[error("could not parse reference data `{path}`: {source}")]
    ParseReferenceData { path: PathBuf, source: toml::de::Error },
    #[error("invalid reference data `{path}`: {source}")]
    InvalidReferenceData { path: PathBuf, source: DatasetError },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Reference data problems surface as dataset errors, everything else as configuration.
impl From<ConfigError> for ApplicationError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::InvalidReferenceData { source, .. } => Self::Dataset(source),
            other => Self::Configuration(other.to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let weights = ValuationWeights::default();
        let policy = MarketPolicy::default();

        Self {
            market: MarketConfig {
                reference_data: None,
                default_average: policy.default_average,
                similar_size_tolerance: policy.similar_size_tolerance,
            },
            valuation: ValuationConfig {
                base_price: weights.base_price,
                price_per_sqm: weights.price_per_sqm,
                distance_penalty_per_km: weights.distance_penalty_per_km,
                floor_bonus_threshold: weights.floor_bonus_threshold,
                floor_bonus_per_level: weights.floor_bonus_per_level,
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
            config.apply_patch(patch, &path);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("rentwise.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn weights(&self) -> ValuationWeights {
        ValuationWeights {
            base_price: self.valuation.base_price,
            price_per_sqm: self.valuation.price_per_sqm,
            distance_penalty_per_km: self.valuation.distance_penalty_per_km,
            floor_bonus_threshold: self.valuation.floor_bonus_threshold,
            floor_bonus_per_level: self.valuation.floor_bonus_per_level,
            ..ValuationWeights::default()
        }
    }

    pub fn market_policy(&self) -> MarketPolicy {
        MarketPolicy {
            default_average: self.market.default_average,
            similar_size_tolerance: self.market.similar_size_tolerance,
            ..MarketPolicy::default()
        }
    }

    /// Loads the configured reference file, or the built-in catalogue.
    pub fn reference_dataset(&self) -> Result<ReferenceDataset, ConfigError> {
        match &self.market.reference_data {
            Some(path) => read_reference_data(path),
            None => Ok(ReferenceDataset::builtin()),
        }
    }

    pub fn build_engine(&self) -> Result<DeterministicValuationEngine, ConfigError> {
        Ok(DeterministicValuationEngine::new(
            self.weights(),
            self.market_policy(),
            PriceBands::default(),
            self.reference_dataset()?,
        ))
    }

    fn apply_patch(&mut self, patch: ConfigPatch, source: &Path) {
        if let Some(market) = patch.market {
            if let Some(reference_data) = market.reference_data {
                self.market.reference_data = Some(relative_to(source, reference_data));
            }
            if let Some(default_average) = market.default_average {
                self.market.default_average = default_average;
            }
            if let Some(similar_size_tolerance) = market.similar_size_tolerance {
                self.market.similar_size_tolerance = similar_size_tolerance;
            }
        }

        if let Some(valuation) = patch.valuation {
            if let Some(base_price) = valuation.base_price {
                self.valuation.base_price = base_price;
            }
            if let Some(price_per_sqm) = valuation.price_per_sqm {
                self.valuation.price_per_sqm = price_per_sqm;
            }
            if let Some(distance_penalty_per_km) = valuation.distance_penalty_per_km {
                self.valuation.distance_penalty_per_km = distance_penalty_per_km;
            }
            if let Some(floor_bonus_threshold) = valuation.floor_bonus_threshold {
                self.valuation.floor_bonus_threshold = floor_bonus_threshold;
            }
            if let Some(floor_bonus_per_level) = valuation.floor_bonus_per_level {
                self.valuation.floor_bonus_per_level = floor_bonus_per_level;
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
        if let Some(value) = read_env("RENTWISE_MARKET_REFERENCE_DATA") {
            self.market.reference_data = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("RENTWISE_MARKET_DEFAULT_AVERAGE") {
            self.market.default_average =
                parse_decimal("RENTWISE_MARKET_DEFAULT_AVERAGE", &value)?;
        }
        if let Some(value) = read_env("RENTWISE_MARKET_SIMILAR_SIZE_TOLERANCE") {
            self.market.similar_size_tolerance =
                parse_decimal("RENTWISE_MARKET_SIMILAR_SIZE_TOLERANCE", &value)?;
        }

        if let Some(value) = read_env("RENTWISE_VALUATION_BASE_PRICE") {
            self.valuation.base_price = parse_decimal("RENTWISE_VALUATION_BASE_PRICE", &value)?;
        }
        if let Some(value) = read_env("RENTWISE_VALUATION_PRICE_PER_SQM") {
            self.valuation.price_per_sqm =
                parse_decimal("RENTWISE_VALUATION_PRICE_PER_SQM", &value)?;
        }

        let log_level =
            read_env("RENTWISE_LOGGING_LEVEL").or_else(|| read_env("RENTWISE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("RENTWISE_LOGGING_FORMAT").or_else(|| read_env("RENTWISE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(reference_data) = overrides.reference_data {
            self.market.reference_data = Some(reference_data);
        }
        if let Some(default_average) = overrides.default_average {
            self.market.default_average = default_average;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_market(&self.market)?;
        validate_valuation(&self.valuation)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("rentwise.toml"), PathBuf::from("config/rentwise.toml")]
        .into_iter()
        .find(|path| path.exists())
}

/// Relative dataset paths in a config file resolve against that file's directory.
fn relative_to(config_file: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match config_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(path),
        _ => path,
    }
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_reference_data(path: &Path) -> Result<ReferenceDataset, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadReferenceData { path: path.to_path_buf(), source })?;
    let file = toml::from_str::<ReferenceDataFile>(&raw)
        .map_err(|source| ConfigError::ParseReferenceData { path: path.to_path_buf(), source })?;

    ReferenceDataset::new(file.listings)
        .map_err(|source| ConfigError::InvalidReferenceData { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_market(market: &MarketConfig) -> Result<(), ConfigError> {
    if market.default_average <= Decimal::ZERO {
        return Err(ConfigError::Validation(
            "market.default_average must be greater than zero".to_string(),
        ));
    }

    if market.similar_size_tolerance <= Decimal::ZERO {
        return Err(ConfigError::Validation(
            "market.similar_size_tolerance must be greater than zero".to_string(),
        ));
    }

    if let Some(path) = &market.reference_data {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "market.reference_data must be a file path when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_valuation(valuation: &ValuationConfig) -> Result<(), ConfigError> {
    if valuation.base_price < Decimal::ZERO {
        return Err(ConfigError::Validation(
            "valuation.base_price cannot be negative".to_string(),
        ));
    }

    if valuation.price_per_sqm <= Decimal::ZERO {
        return Err(ConfigError::Validation(
            "valuation.price_per_sqm must be greater than zero".to_string(),
        ));
    }

    if valuation.distance_penalty_per_km < Decimal::ZERO {
        return Err(ConfigError::Validation(
            "valuation.distance_penalty_per_km cannot be negative".to_string(),
        ));
    }

    if valuation.floor_bonus_threshold < 0 {
        return Err(ConfigError::Validation(
            "valuation.floor_bonus_threshold cannot be negative".to_string(),
        ));
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

fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    value.trim().parse::<Decimal>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    market: Option<MarketPatch>,
    valuation: Option<ValuationPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct MarketPatch {
    reference_data: Option<PathBuf>,
    default_average: Option<Decimal>,
    similar_size_tolerance: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct ValuationPatch {
    base_price: Option<Decimal>,
    price_per_sqm: Option<Decimal>,
    distance_penalty_per_km: Option<Decimal>,
    floor_bonus_threshold: Option<i32>,
    floor_bonus_per_level: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[derive(Debug, Default, Deserialize)]
struct ReferenceDataFile {
    #[serde(default)]
    listings: Vec<ReferenceListing>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
    use crate::domain::room::RoomType;
    use crate::errors::{ApplicationError, DatasetError, InterfaceError};
    use crate::valuation::market::MarketDataSource;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_match_builtin_model() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.market.reference_data.is_none(), "builtin dataset should be the default")?;
        ensure(
            config.market.default_average == Decimal::from(400),
            "default market average should be 400",
        )?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )?;
        let dataset = config.reference_dataset().map_err(|err| err.to_string())?;
        ensure(dataset.len() == 8, "builtin dataset should have eight listings")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_RENTWISE_DEFAULT_AVERAGE", "512");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("rentwise.toml");
            fs::write(
                &path,
                r#"
[market]
default_average = "${TEST_RENTWISE_DEFAULT_AVERAGE}"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.market.default_average == Decimal::from(512),
                "default average should be loaded from environment",
            )
        })();

        clear_vars(&["TEST_RENTWISE_DEFAULT_AVERAGE"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("RENTWISE_LOG_LEVEL", "warn");
        env::set_var("RENTWISE_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )
        })();

        clear_vars(&["RENTWISE_LOG_LEVEL", "RENTWISE_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("RENTWISE_VALUATION_BASE_PRICE", "250");
        env::set_var("RENTWISE_MARKET_DEFAULT_AVERAGE", "450");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("rentwise.toml");
            fs::write(
                &path,
                r#"
[market]
default_average = 420
similar_size_tolerance = 5

[valuation]
base_price = 180
price_per_sqm = 9

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    default_average: Some(Decimal::from(480)),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.market.default_average == Decimal::from(480),
                "override default average should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                config.valuation.base_price == Decimal::from(250),
                "env base price should win over file and defaults",
            )?;
            ensure(
                config.valuation.price_per_sqm == Decimal::from(9),
                "file price per sqm should win over defaults",
            )?;
            ensure(
                config.market_policy().similar_size_tolerance == Decimal::from(5),
                "file tolerance should flow into the market policy",
            )?;
            ensure(
                config.weights().base_price == Decimal::from(250),
                "configured base price should flow into the weights",
            )
        })();

        clear_vars(&["RENTWISE_VALUATION_BASE_PRICE", "RENTWISE_MARKET_DEFAULT_AVERAGE"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("RENTWISE_MARKET_DEFAULT_AVERAGE", "0");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("market.default_average")
            );
            ensure(has_message, "validation failure should mention market.default_average")
        })();

        clear_vars(&["RENTWISE_MARKET_DEFAULT_AVERAGE"]);
        result
    }

    #[test]
    fn malformed_env_override_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("RENTWISE_VALUATION_PRICE_PER_SQM", "eight");

        let result = (|| -> Result<(), String> {
            let error = AppConfig::load(LoadOptions::default())
                .err()
                .ok_or_else(|| "expected invalid override to fail".to_string())?;
            ensure(
                matches!(error, ConfigError::InvalidEnvOverride { ref key, .. } if key == "RENTWISE_VALUATION_PRICE_PER_SQM"),
                "error should name the offending variable",
            )
        })();

        clear_vars(&["RENTWISE_VALUATION_PRICE_PER_SQM"]);
        result
    }

    #[test]
    fn reference_data_file_is_resolved_relative_to_config() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        fs::write(
            dir.path().join("listings.toml"),
            r#"
[[listings]]
location = "harbour"
size = 22
room_type = "studio"
price = 810

[[listings]]
location = "Harbour"
size = 26
room_type = "studio"
price = 890
"#,
        )
        .map_err(|err| err.to_string())?;
        let path = dir.path().join("rentwise.toml");
        fs::write(&path, "[market]\nreference_data = \"listings.toml\"\n")
            .map_err(|err| err.to_string())?;

        let config =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                .map_err(|err| format!("config load failed: {err}"))?;
        let engine = config.build_engine().map_err(|err| err.to_string())?;

        ensure(
            engine.market().comparables("harbour", RoomType::Studio).len() == 2,
            "custom dataset should replace the builtin one",
        )?;
        ensure(
            engine.market_average("harbour", RoomType::Studio) == Decimal::from(850),
            "average should come from the custom dataset",
        )
    }

    #[test]
    fn invalid_reference_data_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let data = dir.path().join("listings.toml");
        fs::write(
            &data,
            "[[listings]]\nlocation = \"x\"\nsize = 10\nroom_type = \"shared\"\nprice = -1\n",
        )
        .map_err(|err| err.to_string())?;

        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides { reference_data: Some(data), ..ConfigOverrides::default() },
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        let error = match config.reference_dataset() {
            Err(error @ ConfigError::InvalidReferenceData { .. }) => error,
            _ => return Err("negative price should be rejected".to_string()),
        };
        ensure(
            matches!(
                ApplicationError::from(error),
                ApplicationError::Dataset(DatasetError::NonPositivePrice { index: 0, .. })
            ),
            "invalid reference data should map to a dataset error",
        )
    }

    #[test]
    fn config_failures_map_to_configuration_errors() -> Result<(), String> {
        let error = ConfigError::Validation("market.default_average must be greater than zero".into());
        let interface = ApplicationError::from(error).into_interface("cli-config");

        ensure(
            matches!(interface, InterfaceError::Internal { ref message, .. }
                if message.contains("market.default_average")),
            "configuration errors should become internal interface errors",
        )?;
        ensure(interface.correlation_id() == "cli-config", "correlation id should be kept")
    }

    #[test]
    fn missing_required_file_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let result = AppConfig::load(LoadOptions {
            config_path: Some(dir.path().join("absent.toml")),
            require_file: true,
            ..LoadOptions::default()
        });

        ensure(
            matches!(result, Err(ConfigError::MissingConfigFile(_))),
            "absent required file should fail",
        )
    }
}
