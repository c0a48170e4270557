pub mod config;
pub mod doctor;
pub mod predict;
pub mod suggest;

use std::fs;
use std::path::PathBuf;

use clap::Args;
use rentwise_core::config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
use rentwise_core::{
    ApplicationError, DeterministicValuationEngine, RoomFeatures, RoomFeaturesInput,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INPUT: u8 = 3;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, data: impl Serialize) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), EXIT_FAILURE)
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: None,
            data: Some(data),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: Some(message.into()),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Routes an application error through the interface layer so the
    /// message carries a `cli-<command>` correlation id.
    fn application_failure(
        command: &str,
        error_class: &str,
        error: ApplicationError,
        exit_code: u8,
    ) -> Self {
        let interface = error.into_interface(format!("cli-{command}"));
        let message = format!("{interface} (correlation_id: {})", interface.correlation_id());
        Self::failure(command, error_class, message, exit_code)
    }

    fn config_failure(command: &str, error: &ConfigError) -> Self {
        let error = ApplicationError::Configuration(error.to_string());
        Self::application_failure(command, "config_validation", error, EXIT_CONFIG)
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// An explicit `--config` path must exist; otherwise the default search applies.
pub fn load_options(config_path: Option<PathBuf>, overrides: ConfigOverrides) -> LoadOptions {
    let require_file = config_path.is_some();
    LoadOptions { config_path, require_file, overrides }
}

/// Configuration loaded once per invocation, kept next to the options that
/// produced it so commands can attribute sources or report the failure.
#[derive(Debug)]
pub struct LoadedConfig {
    pub options: LoadOptions,
    pub config: Result<AppConfig, ConfigError>,
}

impl LoadedConfig {
    pub fn load(options: LoadOptions) -> Self {
        let config = AppConfig::load(options.clone());
        Self { options, config }
    }
}

/// Room description, either from a JSON file or from individual flags.
#[derive(Debug, Clone, Default, Args)]
pub struct RoomArgs {
    #[arg(
        long,
        help = "Read room features from a JSON file",
        conflicts_with_all = [
            "location", "size", "room_type", "furnished", "wifi", "parking", "kitchen", "laundry",
            "balcony", "pets", "distance", "floor",
        ]
    )]
    pub input: Option<PathBuf>,
    #[arg(long, help = "Area label, e.g. downtown or university")]
    pub location: Option<String>,
    #[arg(long, help = "Room size in square meters")]
    pub size: Option<Decimal>,
    #[arg(long, help = "private, shared or studio")]
    pub room_type: Option<String>,
    #[arg(long)]
    pub furnished: bool,
    #[arg(long)]
    pub wifi: bool,
    #[arg(long)]
    pub parking: bool,
    #[arg(long)]
    pub kitchen: bool,
    #[arg(long)]
    pub laundry: bool,
    #[arg(long)]
    pub balcony: bool,
    #[arg(long)]
    pub pets: bool,
    #[arg(long, help = "Distance to the university in kilometers", default_value = "0")]
    pub distance: Decimal,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub floor: i32,
}

#[derive(Debug)]
enum InputError {
    Read(String),
    Parse(String),
    Missing(&'static str),
    Invalid(ApplicationError),
}

impl RoomArgs {
    fn to_input(&self) -> Result<RoomFeaturesInput, InputError> {
        if let Some(path) = &self.input {
            let raw = fs::read_to_string(path)
                .map_err(|error| InputError::Read(format!("{}: {error}", path.display())))?;
            return serde_json::from_str(&raw)
                .map_err(|error| InputError::Parse(format!("{}: {error}", path.display())));
        }

        Ok(RoomFeaturesInput {
            location: self.location.clone().ok_or(InputError::Missing("--location"))?,
            size: self.size.ok_or(InputError::Missing("--size"))?,
            room_type: self.room_type.clone().ok_or(InputError::Missing("--room-type"))?,
            furnished: self.furnished,
            has_wifi: self.wifi,
            has_parking: self.parking,
            has_kitchen: self.kitchen,
            has_laundry: self.laundry,
            has_balcony: self.balcony,
            pets_allowed: self.pets,
            distance_to_university: self.distance,
            floor: self.floor,
        })
    }

    fn features(&self) -> Result<RoomFeatures, InputError> {
        let input = self.to_input()?;
        RoomFeatures::try_from(input).map_err(|error| InputError::Invalid(error.into()))
    }
}

impl InputError {
    fn into_result(self, command: &str) -> CommandResult {
        match self {
            Self::Read(message) => CommandResult::failure(command, "input_read", message, EXIT_INPUT),
            Self::Parse(message) => {
                CommandResult::failure(command, "input_parse", message, EXIT_INPUT)
            }
            Self::Missing(flag) => CommandResult::failure(
                command,
                "input_missing",
                format!("{flag} is required unless --input is given"),
                EXIT_INPUT,
            ),
            Self::Invalid(error) => {
                CommandResult::application_failure(command, "input_validation", error, EXIT_INPUT)
            }
        }
    }
}

fn engine_for(
    command: &str,
    loaded: &LoadedConfig,
) -> Result<DeterministicValuationEngine, CommandResult> {
    let config =
        loaded.config.as_ref().map_err(|error| CommandResult::config_failure(command, error))?;
    config.build_engine().map_err(|error| {
        CommandResult::application_failure(command, "reference_data", error.into(), EXIT_CONFIG)
    })
}
