pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rentwise_core::config::{AppConfig, ConfigOverrides, LogFormat, LoadOptions};
use rust_decimal::Decimal;
use tracing::Level;

use commands::{load_options, CommandResult, LoadedConfig, RoomArgs, EXIT_FAILURE};

#[derive(Debug, Parser)]
#[command(
    name = "rentwise",
    about = "Rentwise rental price valuation CLI",
    long_about = "Estimate monthly rent for a room, suggest listing price tiers, and inspect the valuation configuration.",
    after_help = "Examples:\n  rentwise predict --location university --size 18 --room-type private --furnished --wifi --kitchen --distance 0.5 --floor 1\n  rentwise suggest --input room.json\n  rentwise doctor --json"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Default, Args)]
struct GlobalArgs {
    #[arg(long, global = true, help = "Path to a rentwise.toml configuration file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "TOML file with [[listings]] used as market reference data")]
    reference_data: Option<PathBuf>,
    #[arg(long, global = true, help = "Market average used when no comparable listings exist")]
    default_average: Option<Decimal>,
    #[arg(long, global = true, help = "trace, debug, info, warn or error")]
    log_level: Option<String>,
    #[arg(long, global = true, value_parser = parse_log_format, help = "compact, pretty or json")]
    log_format: Option<LogFormat>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Predict the monthly rent for a room with confidence, range and insights")]
    Predict {
        #[command(flatten)]
        room: RoomArgs,
        #[arg(long, help = "Include the step-by-step base price breakdown")]
        trace: bool,
    },
    #[command(about = "Suggest recommended, competitive, premium and budget listing prices")]
    Suggest {
        #[command(flatten)]
        room: RoomArgs,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, reference data and a sample valuation")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse::<LogFormat>().map_err(|error| error.to_string())
}

impl GlobalArgs {
    fn load_options(&self) -> LoadOptions {
        let overrides = ConfigOverrides {
            reference_data: self.reference_data.clone(),
            default_average: self.default_average,
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        };
        load_options(self.config.clone(), overrides)
    }
}

fn init_logging(config: &AppConfig) {
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder =
        tracing_subscriber::fmt().with_target(false).with_max_level(log_level).with_writer(std::io::stderr);

    let initialized = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if let Err(error) = initialized {
        eprintln!("rentwise: logging already initialized: {error}");
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let loaded = LoadedConfig::load(cli.global.load_options());

    // Config errors are reported by the command itself; logging falls back to defaults.
    let fallback = AppConfig::default();
    init_logging(loaded.config.as_ref().unwrap_or(&fallback));

    let result = match cli.command {
        Command::Predict { room, trace } => commands::predict::run(&loaded, &room, trace),
        Command::Suggest { room } => commands::suggest::run(&loaded, &room),
        Command::Config => CommandResult { exit_code: 0, output: commands::config::run(&loaded) },
        Command::Doctor { json } => {
            let (healthy, output) = commands::doctor::run(&loaded, json);
            CommandResult { exit_code: if healthy { 0 } else { EXIT_FAILURE }, output }
        }
    };

    tracing::debug!(
        event_name = "cli.command.completed",
        exit_code = result.exit_code,
        "command finished"
    );
    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;
    use clap::Parser;

    use super::Cli;

    #[test]
    fn input_file_conflicts_with_inline_room_flags() {
        let inline: [&[&str]; 4] =
            [&["--wifi"], &["--distance", "2"], &["--floor", "4"], &["--size", "18"]];
        for flag in inline {
            let mut args = vec!["rentwise", "predict", "--input", "room.json"];
            args.extend_from_slice(flag);

            let error = Cli::try_parse_from(args).expect_err("flag should conflict with --input");
            assert_eq!(error.kind(), ErrorKind::ArgumentConflict, "{flag:?}");
        }
    }

    #[test]
    fn input_file_combines_with_global_flags() {
        let parsed = Cli::try_parse_from([
            "rentwise",
            "suggest",
            "--input",
            "room.json",
            "--config",
            "rentwise.toml",
            "--default-average",
            "480",
        ]);

        assert!(parsed.is_ok());
    }
}
