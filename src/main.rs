// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod extraction;
mod file_utils;
mod script_processor;
mod synthesis;
mod timecode;
mod verify;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a printed script PDF into timed script and SRT files
    Convert {
        /// Input PDF file
        #[arg(value_name = "PDF_PATH")]
        input_path: PathBuf,

        /// Output directory (defaults to the input file's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Synthesize narration audio for a converted script or SRT file
    Synth {
        /// Input script (.txt) or subtitle (.srt) file
        #[arg(value_name = "SCRIPT_PATH")]
        input_path: PathBuf,

        /// Directory that receives the WAV files and the timing report
        #[arg(short, long, value_name = "WAV_DIR")]
        output_dir: PathBuf,
    },

    /// Check synthesized WAV durations against the script timeline
    Check {
        /// Input script (.txt) or subtitle (.srt) file
        #[arg(value_name = "SCRIPT_PATH")]
        input_path: PathBuf,

        /// Directory containing the synthesized WAV files
        #[arg(short, long, value_name = "WAV_DIR")]
        wav_dir: PathBuf,
    },

    /// Generate shell completions for advox
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// advox - audio description voiceover pipeline
///
/// Converts printed audio-description scripts into timed entries,
/// synthesizes narration audio and verifies the audio fits the timeline.
#[derive(Parser, Debug)]
#[command(name = "advox")]
#[command(version = "1.0.0")]
#[command(about = "Audio description script conversion and narration tool")]
#[command(long_about = "advox converts printed audio-description scripts (PDF) into timed
entries, synthesizes narration audio through a TTS service and verifies
that the synthesized audio fits between the script's timecodes.

EXAMPLES:
    advox convert episode01.pdf                 # PDF -> script + SRT
    advox convert -f -o out/ episode01.pdf      # overwrite, custom output dir
    advox synth episode01.txt -o wav/           # script -> WAV files + report
    advox check episode01.txt -w wav/           # re-check timing of existing WAVs
    advox completions bash > advox.bash         # generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config. If the config file doesn't exist,
    a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    let command = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "advox", &mut std::io::stdout());
            return Ok(());
        },
        command => command,
    };

    let config = load_config(&cli.config_path, cli.log_level.as_ref())?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        let log_level = match config.log_level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        };

        // Just update the max level without reinitializing the logger
        log::set_max_level(log_level);
    }

    let controller = Controller::with_config(config)?;

    match command {
        Commands::Convert { input_path, output_dir, force_overwrite } => {
            let output_dir = output_dir.unwrap_or_else(|| {
                input_path.parent().unwrap_or(Path::new(".")).to_path_buf()
            });
            controller.run_convert(input_path, output_dir, force_overwrite).await
        },
        Commands::Synth { input_path, output_dir } => {
            controller.run_synthesize(input_path, output_dir).await
        },
        Commands::Check { input_path, wav_dir } => {
            controller.run_check(input_path, wav_dir).await
        },
        Commands::Completions { .. } => unreachable!("handled before config loading"),
    }
}

/// Load the configuration file, creating a default one on first run.
///
/// A conf.json in the working directory wins; otherwise the per-user
/// config location is consulted before falling back to defaults.
fn load_config(config_path: &str, cli_log_level: Option<&CliLogLevel>) -> Result<Config> {
    let config_file = if Path::new(config_path).exists() {
        PathBuf::from(config_path)
    } else {
        let user_config = Config::default_path();
        if user_config.exists() {
            user_config
        } else {
            PathBuf::from(config_path)
        }
    };

    let config = if config_file.exists() {
        // Load existing configuration
        let file = File::open(&config_file)
            .context(format!("Failed to open config file: {:?}", config_file))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {:?}", config_file))?;

        // Update log level in config if specified via command line
        if let Some(log_level) = cli_log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        // Apply command line log level to default config if specified
        if let Some(log_level) = cli_log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // Apply command line log level immediately
    if let Some(cmd_log_level) = cli_log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        let log_level = match config_log_level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        };
        log::set_max_level(log_level);
    }

    Ok(config)
}
