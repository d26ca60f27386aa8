//! Main CLI application

use crate::cli::demo;
use crate::config::{parse_config_auto, parse_config_file, Settings};
use crate::error::CmdlexError;
use crate::runner::{InvocationResult, Runner};
use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "CMDLEX_LOG";

/// CLI application
pub struct App {
    /// Loaded settings
    settings: Settings,
    /// Config file the settings came from, if any
    config_path: Option<PathBuf>,
}

impl App {
    /// Create a new app, discovering the configuration file
    pub fn new() -> Result<Self, CmdlexError> {
        let (settings, config_path) = parse_config_auto()?;
        Ok(App {
            settings,
            config_path,
        })
    }

    /// Create app with a specific config file
    pub fn with_config_file(path: PathBuf) -> Result<Self, CmdlexError> {
        let settings = parse_config_file(&path)?;
        Ok(App {
            settings,
            config_path: Some(path),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the demo catalog against command line arguments
    pub fn run(self, args: Vec<String>) -> Result<InvocationResult, CmdlexError> {
        init_tracing(&self.settings);
        colored::control::set_override(self.settings.color && io::stderr().is_terminal());
        debug!(config = ?self.config_path, "settings loaded");

        let mut runner = Runner::configure()
            .with_groups(demo::catalog())
            .with_settings(self.settings)
            .build();
        let result = runner.run(args)?;

        if let Some(value) = &result.value {
            println!("{}", value);
        }

        Ok(result)
    }
}

/// Install the stderr log subscriber.
///
/// `CMDLEX_LOG` wins over the configured filter; the default is `warn`.
fn init_tracing(settings: &Settings) {
    let fallback = settings.log.clone().unwrap_or_else(|| "warn".to_string());
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    // a subscriber may already be installed by an embedding host
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Run the CLI application, returning the exit code when the run failed
pub fn run() -> Result<Option<i32>, CmdlexError> {
    let mut args: Vec<String> = env::args().collect();
    let config_path = extract_config_arg(&mut args);

    let app = if let Some(path) = config_path {
        App::with_config_file(path)?
    } else {
        App::new()?
    };

    let result = app.run(args)?;
    Ok(result.exit_code())
}

/// Strip a leading `--config <FILE>` / `-c <FILE>` before the engine sees the arguments.
///
/// Only the position right after the program name is looked at, so operations
/// keep the use of `-c` for their own parameters.
fn extract_config_arg(args: &mut Vec<String>) -> Option<PathBuf> {
    let flag = args.get(1)?;
    if (flag == "--config" || flag == "-c") && args.len() > 2 {
        let path = args.remove(2);
        args.remove(1);
        return Some(PathBuf::from(path));
    }
    None
}
