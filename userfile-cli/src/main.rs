//! userfile CLI entry point.
//!
//! Binary name: `userfile`
//!
//! Resolves the configuration, builds the application state, then dispatches
//! the requested command. Logs go to stderr so `--json` output stays clean.

mod cli;
mod commands;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use userfile_app::config::UserManagementConfig;
use userfile_app::AppStateBuilder;
use userfile_core::CoreError;

use cli::Cli;

const APP_DIR: &str = "userfile";
const CONFIG_FILE: &str = "config.json";

/// Default configuration file path.
fn default_config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn load_config(
    explicit: Option<&Path>,
    users_file: Option<PathBuf>,
) -> anyhow::Result<UserManagementConfig> {
    let mut config = match explicit {
        Some(path) => UserManagementConfig::load(path)?,
        None => {
            let path = default_config_file();
            if path.exists() {
                tracing::debug!("Using configuration at {}", path.display());
                UserManagementConfig::load(&path)?
            } else {
                UserManagementConfig::default()
            }
        }
    };

    if let Some(users_file) = users_file {
        let groups_property_file = config.groups_property_file.take();
        config = UserManagementConfig {
            groups_property_file,
            ..UserManagementConfig::with_users_file(users_file)
        };
    }

    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), cli.users_file)?;
    let users_file = config.users_file();
    let display_path = users_file.as_ref().map(|path| path.display().to_string());
    let state =
        AppStateBuilder::from_files(users_file, config.groups_property_file.as_deref()).build()?;

    commands::run(&state, display_path, cli.command, cli.json)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<CoreError>() {
                Some(core) if core.is_expected() => tracing::warn!("{core}"),
                _ => tracing::error!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
