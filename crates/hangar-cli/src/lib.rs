//! Command-line runtime for hangar plugin discovery.
//!
//! [`run`] loads configuration, installs telemetry, and lists every
//! `DemoService` implementation found in the plugin directory. Each service
//! is invoked with the configured message and its reply written to stdout,
//! one line per service. Discovery failures are written to stderr and turn
//! the exit status into a failure without hiding the services that loaded.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use hangar_config::{Config, ConfigError};
use hangar_plugins::{ModuleLoader, PluginLoader, SharedContext};
use hangar_sdk::DemoContract;
use thiserror::Error;
use tracing::info;

pub mod telemetry;


use telemetry::TelemetryError;

const CLI_TARGET: &str = "hangar_cli";

#[derive(Debug, Error)]
enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(ConfigError),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let config = match Config::load_from_iter(args) {
        Ok(config) => config,
        Err(error) if error.is_informational() => {
            let _ = write!(stdout, "{error}");
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            let _ = writeln!(stderr, "{}", AppError::LoadConfiguration(error));
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = telemetry::initialise(&config) {
        let _ = writeln!(stderr, "{}", AppError::from(error));
        return ExitCode::FAILURE;
    }

    let loader = PluginLoader::native(config.loader_settings(), SharedContext::empty());
    run_with_loader(&config, &loader, stdout, stderr)
}

/// Runs discovery with an explicit plugin loader.
pub(crate) fn run_with_loader<L, W, E>(
    config: &Config,
    loader: &PluginLoader<L>,
    stdout: &mut W,
    stderr: &mut E,
) -> ExitCode
where
    L: ModuleLoader,
    W: Write,
    E: Write,
{
    match report(config, loader, stdout, stderr) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

/// Writes one line per service and one per failure. Returns whether the
/// discovery was free of failures.
fn report<L, W, E>(
    config: &Config,
    loader: &PluginLoader<L>,
    stdout: &mut W,
    stderr: &mut E,
) -> Result<bool, AppError>
where
    L: ModuleLoader,
    W: Write,
    E: Write,
{
    let directory = config.plugins_dir();
    let discovery = loader.list_implementations::<DemoContract>(directory.as_std_path());

    for service in discovery.instances() {
        let reply = service.demo_test(config.message());
        writeln!(stdout, "{} {}: {reply}", service.scope(), service.identifier())?;
    }
    for error in discovery.errors() {
        writeln!(stderr, "error: {error}")?;
    }
    stdout.flush()?;

    info!(
        target: CLI_TARGET,
        directory = %directory,
        services = discovery.instances().len(),
        failures = discovery.errors().len(),
        "plugin discovery complete"
    );
    Ok(discovery.is_clean())
}
