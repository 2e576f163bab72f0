//! Shared configuration for hangar binaries.
//!
//! [`Config`] is parsed from command-line arguments. Every flag has a
//! default, so a bare invocation scans `./plugins` with the standard archive
//! layout and logs compact lines at `info`.

mod defaults;
mod logging;

use std::ffi::OsString;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use hangar_plugins::LoaderSettings;
use thiserror::Error;

pub use defaults::{
    DEFAULT_ARCHIVE_SUFFIX, DEFAULT_DESCRIPTOR_PATH, DEFAULT_LOG_FILTER, DEFAULT_MESSAGE,
    DEFAULT_NATIVE_DIR, DEFAULT_PLUGINS_DIR, default_log_filter, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The arguments could not be parsed. Help and version requests are
    /// reported this way too; see [`ConfigError::is_informational`].
    #[error("{0}")]
    Arguments(#[from] clap::Error),
    /// The archive suffix was empty after stripping the leading dot.
    #[error("archive suffix must not be empty")]
    EmptyArchiveSuffix,
}

impl ConfigError {
    /// Returns `true` for help and version output, which are not failures.
    #[must_use]
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            Self::Arguments(error) if matches!(
                error.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            )
        )
    }
}

/// Runtime configuration for plugin discovery.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "hangar",
    version,
    about = "Discovers plugin archives and runs their demo services"
)]
pub struct Config {
    /// Directory scanned for plugin archives.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_PLUGINS_DIR)]
    plugins_dir: Utf8PathBuf,
    /// Message passed to every discovered service.
    #[arg(long, default_value = DEFAULT_MESSAGE)]
    message: String,
    /// File extension that marks a plugin archive.
    #[arg(long, value_name = "EXT", default_value = DEFAULT_ARCHIVE_SUFFIX)]
    archive_suffix: String,
    /// Path of the descriptor resource inside each archive.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DESCRIPTOR_PATH)]
    descriptor_path: String,
    /// Directory inside each archive holding the native module.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_NATIVE_DIR)]
    native_dir: String,
    /// Tracing filter expression, for example `hangar_plugins=debug`.
    #[arg(long, value_name = "FILTER", default_value = DEFAULT_LOG_FILTER)]
    log_filter: String,
    /// Log output format (`json` or `compact`).
    #[arg(long, value_name = "FORMAT", default_value_t = default_log_format())]
    log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plugins_dir: Utf8PathBuf::from(DEFAULT_PLUGINS_DIR),
            message: DEFAULT_MESSAGE.to_owned(),
            archive_suffix: DEFAULT_ARCHIVE_SUFFIX.to_owned(),
            descriptor_path: DEFAULT_DESCRIPTOR_PATH.to_owned(),
            native_dir: DEFAULT_NATIVE_DIR.to_owned(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Parses configuration from command-line style arguments. The first
    /// item is the program name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Arguments`] when parsing fails or help was
    /// requested, and [`ConfigError::EmptyArchiveSuffix`] when the suffix is
    /// blank.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let config = Self::try_parse_from(args)?;
        if config.archive_suffix.trim_start_matches('.').is_empty() {
            return Err(ConfigError::EmptyArchiveSuffix);
        }
        Ok(config)
    }

    /// Directory scanned for plugin archives.
    #[must_use]
    pub fn plugins_dir(&self) -> &Utf8Path {
        &self.plugins_dir
    }

    /// Message passed to every discovered service.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Builds the loader settings described by this configuration.
    #[must_use]
    pub fn loader_settings(&self) -> LoaderSettings {
        LoaderSettings::new()
            .with_archive_suffix(self.archive_suffix.as_str())
            .with_descriptor_path(self.descriptor_path.as_str())
            .with_native_dir(self.native_dir.as_str())
    }
}
