use crate::logging::LogFormat;

pub use hangar_plugins::settings::{
    DEFAULT_ARCHIVE_SUFFIX, DEFAULT_DESCRIPTOR_PATH, DEFAULT_NATIVE_DIR,
};

/// Directory scanned for plugin archives when none is given.
pub const DEFAULT_PLUGINS_DIR: &str = "plugins";

/// Message handed to every discovered demo service.
pub const DEFAULT_MESSAGE: &str = "load success";

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression used by the binaries.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the binaries.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
