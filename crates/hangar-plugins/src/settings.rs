//! Loader settings passed explicitly through the discovery pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default file extension recognised as a plugin archive.
pub const DEFAULT_ARCHIVE_SUFFIX: &str = "jar";

/// Default logical path of the descriptor resource inside an archive.
pub const DEFAULT_DESCRIPTOR_PATH: &str = "META-INF/hangar.factories";

/// Default archive directory holding the native module.
pub const DEFAULT_NATIVE_DIR: &str = "lib";

/// Settings shared by the scanner, isolation loader, and native module loader.
///
/// # Example
///
/// ```
/// use hangar_plugins::LoaderSettings;
///
/// let settings = LoaderSettings::new().with_archive_suffix(".plugin");
/// assert_eq!(settings.archive_suffix(), "plugin");
/// assert_eq!(settings.descriptor_path(), "META-INF/hangar.factories");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    archive_suffix: String,
    descriptor_path: String,
    native_dir: String,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            archive_suffix: DEFAULT_ARCHIVE_SUFFIX.to_owned(),
            descriptor_path: DEFAULT_DESCRIPTOR_PATH.to_owned(),
            native_dir: DEFAULT_NATIVE_DIR.to_owned(),
        }
    }
}

impl LoaderSettings {
    /// Creates settings with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the archive file extension. A leading `.` is ignored.
    #[must_use]
    pub fn with_archive_suffix(mut self, suffix: impl Into<String>) -> Self {
        let raw = suffix.into();
        self.archive_suffix = raw.trim_start_matches('.').to_owned();
        self
    }

    /// Overrides the descriptor resource path.
    #[must_use]
    pub fn with_descriptor_path(mut self, path: impl Into<String>) -> Self {
        self.descriptor_path = path.into();
        self
    }

    /// Overrides the archive directory searched for a native module.
    #[must_use]
    pub fn with_native_dir(mut self, dir: impl Into<String>) -> Self {
        self.native_dir = dir.into();
        self
    }

    /// Returns the archive file extension, without a leading `.`.
    #[must_use]
    pub fn archive_suffix(&self) -> &str {
        self.archive_suffix.trim_start_matches('.')
    }

    /// Returns the descriptor resource path.
    #[must_use]
    pub const fn descriptor_path(&self) -> &str {
        self.descriptor_path.as_str()
    }

    /// Returns the native module directory inside an archive.
    #[must_use]
    pub fn native_dir(&self) -> &str {
        self.native_dir.trim_matches('/')
    }

    /// Returns `true` when `path` carries the archive extension.
    #[must_use]
    pub fn is_archive(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|extension| extension == self.archive_suffix())
    }
}
