//! Archive scanner listing candidate plugin archives in a directory.
//!
//! The scanner only inspects direct children of the directory. Entries are
//! returned in directory-listing order, which is platform dependent; callers
//! must not assume any sorting.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::DiscoveryError;
use crate::settings::LoaderSettings;

/// Tracing target for scanner operations.
const SCAN_TARGET: &str = "hangar_plugins::scanner";

/// One loadable plugin archive found on disk.
///
/// # Example
///
/// ```
/// use hangar_plugins::PluginArchive;
///
/// let archive = PluginArchive::from_path("/srv/plugins/pluginA.jar").expect("utf-8 name");
/// assert_eq!(archive.name(), "pluginA");
/// assert_eq!(archive.file_name(), "pluginA.jar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginArchive {
    file_name: String,
    name: String,
    location: PathBuf,
}

impl PluginArchive {
    /// Describes the archive at `location`.
    ///
    /// Returns `None` when the path has no UTF-8 file name.
    #[must_use]
    pub fn from_path(location: impl Into<PathBuf>) -> Option<Self> {
        let location = location.into();
        let file_name = location.file_name()?.to_str()?.to_owned();
        let name = location.file_stem()?.to_str()?.to_owned();
        Some(Self {
            file_name,
            name,
            location,
        })
    }

    /// Returns the archive name: the file name without its extension.
    ///
    /// Descriptor keys for this archive are prefixed with this name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the archive file name, extension included.
    #[must_use]
    pub const fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Returns the archive location on disk.
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }
}

/// Archives found by [`scan`], plus the entries that looked like archives
/// but could not be used.
#[derive(Debug, Default)]
pub struct ScanReport {
    archives: Vec<PluginArchive>,
    rejected: Vec<DiscoveryError>,
}

impl ScanReport {
    /// Returns the usable archives in directory-listing order.
    #[must_use]
    pub fn archives(&self) -> &[PluginArchive] {
        &self.archives
    }

    /// Returns one [`DiscoveryError::ArchiveOpen`] per rejected entry.
    #[must_use]
    pub fn rejected(&self) -> &[DiscoveryError] {
        &self.rejected
    }

    /// Splits the report into archives and rejected entries.
    #[must_use]
    pub fn into_parts(self) -> (Vec<PluginArchive>, Vec<DiscoveryError>) {
        (self.archives, self.rejected)
    }
}

/// Lists the plugin archives directly inside `directory`.
///
/// A path that does not exist, or is not a directory, yields an empty
/// report. Subdirectories and files without the configured extension are
/// ignored. Archives whose file name is not UTF-8 cannot be named in
/// descriptor keys; they are returned in [`ScanReport::rejected`].
///
/// # Errors
///
/// Returns [`DiscoveryError::Scan`] if the directory cannot be inspected or
/// enumerated.
pub fn scan(directory: &Path, settings: &LoaderSettings) -> Result<ScanReport, DiscoveryError> {
    let scan_error = |source: io::Error| DiscoveryError::Scan {
        path: directory.to_path_buf(),
        source: Arc::new(source),
    };

    match fs::metadata(directory) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => {
            debug!(
                target: SCAN_TARGET,
                directory = %directory.display(),
                "plugin path is not a directory; nothing to scan"
            );
            return Ok(ScanReport::default());
        }
        Err(error)
            if matches!(
                error.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) =>
        {
            debug!(
                target: SCAN_TARGET,
                directory = %directory.display(),
                "plugin directory does not exist; nothing to scan"
            );
            return Ok(ScanReport::default());
        }
        Err(error) => return Err(scan_error(error)),
    }

    let mut report = ScanReport::default();
    for dir_entry in fs::read_dir(directory).map_err(scan_error)? {
        let entry = dir_entry.map_err(scan_error)?;
        if entry.file_type().map_err(scan_error)?.is_dir() {
            continue;
        }
        let path = entry.path();
        if !settings.is_archive(&path) {
            continue;
        }
        match PluginArchive::from_path(&path) {
            Some(archive) => report.archives.push(archive),
            None => {
                warn!(
                    target: SCAN_TARGET,
                    path = %path.display(),
                    "rejecting archive with a non UTF-8 file name"
                );
                report.rejected.push(DiscoveryError::archive_open(
                    path,
                    "archive file name is not valid UTF-8",
                ));
            }
        }
    }

    debug!(
        target: SCAN_TARGET,
        directory = %directory.display(),
        count = report.archives.len(),
        rejected = report.rejected.len(),
        "scanned plugin directory"
    );
    Ok(report)
}

#[cfg(test)]
mod tests;
