//! Read access to the contents of a plugin archive.
//!
//! Archives are ZIP containers. [`ArchiveContents`] keeps the container
//! open for the duration of context construction so the descriptor resource
//! and any native module can be read from it.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::DiscoveryError;
use crate::scanner::PluginArchive;

/// An opened plugin archive.
pub struct ArchiveContents {
    location: PathBuf,
    zip: ZipArchive<File>,
}

impl std::fmt::Debug for ArchiveContents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveContents")
            .field("location", &self.location)
            .field("entries", &self.zip.len())
            .finish()
    }
}

impl ArchiveContents {
    /// Opens and validates the archive container.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::ArchiveOpen`] if the file cannot be read or
    /// is not a valid archive.
    pub fn open(archive: &PluginArchive) -> Result<Self, DiscoveryError> {
        let location = archive.location().to_path_buf();
        let file = File::open(&location)
            .map_err(|source| DiscoveryError::archive_io(&location, "cannot read archive", source))?;
        let zip = ZipArchive::new(file).map_err(|error| zip_error(&location, error))?;
        Ok(Self { location, zip })
    }

    /// Returns the archive location on disk.
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Returns the names of every entry in the archive.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.zip.file_names()
    }

    /// Reads the entry called `name`, or `None` when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::ArchiveOpen`] if the entry exists but cannot
    /// be decompressed.
    pub fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>, DiscoveryError> {
        let mut entry = match self.zip.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(error) => return Err(zip_error(&self.location, error)),
        };
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).map_err(|source| {
            DiscoveryError::archive_io(&self.location, format!("cannot read entry '{name}'"), source)
        })?;
        Ok(Some(bytes))
    }

    /// Formats the location of an entry for diagnostics.
    #[must_use]
    pub fn entry_location(&self, name: &str) -> String {
        format!("{}!/{name}", self.location.display())
    }
}

fn zip_error(location: &Path, error: ZipError) -> DiscoveryError {
    match error {
        ZipError::Io(source) => DiscoveryError::archive_io(location, "cannot read archive", source),
        other => DiscoveryError::archive_open(location, format!("not a valid archive: {other}")),
    }
}
