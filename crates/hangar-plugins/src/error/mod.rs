//! Domain errors raised while discovering plugin services.
//!
//! Every failure is local to one directory, archive, descriptor resource, or
//! implementation identifier, and carries enough structured context for the
//! caller to report it without parsing messages. I/O errors are wrapped in
//! `Arc` to satisfy the `result_large_err` Clippy lint.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising from plugin discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The plugin directory could not be enumerated.
    #[error("failed to scan plugin directory '{}': {source}", path.display())]
    Scan {
        /// Directory being scanned.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A plugin archive could not be opened, is malformed, or carries a
    /// native module that cannot be loaded.
    #[error("failed to open plugin archive '{}': {message}", path.display())]
    ArchiveOpen {
        /// Location of the archive.
        path: PathBuf,
        /// Human-readable failure description.
        message: String,
        /// Optional underlying I/O error.
        #[source]
        source: Option<Arc<std::io::Error>>,
    },

    /// A descriptor resource contains a line that is not a key/value pair.
    #[error("malformed descriptor '{location}' at line {line}: {message}")]
    DescriptorParse {
        /// Location of the resource, e.g. `plugins/a.jar!/META-INF/hangar.factories`.
        location: String,
        /// One-based line number of the offending line.
        line: usize,
        /// Description of the syntax problem.
        message: String,
    },

    /// A declared implementation could not be turned into a service.
    #[error("cannot instantiate '{identifier}' from '{scope}': {failure}")]
    Instantiation {
        /// Name of the isolation scope (archive name or the shared base).
        scope: String,
        /// Implementation identifier taken from the descriptor.
        identifier: String,
        /// Why construction failed.
        failure: InstantiationFailure,
    },
}

impl DiscoveryError {
    pub(crate) fn archive_open(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ArchiveOpen {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn archive_io(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::ArchiveOpen {
            path: path.into(),
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    pub(crate) fn descriptor(
        location: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::DescriptorParse {
            location: location.into(),
            line,
            message: message.into(),
        }
    }

    pub(crate) fn instantiation(
        scope: impl Into<String>,
        identifier: impl Into<String>,
        failure: InstantiationFailure,
    ) -> Self {
        Self::Instantiation {
            scope: scope.into(),
            identifier: identifier.into(),
            failure,
        }
    }
}

/// Reasons a declared implementation could not be instantiated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstantiationFailure {
    /// Neither the archive's module nor the shared base registers the
    /// identifier.
    #[error("no implementation is registered under this identifier")]
    NotFound,

    /// The factory returned an error.
    #[error("constructor failed: {message}")]
    Constructor {
        /// Error reported by the factory.
        message: String,
    },

    /// The factory panicked.
    #[error("constructor panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },

    /// The factory built a service for a different contract.
    #[error("built for contract '{provided}', expected '{expected}'")]
    NonConformant {
        /// Contract that was requested.
        expected: String,
        /// Contract the factory actually built for.
        provided: String,
    },
}

#[cfg(test)]
mod tests;
