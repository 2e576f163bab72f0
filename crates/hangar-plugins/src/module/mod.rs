//! Private implementation modules carried by plugin archives.
//!
//! Each isolation context owns one [`LoadedModule`]: the table of
//! implementation identifiers its archive provides. Tables are never shared
//! between contexts, so two archives may register the same identifier for
//! unrelated implementations without colliding.
//!
//! How a module is produced is decided by a [`ModuleLoader`]. The
//! [`NativeModuleLoader`] loads a dynamic library shipped inside the archive.
//! The [`StaticModuleLoader`] looks up registration functions linked into
//! the host, for targets where dynamic loading is unavailable.

mod native;

use std::any::Any;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use hangar_sdk::{Registrar, ServiceFactory};
use tracing::{debug, warn};

use crate::archive::ArchiveContents;
use crate::error::DiscoveryError;
use crate::scanner::PluginArchive;

pub use self::native::NativeModuleLoader;

/// Tracing target for module loading.
const MODULE_TARGET: &str = "hangar_plugins::module";

/// Registration function linked into the host for one archive.
pub type RegisterFn = fn(&mut dyn Registrar);

/// Table of implementation factories keyed by identifier.
///
/// The first registration of an identifier wins; later ones are ignored
/// with a warning.
#[derive(Default)]
pub struct ModuleSymbols {
    factories: HashMap<String, ServiceFactory>,
}

impl ModuleSymbols {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table filled by `register`.
    #[must_use]
    pub fn from_registration(register: RegisterFn) -> Self {
        let mut symbols = Self::new();
        register(&mut symbols);
        symbols
    }

    /// Looks up the factory registered under `identifier`.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<ServiceFactory> {
        self.factories.get(identifier).copied()
    }

    /// Returns `true` when `identifier` is registered.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }

    /// Returns the registered identifiers in unspecified order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Returns the number of registered identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Registrar for ModuleSymbols {
    fn register(&mut self, identifier: &str, factory: ServiceFactory) {
        match self.factories.entry(identifier.to_owned()) {
            Entry::Occupied(_) => warn!(
                target: MODULE_TARGET,
                identifier,
                "ignoring duplicate registration"
            ),
            Entry::Vacant(slot) => {
                slot.insert(factory);
            }
        }
    }
}

impl std::fmt::Debug for ModuleSymbols {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

/// A module's symbol table plus whatever keeps its code mapped.
///
/// Factories from a native library point into that library, so the library
/// handle travels with the table and is released only after the table and
/// every instance built from it are gone.
pub struct LoadedModule {
    symbols: ModuleSymbols,
    keep_alive: Option<Box<dyn Any + Send + Sync>>,
}

impl LoadedModule {
    /// A module with no implementations.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(ModuleSymbols::new())
    }

    /// A module whose code is linked into the host.
    #[must_use]
    pub const fn new(symbols: ModuleSymbols) -> Self {
        Self {
            symbols,
            keep_alive: None,
        }
    }

    /// A module whose factories stay valid only while `handle` is alive.
    #[must_use]
    pub fn with_keep_alive(symbols: ModuleSymbols, handle: impl Any + Send + Sync) -> Self {
        Self {
            symbols,
            keep_alive: Some(Box::new(handle)),
        }
    }

    /// Returns the module's symbol table.
    #[must_use]
    pub const fn symbols(&self) -> &ModuleSymbols {
        &self.symbols
    }

    /// Returns `true` when the module owns external code.
    #[must_use]
    pub const fn is_native(&self) -> bool {
        self.keep_alive.is_some()
    }
}

impl std::fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModule")
            .field("symbols", &self.symbols)
            .field("native", &self.is_native())
            .finish()
    }
}

/// Produces the private module of an archive.
///
/// Implementations must return a fresh table for every call so contexts
/// never share resolution state.
pub trait ModuleLoader {
    /// Loads the module carried by `archive`.
    ///
    /// Archives without code yield [`LoadedModule::empty`].
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::ArchiveOpen`] if the archive carries a
    /// module that cannot be loaded.
    fn load_module(
        &self,
        archive: &PluginArchive,
        contents: &mut ArchiveContents,
    ) -> Result<LoadedModule, DiscoveryError>;
}

/// Module loader backed by registration functions linked into the host.
///
/// # Example
///
/// ```
/// use hangar_plugins::StaticModuleLoader;
/// use hangar_sdk::Registrar;
///
/// fn register(_registrar: &mut dyn Registrar) {}
///
/// let loader = StaticModuleLoader::new().with_module("pluginA", register);
/// assert!(loader.has_module("pluginA"));
/// ```
#[derive(Default)]
pub struct StaticModuleLoader {
    modules: HashMap<String, RegisterFn>,
}

impl StaticModuleLoader {
    /// Creates a loader with no modules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `register` to archives called `archive_name`.
    #[must_use]
    pub fn with_module(mut self, archive_name: impl Into<String>, register: RegisterFn) -> Self {
        self.modules.insert(archive_name.into(), register);
        self
    }

    /// Returns `true` when a module is bound to `archive_name`.
    #[must_use]
    pub fn has_module(&self, archive_name: &str) -> bool {
        self.modules.contains_key(archive_name)
    }
}

impl ModuleLoader for StaticModuleLoader {
    fn load_module(
        &self,
        archive: &PluginArchive,
        _contents: &mut ArchiveContents,
    ) -> Result<LoadedModule, DiscoveryError> {
        let Some(register) = self.modules.get(archive.name()) else {
            debug!(
                target: MODULE_TARGET,
                archive = archive.name(),
                "no linked module for archive"
            );
            return Ok(LoadedModule::empty());
        };
        Ok(LoadedModule::new(ModuleSymbols::from_registration(*register)))
    }
}

impl std::fmt::Debug for StaticModuleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.modules.keys()).finish()
    }
}
