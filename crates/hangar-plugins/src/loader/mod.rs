//! Caller-facing discovery pipeline.
//!
//! [`PluginLoader`] is the single entry point for hosts: it scans a
//! directory, builds one isolation context per archive, and instantiates the
//! services each archive declares for a contract. Failures never stop the
//! run; they are collected in the returned [`Discovery`] next to the
//! services that were built.

use std::path::Path;
use std::sync::Arc;

use hangar_sdk::CapabilityContract;
use tracing::{debug, warn};

use crate::context::{IsolationContext, IsolationLoader, SharedContext};
use crate::error::DiscoveryError;
use crate::instantiate::ServiceInstance;
use crate::module::{ModuleLoader, NativeModuleLoader};
use crate::scanner::{self, PluginArchive, ScanReport};
use crate::settings::LoaderSettings;

/// Tracing target for the discovery pipeline.
const LOADER_TARGET: &str = "hangar_plugins::loader";

/// Services discovered for one contract, plus every failure met on the way.
pub struct Discovery<C: CapabilityContract> {
    instances: Vec<ServiceInstance<C>>,
    errors: Vec<DiscoveryError>,
}

impl<C: CapabilityContract> Default for Discovery<C> {
    fn default() -> Self {
        Self {
            instances: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<C: CapabilityContract> Discovery<C> {
    /// Returns the services in archive order, descriptor order within an
    /// archive.
    #[must_use]
    pub fn instances(&self) -> &[ServiceInstance<C>] {
        &self.instances
    }

    /// Returns the failures in the order they were met.
    #[must_use]
    pub fn errors(&self) -> &[DiscoveryError] {
        &self.errors
    }

    /// Returns `true` when no failure was recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Splits the discovery into services and failures.
    #[must_use]
    pub fn into_parts(self) -> (Vec<ServiceInstance<C>>, Vec<DiscoveryError>) {
        (self.instances, self.errors)
    }

    fn record(&mut self, error: DiscoveryError) {
        warn!(target: LOADER_TARGET, %error, "plugin discovery failure");
        self.errors.push(error);
    }
}

impl<C: CapabilityContract> std::fmt::Debug for Discovery<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discovery")
            .field("instances", &self.instances)
            .field("errors", &self.errors)
            .finish()
    }
}

/// Discovers plugin services from a directory of archives.
///
/// # Example
///
/// ```no_run
/// use hangar_plugins::{LoaderSettings, PluginLoader, SharedContext};
/// use hangar_sdk::DemoContract;
/// use std::path::Path;
///
/// let loader = PluginLoader::native(LoaderSettings::new(), SharedContext::empty());
/// let discovery = loader.list_implementations::<DemoContract>(Path::new("plugins"));
/// for service in discovery.instances() {
///     let _ = service.demo_test("load success");
/// }
/// ```
#[derive(Debug)]
pub struct PluginLoader<L> {
    settings: LoaderSettings,
    contexts: IsolationLoader<L>,
}

impl PluginLoader<NativeModuleLoader> {
    /// Creates a loader that loads each archive's native module.
    #[must_use]
    pub fn native(settings: LoaderSettings, shared: Arc<SharedContext>) -> Self {
        let module_loader = NativeModuleLoader::new(&settings);
        Self::new(settings, module_loader, shared)
    }
}

impl<L> PluginLoader<L> {
    /// Creates a loader with an explicit module loader.
    #[must_use]
    pub fn new(settings: LoaderSettings, module_loader: L, shared: Arc<SharedContext>) -> Self {
        let contexts = IsolationLoader::new(module_loader, shared, &settings);
        Self { settings, contexts }
    }

    /// Returns the settings the pipeline runs with.
    #[must_use]
    pub const fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    /// Returns the shared base every context delegates to.
    #[must_use]
    pub fn shared(&self) -> &Arc<SharedContext> {
        self.contexts.shared()
    }

    /// Lists the archives in `directory`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Scan`] if the directory cannot be read.
    pub fn scan(&self, directory: &Path) -> Result<ScanReport, DiscoveryError> {
        scanner::scan(directory, &self.settings)
    }
}

impl<L: ModuleLoader> PluginLoader<L> {
    /// Builds the isolation context for one archive.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::ArchiveOpen`] if the archive is unusable.
    pub fn create_context(&self, archive: &PluginArchive) -> Result<IsolationContext, DiscoveryError> {
        self.contexts.create_context(archive)
    }

    /// Instantiates every implementation of `C` declared by the archives in
    /// `directory`.
    ///
    /// Archives are processed in scan order. A directory that does not exist
    /// yields an empty, error-free discovery. Archives the scanner rejects
    /// are recorded as failures before any archive is opened.
    #[must_use]
    pub fn list_implementations<C: CapabilityContract>(&self, directory: &Path) -> Discovery<C> {
        let mut discovery = Discovery::default();
        let (archives, rejected) = match self.scan(directory) {
            Ok(report) => report.into_parts(),
            Err(error) => {
                discovery.record(error);
                return discovery;
            }
        };
        for error in rejected {
            discovery.record(error);
        }

        for archive in &archives {
            let context = match self.create_context(archive) {
                Ok(context) => context,
                Err(error) => {
                    discovery.record(error);
                    continue;
                }
            };
            for outcome in context.instantiate::<C>() {
                match outcome {
                    Ok(instance) => discovery.instances.push(instance),
                    Err(error) => discovery.record(error),
                }
            }
        }

        debug!(
            target: LOADER_TARGET,
            directory = %directory.display(),
            contract = C::ID,
            archives = archives.len(),
            instances = discovery.instances.len(),
            errors = discovery.errors.len(),
            "plugin discovery finished"
        );
        discovery
    }
}
