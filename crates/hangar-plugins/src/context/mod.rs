//! Isolation contexts and the shared base they delegate to.
//!
//! Every plugin archive gets its own [`IsolationContext`]. Identifier lookup
//! searches the archive's private module first and then falls back to the
//! [`SharedContext`], which holds host-provided implementations and
//! descriptor resources. The shared context is immutable once built and is
//! shared through `Arc`, so contexts never contend for it; nothing an
//! archive registers is visible to any other archive.

use std::sync::Arc;

use hangar_sdk::{CapabilityContract, ServiceFactory};
use tracing::debug;

use crate::archive::ArchiveContents;
use crate::descriptor::{self, DescriptorResource, Resolution};
use crate::error::DiscoveryError;
use crate::instantiate::{self, Instances, ResolvedSymbol, ServiceInstance, SymbolScope};
use crate::module::{LoadedModule, ModuleLoader, ModuleSymbols, RegisterFn};
use crate::scanner::PluginArchive;
use crate::settings::LoaderSettings;

/// Tracing target for context construction.
const CONTEXT_TARGET: &str = "hangar_plugins::context";

/// Scope name reported for services created by the shared base.
pub const SHARED_SCOPE: &str = "<shared>";

/// The shared ambient boundary every isolation context falls back to.
///
/// # Example
///
/// ```
/// use hangar_plugins::SharedContext;
/// use hangar_sdk::DemoContract;
///
/// let shared = SharedContext::builder()
///     .with_resource("host!/META-INF/hangar.factories", "DemoService=")
///     .build();
/// assert_eq!(shared.instantiate::<DemoContract>().count(), 0);
/// ```
#[derive(Debug)]
pub struct SharedContext {
    module: Arc<LoadedModule>,
    resources: Vec<DescriptorResource>,
}

impl SharedContext {
    /// Starts building a shared context.
    #[must_use]
    pub fn builder() -> SharedContextBuilder {
        SharedContextBuilder::default()
    }

    /// A shared context with no implementations and no resources.
    #[must_use]
    pub fn empty() -> Arc<Self> {
        Self::builder().build()
    }

    /// Returns the host-provided descriptor resources in registration order.
    #[must_use]
    pub fn resources(&self) -> &[DescriptorResource] {
        &self.resources
    }

    /// Returns the host-provided implementations.
    #[must_use]
    pub fn symbols(&self) -> &ModuleSymbols {
        self.module.symbols()
    }

    /// Resolves the host-global key `contract_id` across the shared
    /// resources.
    #[must_use]
    pub fn resolve_implementations(&self, contract_id: &str) -> Resolution {
        descriptor::resolve(&self.resources, contract_id)
    }

    /// Instantiates the implementations the shared resources declare for
    /// `C`, without any plugin archive.
    #[must_use]
    pub fn instantiate<C: CapabilityContract>(&self) -> Instances<'_, C> {
        Instances::new(self, self.resolve_implementations(C::ID))
    }
}

impl SymbolScope for SharedContext {
    fn scope_name(&self) -> &str {
        SHARED_SCOPE
    }

    fn lookup(&self, identifier: &str) -> Option<ResolvedSymbol<'_>> {
        self.module
            .symbols()
            .get(identifier)
            .map(|factory| ResolvedSymbol::new(factory, &self.module))
    }
}

/// Builder for [`SharedContext`].
#[derive(Debug, Default)]
pub struct SharedContextBuilder {
    symbols: ModuleSymbols,
    resources: Vec<DescriptorResource>,
}

impl SharedContextBuilder {
    /// Adds every implementation `register` provides.
    #[must_use]
    pub fn with_module(mut self, register: RegisterFn) -> Self {
        register(&mut self.symbols);
        self
    }

    /// Adds one implementation.
    #[must_use]
    pub fn with_service(mut self, identifier: &str, factory: ServiceFactory) -> Self {
        hangar_sdk::Registrar::register(&mut self.symbols, identifier, factory);
        self
    }

    /// Adds a descriptor resource visible to every context.
    #[must_use]
    pub fn with_resource(mut self, location: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.resources.push(DescriptorResource::new(location, content));
        self
    }

    /// Freezes the shared context.
    #[must_use]
    pub fn build(self) -> Arc<SharedContext> {
        Arc::new(SharedContext {
            module: Arc::new(LoadedModule::new(self.symbols)),
            resources: self.resources,
        })
    }
}

/// A symbol-resolution boundary scoped to one plugin archive.
#[derive(Debug)]
pub struct IsolationContext {
    archive: PluginArchive,
    descriptor: Option<DescriptorResource>,
    module: Arc<LoadedModule>,
    parent: Arc<SharedContext>,
}

impl IsolationContext {
    /// Returns the archive the context was built from.
    #[must_use]
    pub const fn archive(&self) -> &PluginArchive {
        &self.archive
    }

    /// Returns the shared base this context delegates to.
    #[must_use]
    pub fn parent(&self) -> &SharedContext {
        &self.parent
    }

    /// Returns the archive's private module.
    #[must_use]
    pub fn module(&self) -> &LoadedModule {
        &self.module
    }

    /// Iterates over the descriptor resources visible through this context:
    /// the archive's own resource first, then the shared ones.
    pub fn resources(&self) -> impl Iterator<Item = &DescriptorResource> {
        self.descriptor.iter().chain(self.parent.resources())
    }

    /// Resolves the implementations declared for
    /// `<archive_name>.<contract_id>` on this context's chain.
    #[must_use]
    pub fn resolve_implementations(&self, archive_name: &str, contract_id: &str) -> Resolution {
        descriptor::resolve(
            self.resources(),
            &descriptor::descriptor_key(archive_name, contract_id),
        )
    }

    /// Instantiates the implementations this archive declares for `C`.
    #[must_use]
    pub fn instantiate<C: CapabilityContract>(&self) -> Instances<'_, C> {
        Instances::new(self, self.resolve_implementations(self.archive.name(), C::ID))
    }

    /// Builds one implementation by identifier, bypassing descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Instantiation`] if the identifier cannot be
    /// built or does not satisfy `C`.
    pub fn construct<C: CapabilityContract>(
        &self,
        identifier: &str,
    ) -> Result<ServiceInstance<C>, DiscoveryError> {
        instantiate::construct(self, identifier)
    }
}

impl SymbolScope for IsolationContext {
    fn scope_name(&self) -> &str {
        self.archive.name()
    }

    fn lookup(&self, identifier: &str) -> Option<ResolvedSymbol<'_>> {
        self.module
            .symbols()
            .get(identifier)
            .map(|factory| ResolvedSymbol::new(factory, &self.module))
            .or_else(|| self.parent.lookup(identifier))
    }
}

/// Builds one [`IsolationContext`] per archive.
#[derive(Debug)]
pub struct IsolationLoader<L> {
    module_loader: L,
    shared: Arc<SharedContext>,
    descriptor_path: String,
}

impl<L> IsolationLoader<L> {
    /// Creates a loader whose contexts delegate to `shared`.
    #[must_use]
    pub fn new(module_loader: L, shared: Arc<SharedContext>, settings: &LoaderSettings) -> Self {
        Self {
            module_loader,
            shared,
            descriptor_path: settings.descriptor_path().to_owned(),
        }
    }

    /// Returns the shared base handed to every context.
    #[must_use]
    pub fn shared(&self) -> &Arc<SharedContext> {
        &self.shared
    }
}

impl<L: ModuleLoader> IsolationLoader<L> {
    /// Opens `archive` and builds its isolation context.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::ArchiveOpen`] if the archive cannot be
    /// opened, is not a valid archive, or carries a module that fails to
    /// load.
    pub fn create_context(&self, archive: &PluginArchive) -> Result<IsolationContext, DiscoveryError> {
        let mut contents = ArchiveContents::open(archive)?;
        let descriptor = contents
            .read_entry(&self.descriptor_path)?
            .map(|bytes| DescriptorResource::new(contents.entry_location(&self.descriptor_path), bytes));
        let module = self.module_loader.load_module(archive, &mut contents)?;

        debug!(
            target: CONTEXT_TARGET,
            archive = archive.name(),
            has_descriptor = descriptor.is_some(),
            implementations = module.symbols().len(),
            "created isolation context"
        );
        Ok(IsolationContext {
            archive: archive.clone(),
            descriptor,
            module: Arc::new(module),
            parent: Arc::clone(&self.shared),
        })
    }
}
