//! Isolated plugin discovery for hangar hosts.
//!
//! The `hangar-plugins` crate finds plugin archives in a directory, gives
//! each archive its own symbol-resolution boundary, and instantiates the
//! services an archive declares for a capability contract.
//!
//! # Architecture
//!
//! The pipeline runs in four stages, each usable on its own:
//!
//! 1. [`scanner`] lists the archives (files with the configured extension)
//!    directly inside a directory.
//! 2. [`context`] opens an archive and builds an [`IsolationContext`]: the
//!    archive's private [`module`] of implementations, chained to a
//!    read-only [`SharedContext`] of host-provided ones.
//! 3. [`descriptor`] reads the key/value descriptor resources visible
//!    through a context and maps `<archive>.<contract>` to implementation
//!    identifiers.
//! 4. [`instantiate`] constructs each identifier lazily and checks that it
//!    satisfies the requested [`hangar_sdk::CapabilityContract`].
//!
//! [`PluginLoader::list_implementations`] runs all four for every archive
//! and returns a [`Discovery`] holding both the services and the failures.
//!
//! # Example
//!
//! ```rust,no_run
//! use hangar_plugins::{LoaderSettings, PluginLoader, SharedContext};
//! use hangar_sdk::DemoContract;
//! use std::path::Path;
//!
//! let loader = PluginLoader::native(LoaderSettings::new(), SharedContext::empty());
//! let discovery = loader.list_implementations::<DemoContract>(Path::new("plugins"));
//! for service in discovery.instances() {
//!     println!("{}", service.demo_test("load success"));
//! }
//! for error in discovery.errors() {
//!     eprintln!("skipped: {error}");
//! }
//! ```

pub mod archive;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod instantiate;
pub mod loader;
pub mod module;
pub mod scanner;
pub mod settings;

#[cfg(test)]
mod tests;

pub use self::context::{IsolationContext, IsolationLoader, SharedContext, SharedContextBuilder};
pub use self::error::{DiscoveryError, InstantiationFailure};
pub use self::instantiate::{Instances, ServiceInstance};
pub use self::loader::{Discovery, PluginLoader};
pub use self::module::{LoadedModule, ModuleLoader, NativeModuleLoader, StaticModuleLoader};
pub use self::scanner::{PluginArchive, ScanReport};
pub use self::settings::LoaderSettings;
