//! Shared base types for hangar hosts and plugins.
//!
//! Everything in this crate belongs to the shared boundary that every plugin
//! isolation context falls back to. Capability contracts are declared here
//! once so the host and each plugin agree on the shape of a service, while
//! the implementations themselves stay private to the plugin that provides
//! them.
//!
//! A plugin exposes its implementations by filling a [`Registrar`] with
//! [`ServiceFactory`] functions keyed by implementation identifier. Native
//! plugins publish that registration function through [`export_plugin!`].
//!
//! # Example
//!
//! ```
//! use hangar_sdk::{DemoContract, DemoService, Registrar, ServiceObject};
//!
//! struct Greeter;
//!
//! impl DemoService for Greeter {
//!     fn demo_test(&self, message: &str) -> String {
//!         format!("greeter: {message}")
//!     }
//! }
//!
//! pub fn register(registrar: &mut dyn Registrar) {
//!     registrar.register("com.example.Greeter", || {
//!         Ok(ServiceObject::new::<DemoContract>(Box::new(Greeter)))
//!     });
//! }
//! ```

pub mod contract;
pub mod declaration;
pub mod demo;

pub use self::contract::{CapabilityContract, ConstructError, ServiceFactory, ServiceObject};
pub use self::declaration::{DECLARATION_SYMBOL, PluginDeclaration, Registrar};
pub use self::demo::{DemoContract, DemoService};
