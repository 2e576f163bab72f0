//! Registration entry points shared by native plugins and the host.

use crate::contract::ServiceFactory;

/// Null-terminated name of the static a native plugin exports.
pub const DECLARATION_SYMBOL: &[u8] = b"HANGAR_PLUGIN_DECLARATION\0";

/// Sink for the implementations a plugin provides.
pub trait Registrar {
    /// Registers `factory` under the implementation `identifier`.
    fn register(&mut self, identifier: &str, factory: ServiceFactory);
}

/// Static record a native plugin exports under [`DECLARATION_SYMBOL`].
///
/// Host and plugin must be built by the same compiler against the same
/// `hangar-sdk`, since the registration function crosses the library
/// boundary with the Rust ABI.
pub struct PluginDeclaration {
    /// Fills the registrar with the plugin's implementations.
    pub register: fn(&mut dyn Registrar),
}

/// Exports a registration function as the plugin's declaration.
///
/// Invoke once at the root of a `cdylib` crate.
///
/// ```ignore
/// fn register(registrar: &mut dyn hangar_sdk::Registrar) { /* ... */ }
///
/// hangar_sdk::export_plugin!(register);
/// ```
#[macro_export]
macro_rules! export_plugin {
    ($register:path) => {
        #[doc(hidden)]
        #[unsafe(no_mangle)]
        pub static HANGAR_PLUGIN_DECLARATION: $crate::PluginDeclaration =
            $crate::PluginDeclaration {
                register: $register,
            };
    };
}
