//! Native module loading through `libloading`.
//!
//! The archive's dynamic library is extracted into a private temporary
//! directory and opened with local symbol visibility, so identically named
//! symbols in two plugins stay apart. The library must export
//! [`hangar_sdk::DECLARATION_SYMBOL`].

use std::fs;
use std::path::Path;

use hangar_sdk::{DECLARATION_SYMBOL, PluginDeclaration};
use libloading::Library;
use tempfile::TempDir;
use tracing::debug;

use super::{LoadedModule, MODULE_TARGET, ModuleLoader, ModuleSymbols};
use crate::archive::ArchiveContents;
use crate::error::DiscoveryError;
use crate::scanner::PluginArchive;
use crate::settings::LoaderSettings;

/// Loads the dynamic library found under the archive's native directory.
#[derive(Debug, Clone)]
pub struct NativeModuleLoader {
    native_dir: String,
}

impl NativeModuleLoader {
    /// Creates a loader looking under the configured native directory.
    #[must_use]
    pub fn new(settings: &LoaderSettings) -> Self {
        Self {
            native_dir: settings.native_dir().to_owned(),
        }
    }

    /// Finds the single platform library directly under the native directory.
    fn library_entry(
        &self,
        contents: &ArchiveContents,
    ) -> Result<Option<String>, DiscoveryError> {
        let prefix = format!("{}/", self.native_dir);
        let mut candidates = contents.entry_names().filter(|name| {
            name.strip_prefix(prefix.as_str()).is_some_and(|rest| {
                !rest.contains('/') && rest.ends_with(std::env::consts::DLL_SUFFIX)
            })
        });
        let first = candidates.next().map(str::to_owned);
        if let Some(second) = candidates.next() {
            return Err(DiscoveryError::archive_open(
                contents.location(),
                format!(
                    "more than one native module under '{prefix}': '{}' and '{second}'",
                    first.unwrap_or_default()
                ),
            ));
        }
        Ok(first)
    }
}

/// Keeps an extracted library mapped; the library closes before its
/// directory is removed.
struct NativeLibrary {
    _library: Library,
    _workspace: TempDir,
}

impl ModuleLoader for NativeModuleLoader {
    fn load_module(
        &self,
        archive: &PluginArchive,
        contents: &mut ArchiveContents,
    ) -> Result<LoadedModule, DiscoveryError> {
        let Some(entry) = self.library_entry(contents)? else {
            debug!(
                target: MODULE_TARGET,
                archive = archive.name(),
                "archive carries no native module"
            );
            return Ok(LoadedModule::empty());
        };

        let bytes = contents.read_entry(&entry)?.ok_or_else(|| {
            DiscoveryError::archive_open(archive.location(), format!("entry '{entry}' vanished"))
        })?;
        let workspace = tempfile::Builder::new()
            .prefix("hangar-module-")
            .tempdir()
            .map_err(|source| {
                DiscoveryError::archive_io(
                    archive.location(),
                    "cannot create module directory",
                    source,
                )
            })?;
        let file_name = Path::new(&entry).file_name().unwrap_or_default();
        let library_path = workspace.path().join(file_name);
        fs::write(&library_path, bytes).map_err(|source| {
            DiscoveryError::archive_io(archive.location(), "cannot extract native module", source)
        })?;

        debug!(
            target: MODULE_TARGET,
            archive = archive.name(),
            module = %library_path.display(),
            "loading native module"
        );

        // SAFETY: loading runs the library's initialisers. Plugins are
        // trusted code built against the same `hangar-sdk`.
        let library = unsafe { Library::new(&library_path) }.map_err(|error| {
            DiscoveryError::archive_open(
                archive.location(),
                format!("cannot load native module '{entry}': {error}"),
            )
        })?;
        let symbols = register_symbols(&library).map_err(|message| {
            DiscoveryError::archive_open(archive.location(), format!("module '{entry}' {message}"))
        })?;

        Ok(LoadedModule::with_keep_alive(
            symbols,
            NativeLibrary {
                _library: library,
                _workspace: workspace,
            },
        ))
    }
}

fn register_symbols(library: &Library) -> Result<ModuleSymbols, String> {
    // SAFETY: the symbol is declared by `export_plugin!` as a
    // `PluginDeclaration` static; the pointer is only read while `library`
    // is borrowed.
    let declaration = unsafe { library.get::<*const PluginDeclaration>(DECLARATION_SYMBOL) }
        .map_err(|error| format!("does not export a plugin declaration: {error}"))?;
    let pointer: *const PluginDeclaration = *declaration;
    if pointer.is_null() {
        return Err(String::from("exports a null plugin declaration"));
    }
    // SAFETY: non-null and points at the exported static, which lives as
    // long as the library.
    let register = unsafe { (*pointer).register };
    Ok(ModuleSymbols::from_registration(register))
}
