//! Crate-level integration and BDD tests.

pub(crate) mod support;


use std::path::Path;

use hangar_sdk::DemoContract;
use tempfile::TempDir;

use crate::context::SharedContext;
use crate::loader::PluginLoader;
use crate::module::StaticModuleLoader;
use crate::settings::LoaderSettings;

use self::support::{outputs, register_alpha, register_beta, write_plugin};

#[test]
fn end_to_end_discovery_keeps_plugins_apart() {
    let dir = TempDir::new().expect("create temp dir");
    write_plugin(dir.path(), "pluginA.jar", "pluginA.DemoService=com.x.Impl");
    write_plugin(dir.path(), "pluginB.jar", "pluginB.DemoService=com.x.Impl");

    let modules = StaticModuleLoader::new()
        .with_module("pluginA", register_alpha)
        .with_module("pluginB", register_beta);
    let loader = PluginLoader::new(LoaderSettings::new(), modules, SharedContext::empty());
    let discovery = loader.list_implementations::<DemoContract>(dir.path());

    assert!(discovery.is_clean(), "unexpected errors: {:?}", discovery.errors());
    let mut seen = outputs(discovery.instances(), "load success");
    seen.sort_unstable();
    assert_eq!(seen, vec!["alpha: load success", "beta: load success"]);
}

#[test]
fn echo_plugin_runs_through_static_loader() {
    let dir = TempDir::new().expect("create temp dir");
    write_plugin(
        dir.path(),
        "echo.jar",
        &format!(
            "echo.DemoService={}, {}",
            hangar_plugin_echo::ECHO_SERVICE,
            hangar_plugin_echo::SHOUT_SERVICE
        ),
    );
    let modules = StaticModuleLoader::new().with_module("echo", hangar_plugin_echo::register);
    let loader = PluginLoader::new(LoaderSettings::new(), modules, SharedContext::empty());
    let discovery = loader.list_implementations::<DemoContract>(Path::new(dir.path()));

    assert!(discovery.is_clean(), "unexpected errors: {:?}", discovery.errors());
    assert_eq!(
        outputs(discovery.instances(), "load success"),
        vec!["echo: load success", "ECHO: LOAD SUCCESS"]
    );
}
