//! Sample plugin providing two `DemoService` implementations.
//!
//! Build the crate as a `cdylib` and package it as `echo.jar` with the
//! library under `lib/` and [`DESCRIPTOR`] at `META-INF/hangar.factories`.
//! The host then discovers both services through the `echo` archive.

#[cfg(test)]
mod tests;

use hangar_sdk::{DemoContract, DemoService, Registrar, ServiceObject};

/// Identifier of [`EchoService`].
pub const ECHO_SERVICE: &str = "hangar.echo.EchoService";

/// Identifier of [`ShoutService`].
pub const SHOUT_SERVICE: &str = "hangar.echo.ShoutService";

/// Descriptor packaged with the plugin archive.
pub const DESCRIPTOR: &str = include_str!("../META-INF/hangar.factories");

/// Repeats the message back.
#[derive(Debug, Default)]
pub struct EchoService;

impl DemoService for EchoService {
    fn demo_test(&self, message: &str) -> String {
        format!("echo: {message}")
    }
}

/// Repeats the message back in upper case.
#[derive(Debug, Default)]
pub struct ShoutService;

impl DemoService for ShoutService {
    fn demo_test(&self, message: &str) -> String {
        format!("ECHO: {}", message.to_uppercase())
    }
}

/// Registers every service this plugin provides.
pub fn register(registrar: &mut dyn Registrar) {
    registrar.register(ECHO_SERVICE, || {
        Ok(ServiceObject::new::<DemoContract>(Box::new(EchoService)))
    });
    registrar.register(SHOUT_SERVICE, || {
        Ok(ServiceObject::new::<DemoContract>(Box::new(ShoutService)))
    });
}

hangar_sdk::export_plugin!(register);
