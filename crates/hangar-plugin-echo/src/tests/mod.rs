//! Unit tests for the echo plugin.

use std::collections::HashMap;

use hangar_sdk::{DemoContract, Registrar, ServiceFactory};
use rstest::rstest;

use super::*;

#[derive(Default)]
struct Collected(HashMap<String, ServiceFactory>);

impl Registrar for Collected {
    fn register(&mut self, identifier: &str, factory: ServiceFactory) {
        self.0.insert(identifier.to_owned(), factory);
    }
}

fn collected() -> Collected {
    let mut registrar = Collected::default();
    register(&mut registrar);
    registrar
}

#[rstest]
#[case::echo(ECHO_SERVICE, "echo: load success")]
#[case::shout(SHOUT_SERVICE, "ECHO: LOAD SUCCESS")]
fn registered_services_answer(#[case] identifier: &str, #[case] expected: &str) {
    let factory = *collected().0.get(identifier).expect("service registered");
    let service = factory()
        .expect("construct")
        .downcast::<DemoContract>()
        .unwrap_or_else(|_| panic!("{identifier} must satisfy DemoService"));
    assert_eq!(service.demo_test("load success"), expected);
}

#[test]
fn registers_exactly_two_services() {
    assert_eq!(collected().0.len(), 2);
}

#[test]
fn declaration_exports_the_register_function() {
    let mut registrar = Collected::default();
    (HANGAR_PLUGIN_DECLARATION.register)(&mut registrar);
    assert!(registrar.0.contains_key(ECHO_SERVICE));
}

#[test]
fn descriptor_lists_both_services_for_the_echo_archive() {
    let joined: String = DESCRIPTOR
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .map(|line| line.trim().trim_end_matches('\\'))
        .collect();
    assert_eq!(
        joined,
        format!("echo.DemoService={ECHO_SERVICE},{SHOUT_SERVICE}")
    );
}
