//! Unit tests for discovery error types.

use std::path::PathBuf;
use std::sync::Arc;

use rstest::rstest;

use super::*;

#[test]
fn scan_error_message_includes_path() {
    let error = DiscoveryError::Scan {
        path: PathBuf::from("/srv/plugins"),
        source: Arc::new(std::io::Error::from(std::io::ErrorKind::PermissionDenied)),
    };
    let message = error.to_string();
    assert!(
        message.contains("/srv/plugins"),
        "expected path in message: {message}"
    );
}

#[test]
fn archive_open_exposes_io_source() {
    let error = DiscoveryError::archive_io(
        "/srv/plugins/a.jar",
        "cannot read archive",
        std::io::Error::from(std::io::ErrorKind::NotFound),
    );
    assert!(std::error::Error::source(&error).is_some());
    assert!(error.to_string().contains("cannot read archive"));
}

#[test]
fn descriptor_error_names_location_and_line() {
    let error = DiscoveryError::descriptor("a.jar!/META-INF/hangar.factories", 7, "missing '='");
    let message = error.to_string();
    assert!(message.contains("a.jar!/META-INF/hangar.factories"));
    assert!(message.contains("line 7"));
}

#[rstest]
#[case::not_found(InstantiationFailure::NotFound, "no implementation")]
#[case::constructor(
    InstantiationFailure::Constructor { message: "disk full".into() },
    "disk full"
)]
#[case::panicked(
    InstantiationFailure::Panicked { message: "boom".into() },
    "panicked: boom"
)]
#[case::non_conformant(
    InstantiationFailure::NonConformant {
        expected: "DemoService".into(),
        provided: "Clock".into(),
    },
    "expected 'DemoService'"
)]
fn instantiation_error_includes_identifier_and_failure(
    #[case] failure: InstantiationFailure,
    #[case] expected: &str,
) {
    let error = DiscoveryError::instantiation("pluginA", "com.x.Impl", failure);
    let message = error.to_string();
    assert!(message.contains("com.x.Impl"), "missing identifier: {message}");
    assert!(message.contains("pluginA"), "missing scope: {message}");
    assert!(message.contains(expected), "missing detail: {message}");
}
