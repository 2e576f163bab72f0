//! Unit tests for descriptor parsing and resolution.

use rstest::rstest;

use super::*;

fn resource(text: &str) -> DescriptorResource {
    DescriptorResource::new("test!/META-INF/hangar.factories", text)
}

fn parse(text: &str) -> Properties {
    Properties::parse(&resource(text)).expect("well-formed descriptor")
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[rstest]
#[case::equals("k=v")]
#[case::colon("k:v")]
#[case::padded("  k  =  v  ")]
#[case::crlf("k=v\r\n")]
fn parses_single_pair(#[case] text: &str) {
    let properties = parse(text);
    assert_eq!(properties.get("k"), Some("v"));
    assert_eq!(properties.len(), 1);
}

#[test]
fn skips_comments_and_blank_lines() {
    let properties = parse("# header\n\n   ! bang comment\nk=v\n");
    assert_eq!(properties.iter().collect::<Vec<_>>(), vec![("k", "v")]);
}

#[test]
fn splits_on_first_separator_only() {
    let properties = parse("k=a=b:c");
    assert_eq!(properties.get("k"), Some("a=b:c"));
}

#[test]
fn empty_value_is_allowed() {
    let properties = parse("k=");
    assert_eq!(properties.get("k"), Some(""));
}

#[test]
fn last_duplicate_wins() {
    let properties = parse("k=first\nk=second\n");
    assert_eq!(properties.get("k"), Some("second"));
    assert_eq!(properties.len(), 2);
}

#[test]
fn joins_continuation_lines() {
    let properties = parse("k=com.x.A,\\\n    com.x.B,\\\n    com.x.C\nother=1\n");
    assert_eq!(properties.get("k"), Some("com.x.A,com.x.B,com.x.C"));
    assert_eq!(properties.get("other"), Some("1"));
}

#[test]
fn escaped_backslash_does_not_continue() {
    let properties = parse("k=path\\\\\nnext=1");
    assert_eq!(properties.get("k"), Some("path\\\\"));
    assert_eq!(properties.get("next"), Some("1"));
}

#[rstest]
#[case::no_separator("k=v\njust words\n", 2)]
#[case::empty_key("=value", 1)]
#[case::dangling_continuation("k=v\nother=a,\\", 2)]
fn rejects_malformed_lines(#[case] text: &str, #[case] expected_line: usize) {
    let error = Properties::parse(&resource(text)).expect_err("must reject");
    let DiscoveryError::DescriptorParse { line, location, .. } = error else {
        panic!("expected DescriptorParse");
    };
    assert_eq!(line, expected_line);
    assert_eq!(location, "test!/META-INF/hangar.factories");
}

#[test]
fn rejects_invalid_utf8_with_line() {
    let bad = DescriptorResource::new("bad", b"k=v\nx=\xff\n".to_vec());
    let error = Properties::parse(&bad).expect_err("must reject");
    assert!(matches!(error, DiscoveryError::DescriptorParse { line: 2, .. }));
}

// ---------------------------------------------------------------------------
// Identifier splitting
// ---------------------------------------------------------------------------

#[rstest]
#[case::plain("B,A", &["B", "A"])]
#[case::whitespace(" B , A ", &["B", "A"])]
#[case::empties(",B,,A,", &["B", "A"])]
#[case::blank("   ", &[])]
fn split_identifiers_trims_and_drops_empty(#[case] value: &str, #[case] expected: &[&str]) {
    assert_eq!(split_identifiers(value).collect::<Vec<_>>(), expected);
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[test]
fn resolve_preserves_declaration_order() {
    let resources = [resource("pluginA.demo=B,A")];
    let resolution = resolve(&resources, "pluginA.demo");
    assert_eq!(resolution.identifiers(), ["B", "A"]);
    assert!(resolution.errors().is_empty());
}

#[test]
fn resolve_missing_key_is_empty_not_error() {
    let resources = [resource("pluginA.other=X")];
    let resolution = resolve(&resources, "pluginA.demo");
    assert!(resolution.identifiers().is_empty());
    assert!(resolution.errors().is_empty());
}

#[test]
fn resolve_without_resources_is_empty() {
    let resolution = resolve(&[], "pluginA.demo");
    assert!(resolution.identifiers().is_empty());
    assert!(resolution.errors().is_empty());
}

#[test]
fn resolve_concatenates_across_resources() {
    let resources = [
        DescriptorResource::new("first", "p.demo=A"),
        DescriptorResource::new("second", "p.demo=B, A"),
    ];
    let resolution = resolve(&resources, "p.demo");
    assert_eq!(resolution.identifiers(), ["A", "B", "A"]);
}

#[test]
fn malformed_resource_does_not_block_others() {
    let resources = [
        DescriptorResource::new("broken", "p.demo=A\nnot a pair\n"),
        DescriptorResource::new("good", "p.demo=B"),
    ];
    let (identifiers, errors) = resolve(&resources, "p.demo").into_parts();
    assert_eq!(identifiers, ["B"]);
    assert_eq!(errors.len(), 1);
    let Some(DiscoveryError::DescriptorParse { location, .. }) = errors.first() else {
        panic!("expected DescriptorParse");
    };
    assert_eq!(location, "broken");
}
