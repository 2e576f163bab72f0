//! Service descriptor parsing and resolution.
//!
//! A descriptor is a key/value text resource mapping
//! `<archive name>.<contract id>` to a comma-delimited list of implementation
//! identifiers. The syntax is the line-oriented properties subset:
//!
//! - `key=value` or `key:value`, split on the first separator;
//! - blank lines and lines starting with `#` or `!` are ignored;
//! - a line ending in an odd number of backslashes continues on the next
//!   line, whose leading whitespace is dropped;
//! - when a key repeats, the last value wins.
//!
//! Several resources may be visible on one resolution chain. They are parsed
//! independently, so a malformed resource is reported without hiding the
//! identifiers declared by the others.

use tracing::warn;

use crate::error::DiscoveryError;

/// Tracing target for descriptor resolution.
const DESCRIPTOR_TARGET: &str = "hangar_plugins::descriptor";

/// Raw descriptor resource found on a resolution chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorResource {
    location: String,
    bytes: Vec<u8>,
}

impl DescriptorResource {
    /// Creates a resource from its location and raw content.
    #[must_use]
    pub fn new(location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            location: location.into(),
            bytes: bytes.into(),
        }
    }

    /// Returns where the resource was found.
    #[must_use]
    pub const fn location(&self) -> &str {
        self.location.as_str()
    }

    /// Returns the raw resource content.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Parsed key/value pairs in document order.
///
/// # Example
///
/// ```
/// use hangar_plugins::descriptor::{DescriptorResource, Properties};
///
/// let resource = DescriptorResource::new("inline", "a.DemoService = x, y\n# comment\n");
/// let properties = Properties::parse(&resource).expect("well formed");
/// assert_eq!(properties.get("a.DemoService"), Some("x, y"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
}

impl Properties {
    /// Parses a descriptor resource.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::DescriptorParse`] for invalid UTF-8, a line
    /// without a separator, an empty key, or a continuation at end of input.
    pub fn parse(resource: &DescriptorResource) -> Result<Self, DiscoveryError> {
        let text = std::str::from_utf8(resource.bytes()).map_err(|error| {
            let valid = resource.bytes().get(..error.valid_up_to()).unwrap_or_default();
            let line = valid.iter().filter(|byte| **byte == b'\n').count() + 1;
            DiscoveryError::descriptor(resource.location(), line, "invalid UTF-8")
        })?;
        parse_text(resource.location(), text).map(|entries| Self { entries })
    }

    /// Returns the last value recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over the pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns the number of pairs, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the resource declares nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_text(location: &str, text: &str) -> Result<Vec<(String, String)>, DiscoveryError> {
    let mut entries = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let line_number = index + 1;
        let first = raw.trim_start();
        if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
            continue;
        }

        let mut logical = String::new();
        let mut current = first;
        while let Some(head) = continued(current) {
            logical.push_str(head);
            let Some((_, next)) = lines.next() else {
                return Err(DiscoveryError::descriptor(
                    location,
                    line_number,
                    "line continuation at end of input",
                ));
            };
            current = next.trim_start();
        }
        logical.push_str(current);

        let Some((key, value)) = logical.split_once(['=', ':']) else {
            return Err(DiscoveryError::descriptor(
                location,
                line_number,
                format!("expected 'key=value', found '{}'", logical.trim()),
            ));
        };
        let trimmed_key = key.trim();
        if trimmed_key.is_empty() {
            return Err(DiscoveryError::descriptor(location, line_number, "empty key"));
        }
        entries.push((trimmed_key.to_owned(), value.trim().to_owned()));
    }

    Ok(entries)
}

/// Returns the line without its continuation backslash, if it has one.
fn continued(line: &str) -> Option<&str> {
    let trailing = line.chars().rev().take_while(|ch| *ch == '\\').count();
    if trailing % 2 == 1 {
        line.strip_suffix('\\')
    } else {
        None
    }
}

/// Builds the descriptor key for `contract_id` within `archive_name`.
///
/// ```
/// assert_eq!(
///     hangar_plugins::descriptor::descriptor_key("pluginA", "DemoService"),
///     "pluginA.DemoService"
/// );
/// ```
#[must_use]
pub fn descriptor_key(archive_name: &str, contract_id: &str) -> String {
    format!("{archive_name}.{contract_id}")
}

/// Splits a comma-delimited value into trimmed, non-empty identifiers.
pub fn split_identifiers(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|identifier| !identifier.is_empty())
}

/// Outcome of resolving a key across every resource on a chain.
#[derive(Debug, Default)]
pub struct Resolution {
    identifiers: Vec<String>,
    errors: Vec<DiscoveryError>,
}

impl Resolution {
    /// Returns the identifiers in discovery order, duplicates included.
    #[must_use]
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Returns the parse errors of resources that were skipped.
    #[must_use]
    pub fn errors(&self) -> &[DiscoveryError] {
        &self.errors
    }

    /// Splits the resolution into identifiers and errors.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<DiscoveryError>) {
        (self.identifiers, self.errors)
    }
}

/// Resolves `key` across `resources`, concatenating the declared
/// identifiers in resource order.
///
/// A resource that does not declare `key` contributes nothing. A resource
/// that fails to parse is recorded in [`Resolution::errors`] and skipped.
pub fn resolve<'a, I>(resources: I, key: &str) -> Resolution
where
    I: IntoIterator<Item = &'a DescriptorResource>,
{
    let mut resolution = Resolution::default();
    for resource in resources {
        match Properties::parse(resource) {
            Ok(properties) => {
                if let Some(value) = properties.get(key) {
                    resolution
                        .identifiers
                        .extend(split_identifiers(value).map(str::to_owned));
                }
            }
            Err(error) => {
                warn!(
                    target: DESCRIPTOR_TARGET,
                    location = resource.location(),
                    %error,
                    "skipping malformed descriptor"
                );
                resolution.errors.push(error);
            }
        }
    }
    resolution
}

#[cfg(test)]
mod tests;
