//! Output formats accepted by `--log-format`.

use strum::{Display, EnumString};

/// How the CLI renders discovery diagnostics on stderr.
///
/// Parsing ignores case, so `JSON` and `json` select the same format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, fields flattened.
    Json,
    /// Single line per event for terminals.
    #[default]
    Compact,
}

/// Error returned when `--log-format` names an unknown format.
pub type LogFormatParseError = strum::ParseError;
