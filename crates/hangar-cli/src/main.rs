//! CLI entrypoint for hangar plugin discovery.
//!
//! The binary delegates to [`hangar_cli::run`], which loads configuration,
//! scans the plugin directory, and reports every discovered demo service.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    hangar_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
