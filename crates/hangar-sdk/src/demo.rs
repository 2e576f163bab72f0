//! Reference capability used by the bundled demo plugin and the CLI.

use crate::contract::CapabilityContract;

/// Demonstration service: reacts to a message.
pub trait DemoService {
    /// Handles `message` and returns what the implementation reports.
    fn demo_test(&self, message: &str) -> String;
}

/// Contract marker for [`DemoService`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoContract;

impl CapabilityContract for DemoContract {
    const ID: &'static str = "DemoService";
    type Service = dyn DemoService;
}
