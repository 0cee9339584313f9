//! Progress notification ports
//!
//! Implementations live in the presentation layer.

use gitsmith_domain::{ProvisionRecord, ToolCall, ToolResult};

/// Callbacks during one chat turn
pub trait ChatProgressNotifier: Send + Sync {
    /// A request to the model is about to be sent
    fn on_model_request(&self) {}

    fn on_model_response(&self) {}

    fn on_tool_start(&self, _call: &ToolCall) {}

    fn on_tool_complete(&self, _result: &ToolResult) {}
}

pub struct NoChatProgress;

impl ChatProgressNotifier for NoChatProgress {}

/// Callbacks during a bootstrap run
pub trait BootstrapProgressNotifier: Send + Sync {
    fn on_step_start(&self, step: &str);

    fn on_record(&self, record: &ProvisionRecord);

    fn on_step_complete(&self, step: &str);
}

pub struct NoBootstrapProgress;

impl BootstrapProgressNotifier for NoBootstrapProgress {
    fn on_step_start(&self, _step: &str) {}
    fn on_record(&self, _record: &ProvisionRecord) {}
    fn on_step_complete(&self, _step: &str) {}
}
