//! Invocation outcome

use crate::catalog::{CommandGroup, Operation, Value};
use crate::error::InvocationError;
use std::fmt;
use std::sync::Arc;

/// What an invocation ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStatus {
    Invoked,
    Faulted,
    NoMethodSpecified,
    NoMethodFound,
    Help,
    Complete,
    CompletionScript,
    ArgumentMissing,
    ArgumentInvalid,
    ConversionFailed,
    FileExists,
}

impl InvocationStatus {
    /// Process exit code for this status, `None` when the run succeeded
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            InvocationStatus::Invoked
            | InvocationStatus::Help
            | InvocationStatus::Complete
            | InvocationStatus::CompletionScript => None,
            InvocationStatus::Faulted => Some(2),
            _ => Some(1),
        }
    }
}

impl fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvocationStatus::Invoked => "invoked",
            InvocationStatus::Faulted => "faulted",
            InvocationStatus::NoMethodSpecified => "no method specified",
            InvocationStatus::NoMethodFound => "no method found",
            InvocationStatus::Help => "help",
            InvocationStatus::Complete => "complete",
            InvocationStatus::CompletionScript => "completion script",
            InvocationStatus::ArgumentMissing => "argument missing",
            InvocationStatus::ArgumentInvalid => "argument invalid",
            InvocationStatus::ConversionFailed => "conversion failed",
            InvocationStatus::FileExists => "file exists",
        };
        f.write_str(s)
    }
}

/// Structured result of one run
#[derive(Debug)]
pub struct InvocationResult {
    pub status: InvocationStatus,
    /// Value returned by the operation, with deferred values already resolved
    pub value: Option<Value>,
    pub group: Option<Arc<CommandGroup>>,
    pub operation: Option<Arc<Operation>>,
    pub error: Option<InvocationError>,
}

impl InvocationResult {
    pub fn new(status: InvocationStatus) -> Self {
        InvocationResult {
            status,
            value: None,
            group: None,
            operation: None,
            error: None,
        }
    }

    pub fn failed(status: InvocationStatus, error: InvocationError) -> Self {
        InvocationResult::new(status).with_error(error)
    }

    pub fn with_error(mut self, error: InvocationError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_operation(mut self, group: Arc<CommandGroup>, operation: Arc<Operation>) -> Self {
        self.group = Some(group);
        self.operation = Some(operation);
        self
    }

    pub fn with_value(mut self, value: Option<Value>) -> Self {
        self.value = value;
        self
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.status.exit_code()
    }

    pub fn is_success(&self) -> bool {
        self.exit_code().is_none()
    }

    /// Fully qualified name of the resolved operation
    pub fn operation_name(&self) -> Option<String> {
        match (&self.group, &self.operation) {
            (Some(group), Some(op)) => Some(format!("{}.{}", group.identity, op.name)),
            _ => None,
        }
    }
}
