// Process Invoker Port
// Abstraction for running the external program once per operation call

use crate::domain::{CommandLine, InvocationResult};
use async_trait::async_trait;
use std::time::Duration;

/// Process Invoker trait
///
/// Implementations:
/// - SubprocessInvoker (infra-system): spawns `<launcher> <package> <args>`
/// - ScriptedInvoker (mocks): returns canned results for dispatcher tests
#[async_trait]
pub trait ProcessInvoker: Send + Sync {
    /// Run `command` with a hard deadline.
    ///
    /// Never returns an error: non-zero exit, timeout and spawn failure are
    /// all reported inside the [`InvocationResult`].
    async fn invoke(&self, command: &CommandLine, timeout: Duration) -> InvocationResult;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Call captured by [`ScriptedInvoker`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        pub command: String,
        pub timeout: Duration,
    }

    /// Mock invoker returning one fixed result and recording every call
    pub struct ScriptedInvoker {
        result: InvocationResult,
        calls: Arc<Mutex<Vec<RecordedCall>>>,
    }

    impl ScriptedInvoker {
        pub fn new(result: InvocationResult) -> Self {
            Self {
                result,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success(stdout: impl Into<String>) -> Self {
            Self::new(InvocationResult::succeeded(stdout, ""))
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ProcessInvoker for ScriptedInvoker {
        async fn invoke(&self, command: &CommandLine, timeout: Duration) -> InvocationResult {
            self.calls.lock().unwrap().push(RecordedCall {
                command: command.to_string(),
                timeout,
            });
            self.result.clone()
        }
    }
}
