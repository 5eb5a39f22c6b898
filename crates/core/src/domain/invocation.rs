// Invocation Domain Model
//
// Raw outcome of one external-program execution, and its tagged reading.

/// Text returned when neither output stream nor a crash message has content
pub const FALLBACK_MESSAGE: &str = "Command failed";

/// How the child process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitState {
    /// Exit status zero
    Succeeded,
    /// Non-zero exit (or killed by a signal, `code` is then `None`)
    Failed { code: Option<i32> },
    /// Deadline reached; the child was terminated
    TimedOut,
    /// The launcher could not be started, or waiting on it failed
    SpawnFailed,
}

/// Result of one invocation, produced by a `ProcessInvoker` and consumed
/// once by the output normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    pub stdout: String,
    pub stderr: String,
    pub exit: ExitState,
    pub crash_message: Option<String>,
    pub duration_ms: u64,
}

impl InvocationResult {
    pub fn succeeded(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit: ExitState::Succeeded,
            crash_message: None,
            duration_ms: 0,
        }
    }

    pub fn failed(code: Option<i32>, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit: ExitState::Failed { code },
            crash_message: None,
            duration_ms: 0,
        }
    }

    pub fn timed_out(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit: ExitState::TimedOut,
            crash_message: None,
            duration_ms: 0,
        }
    }

    pub fn spawn_failed(message: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            exit: ExitState::SpawnFailed,
            crash_message: Some(message.into()),
            duration_ms: 0,
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn exit_succeeded(&self) -> bool {
        self.exit == ExitState::Succeeded
    }

    pub fn timed_out_or_crashed(&self) -> bool {
        matches!(self.exit, ExitState::TimedOut | ExitState::SpawnFailed)
    }
}

/// Tagged reading of an [`InvocationResult`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// Zero exit with non-empty output
    Success(String),
    /// Failure, but the child printed something
    FailureWithOutput(String),
    /// Nothing printed; optional crash/timeout description
    FailureNoOutput(Option<String>),
}

impl InvocationOutcome {
    /// Response text; never empty
    pub fn into_text(self) -> String {
        match self {
            InvocationOutcome::Success(text) | InvocationOutcome::FailureWithOutput(text) => text,
            InvocationOutcome::FailureNoOutput(Some(message)) if !message.trim().is_empty() => {
                message.trim().to_string()
            }
            InvocationOutcome::FailureNoOutput(_) => FALLBACK_MESSAGE.to_string(),
        }
    }
}
