// Output Normalizer
//
// Precedence: trimmed stdout, trimmed stderr, crash message, "Command failed".

use crate::domain::{InvocationOutcome, InvocationResult};

/// Tag a raw result. A zero exit with no output at all has nothing to show
/// and reads as `FailureNoOutput`.
pub fn classify(result: &InvocationResult) -> InvocationOutcome {
    let stdout = result.stdout.trim();
    let stderr = result.stderr.trim();

    let text = if !stdout.is_empty() {
        Some(stdout)
    } else if !stderr.is_empty() {
        Some(stderr)
    } else {
        None
    };

    match (result.exit_succeeded(), text) {
        (true, Some(text)) => InvocationOutcome::Success(text.to_string()),
        (false, Some(text)) => InvocationOutcome::FailureWithOutput(text.to_string()),
        (_, None) => InvocationOutcome::FailureNoOutput(result.crash_message.clone()),
    }
}

/// Reduce a result to the single, never-empty response text
pub fn normalize(result: &InvocationResult) -> String {
    classify(result).into_text()
}
