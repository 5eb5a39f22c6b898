// Adapter constants (no magic values)
use std::time::Duration;

/// Timeout for read-only and free lookups (30s)
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for registration and single-asset generation (60s)
pub const EXTENDED_OPERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for long-running media generation (120s)
pub const LONG_OPERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Grace period between SIGTERM and SIGKILL after a timeout (2s)
pub const TERMINATE_GRACE_PERIOD: Duration = Duration::from_secs(2);

/// How often the process group is checked during the grace period (50ms)
pub const GROUP_EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long to keep draining pipes after the child is gone (500ms)
/// Grandchildren (npx -> node) may hold them open past the kill.
pub const PIPE_DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Default launcher for the external program
pub const DEFAULT_LAUNCHER: &str = "npx";

/// Default package specifier passed to the launcher
pub const DEFAULT_PACKAGE: &str = "atxp@latest";

/// Credential file, relative to the user's home directory
pub const DEFAULT_CONFIG_PATH: &str = "~/.atxp/config";
