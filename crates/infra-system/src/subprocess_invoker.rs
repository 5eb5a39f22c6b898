// Subprocess invoker implementation
// reason: tokio for async process management, nix for process-group signals
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use atxp_mcp_core::application::constants::{
    DEFAULT_LAUNCHER, DEFAULT_PACKAGE, GROUP_EXIT_POLL_INTERVAL, PIPE_DRAIN_TIMEOUT,
    TERMINATE_GRACE_PERIOD,
};
use atxp_mcp_core::domain::{CommandLine, ExitState, InvocationResult, CONNECTION_ENV_VAR};
use atxp_mcp_core::port::{CredentialSource, ProcessInvoker};

const DEFAULT_SHELL: &str = "sh";
const SHELL_FLAG: &str = "-c";

type SharedBuffer = Arc<Mutex<Vec<u8>>>;

/// How the external program is started: `<shell> -c "<launcher> <package> <args>"`
///
/// Quoted values are escaped for a POSIX shell, so `shell` must be an
/// `sh`-compatible interpreter that accepts `-c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub shell: String,
    pub launcher: String,
    pub package: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            launcher: DEFAULT_LAUNCHER.to_string(),
            package: DEFAULT_PACKAGE.to_string(),
        }
    }
}

/// Subprocess invoker
/// Runs the external program once per call with a hard deadline.
/// Every failure mode ends up inside the returned `InvocationResult`.
pub struct SubprocessInvoker {
    launch: LaunchConfig,
    credentials: Arc<dyn CredentialSource>,
}

impl SubprocessInvoker {
    /// Create a new subprocess invoker
    ///
    /// # Arguments
    /// * `launch` - Shell, launcher and package used to start the program
    /// * `credentials` - Resolved fresh before every spawn
    ///
    /// # Example
    /// ```ignore
    /// let invoker = SubprocessInvoker::new(LaunchConfig::default(), Arc::new(resolver));
    /// ```
    pub fn new(launch: LaunchConfig, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            launch,
            credentials,
        }
    }

    /// Shell script for one call, e.g. `npx atxp@latest balance`
    pub fn script(&self, command: &CommandLine) -> String {
        [
            self.launch.launcher.as_str(),
            self.launch.package.as_str(),
            command.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Variables layered over the inherited environment.
    /// Empty when no credential resolves; the child then keeps whatever it inherits.
    pub fn env_overlay(&self) -> Vec<(&'static str, String)> {
        match self.credentials.resolve() {
            Some(credential) => vec![(CONNECTION_ENV_VAR, credential.expose().to_string())],
            None => Vec::new(),
        }
    }

    fn build_command(&self, script: &str, overlay: &[(&'static str, String)]) -> Command {
        let mut cmd = Command::new(&self.launch.shell);
        cmd.arg(SHELL_FLAG)
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for (key, value) in overlay {
            cmd.env(key, value);
        }

        // Own process group, so a timeout can take down npx and its node child together
        #[cfg(unix)]
        cmd.process_group(0);

        cmd
    }

    /// Spawn child process and wait for exit or deadline
    async fn spawn_and_wait(&self, script: &str, limit: Duration) -> InvocationResult {
        let start = Instant::now();
        let overlay = self.env_overlay();

        info!(
            launcher = %self.launch.launcher,
            timeout_ms = limit.as_millis() as u64,
            credential = !overlay.is_empty(),
            "Starting subprocess execution"
        );
        debug!(script = %script, "Subprocess script");

        let mut child = match self.build_command(script, &overlay).spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(shell = %self.launch.shell, error = %e, "Spawn failed");
                return InvocationResult::spawn_failed(format!(
                    "Failed to launch {}: {}",
                    self.launch.launcher, e
                ))
                .with_duration_ms(elapsed_ms(start));
            }
        };

        // No interactive input is ever sent
        drop(child.stdin.take());

        let stdout_buf: SharedBuffer = Arc::new(Mutex::new(Vec::new()));
        let stderr_buf: SharedBuffer = Arc::new(Mutex::new(Vec::new()));
        let mut stdout_task = tokio::spawn(drain(child.stdout.take(), stdout_buf.clone()));
        let mut stderr_task = tokio::spawn(drain(child.stderr.take(), stderr_buf.clone()));

        let mut crash_message = None;
        let exit = match timeout(limit, child.wait()).await {
            Ok(Ok(status)) if status.success() => ExitState::Succeeded,
            Ok(Ok(status)) => {
                crash_message = Some(match status.code() {
                    Some(code) => format!("Command failed with exit code {}", code),
                    None => "Command terminated by signal".to_string(),
                });
                ExitState::Failed {
                    code: status.code(),
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Waiting on subprocess failed");
                crash_message = Some(format!("Failed waiting for {}: {}", self.launch.launcher, e));
                self.terminate(&mut child).await;
                ExitState::SpawnFailed
            }
            Err(_) => {
                warn!(
                    timeout_ms = limit.as_millis() as u64,
                    "Subprocess timed out, terminating"
                );
                self.terminate(&mut child).await;
                ExitState::TimedOut
            }
        };

        collect_readers(&mut stdout_task, &mut stderr_task).await;

        let stdout = String::from_utf8_lossy(&stdout_buf.lock().await).into_owned();
        let stderr = String::from_utf8_lossy(&stderr_buf.lock().await).into_owned();
        let duration_ms = elapsed_ms(start);

        info!(
            duration_ms = duration_ms,
            exit = ?exit,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            "Subprocess execution completed"
        );

        InvocationResult {
            stdout,
            stderr,
            exit,
            crash_message,
            duration_ms,
        }
    }

    /// SIGTERM the process group, then SIGKILL it if any member outlives the
    /// grace period. The shell exiting is not enough: npx or node may ignore
    /// SIGTERM and keep running in the same group.
    async fn terminate(&self, child: &mut Child) {
        #[cfg(unix)]
        {
            if let Some(pid) = child.id() {
                use nix::sys::signal::{killpg, Signal};
                use nix::unistd::Pid;

                let pgid = Pid::from_raw(pid as i32);

                info!(pid = %pid, "Sending SIGTERM to process group");
                if let Err(e) = killpg(pgid, Signal::SIGTERM) {
                    debug!(pid = %pid, error = %e, "SIGTERM failed");
                }

                if wait_for_group_exit(child, pgid, TERMINATE_GRACE_PERIOD).await {
                    info!(pid = %pid, "Process group exited after SIGTERM");
                } else {
                    warn!(pid = %pid, "Process group still alive after SIGTERM, sending SIGKILL");
                    if let Err(e) = killpg(pgid, Signal::SIGKILL) {
                        debug!(pid = %pid, error = %e, "SIGKILL failed");
                    }
                }
            }
        }

        // Reaps the direct child; a no-op when it is already gone
        if let Err(e) = child.kill().await {
            debug!(error = %e, "Kill failed, process already exited");
        }
    }
}

/// Poll the group until no member is left or `grace` runs out.
/// Returns `true` once the group is empty.
#[cfg(unix)]
async fn wait_for_group_exit(child: &mut Child, pgid: nix::unistd::Pid, grace: Duration) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::killpg;

    let deadline = Instant::now() + grace;
    loop {
        // An unreaped shell still counts as a group member
        if let Err(e) = child.try_wait() {
            debug!(error = %e, "try_wait failed");
        }

        match killpg(pgid, None) {
            Err(Errno::ESRCH) => return true,
            _ if Instant::now() >= deadline => return false,
            _ => tokio::time::sleep(GROUP_EXIT_POLL_INTERVAL).await,
        }
    }
}

#[async_trait]
impl ProcessInvoker for SubprocessInvoker {
    async fn invoke(&self, command: &CommandLine, timeout: Duration) -> InvocationResult {
        let script = self.script(command);
        self.spawn_and_wait(&script, timeout).await
    }
}

/// Copy a pipe into a shared buffer until EOF, so output read before a
/// timeout is kept.
async fn drain<R>(reader: Option<R>, buf: SharedBuffer)
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return;
    };
    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => buf.lock().await.extend_from_slice(&chunk[..n]),
            Err(e) => {
                debug!(error = %e, "Pipe read failed");
                break;
            }
        }
    }
}

/// Wait briefly for both readers; a grandchild may still hold a pipe open
async fn collect_readers(stdout_task: &mut JoinHandle<()>, stderr_task: &mut JoinHandle<()>) {
    let drained = timeout(PIPE_DRAIN_TIMEOUT, async {
        let _ = (&mut *stdout_task).await;
        let _ = (&mut *stderr_task).await;
    })
    .await;

    if drained.is_err() {
        debug!("Output pipes still open after exit, keeping captured output");
        stdout_task.abort();
        stderr_task.abort();
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use atxp_mcp_core::application::normalize;
    use atxp_mcp_core::domain::Credential;
    use atxp_mcp_core::port::credential_source::mocks::StaticCredentialSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Stand-in for `npx atxp@latest`: `sh <script> <args>`
    fn fake_program(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", body).unwrap();
        file
    }

    fn invoker(program: &NamedTempFile, credential: Option<&str>) -> SubprocessInvoker {
        SubprocessInvoker::new(
            LaunchConfig {
                shell: "sh".to_string(),
                launcher: "sh".to_string(),
                package: program.path().display().to_string(),
            },
            Arc::new(StaticCredentialSource(credential.map(Credential::new))),
        )
    }

    fn line(subcommand: &str) -> CommandLine {
        CommandLine::new(subcommand)
    }

    #[test]
    fn test_script_layout() {
        let invoker = SubprocessInvoker::new(
            LaunchConfig::default(),
            Arc::new(StaticCredentialSource(None)),
        );
        assert_eq!(invoker.script(&line("balance")), "npx atxp@latest balance");
    }

    #[test]
    fn test_default_shell_is_posix() {
        let launch = LaunchConfig::default();
        assert_eq!(launch.shell, "sh");
        assert_eq!(SHELL_FLAG, "-c");
    }

    #[test]
    fn test_overlay_only_when_resolved() {
        let program = fake_program("true");
        assert!(invoker(&program, None).env_overlay().is_empty());
        assert_eq!(
            invoker(&program, Some("tok")).env_overlay(),
            vec![(CONNECTION_ENV_VAR, "tok".to_string())]
        );
    }

    #[tokio::test]
    async fn test_execute_success() {
        let program = fake_program(r#"echo "ran: $*""#);
        let result = invoker(&program, None)
            .invoke(&line("balance"), Duration::from_secs(10))
            .await;

        assert_eq!(result.exit, ExitState::Succeeded);
        assert_eq!(result.stdout.trim(), "ran: balance");
        assert_eq!(normalize(&result), "ran: balance");
    }

    #[tokio::test]
    async fn test_quoted_arguments_arrive_intact() {
        let program = fake_program(r#"printf '%s\n' "$@""#);
        let mut command = line("search");
        command.push_quoted(r#"say "hi" \ back\"slash"#);

        let result = invoker(&program, None)
            .invoke(&command, Duration::from_secs(10))
            .await;

        let args: Vec<&str> = result.stdout.lines().collect();
        assert_eq!(args, vec!["search", r#"say "hi" \ back\"slash"#]);
    }

    #[tokio::test]
    async fn test_credential_overlay_reaches_child() {
        let program = fake_program(r#"printf '%s' "$ATXP_CONNECTION""#);
        let result = invoker(&program, Some("conn-xyz"))
            .invoke(&line("whoami"), Duration::from_secs(10))
            .await;

        assert_eq!(result.stdout, "conn-xyz");
    }

    #[tokio::test]
    async fn test_non_zero_exit_keeps_stderr() {
        let program = fake_program("echo 'bad token' >&2\nexit 3");
        let result = invoker(&program, None)
            .invoke(&line("balance"), Duration::from_secs(10))
            .await;

        assert_eq!(result.exit, ExitState::Failed { code: Some(3) });
        assert_eq!(result.stderr.trim(), "bad token");
        assert_eq!(normalize(&result), "bad token");
    }

    #[tokio::test]
    async fn test_silent_failure_uses_exit_code_message() {
        let program = fake_program("exit 4");
        let result = invoker(&program, None)
            .invoke(&line("balance"), Duration::from_secs(10))
            .await;

        assert_eq!(normalize(&result), "Command failed with exit code 4");
    }

    #[tokio::test]
    async fn test_execute_timeout_keeps_partial_output() {
        let program = fake_program("echo 'Generating...'\nsleep 10\necho done");
        let result = invoker(&program, None)
            .invoke(&line("video"), Duration::from_millis(300))
            .await;

        assert_eq!(result.exit, ExitState::TimedOut);
        assert!(result.timed_out_or_crashed());
        assert_eq!(result.stdout.trim(), "Generating...");
        assert!(result.duration_ms < 5000);
    }

    #[tokio::test]
    async fn test_execute_timeout_without_output() {
        let program = fake_program("sleep 10");
        let result = invoker(&program, None)
            .invoke(&line("music"), Duration::from_millis(200))
            .await;

        assert_eq!(result.exit, ExitState::TimedOut);
        assert_eq!(normalize(&result), "Command failed");
    }

    /// A group member that ignores SIGTERM is gone once the call returns,
    /// even though the shell itself died on the first signal
    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_timeout_kills_member_ignoring_sigterm() {
        let pidfile = NamedTempFile::new().unwrap();
        let program = fake_program(
            r#"sh -c 'trap "" TERM; echo $$ > "$1"; while :; do sleep 1; done' _ "$2" &
wait"#,
        );
        let mut command = line("hold");
        command.push_quoted(&pidfile.path().display().to_string());

        let result = invoker(&program, None)
            .invoke(&command, Duration::from_millis(500))
            .await;
        assert_eq!(result.exit, ExitState::TimedOut);

        let pid = std::fs::read_to_string(pidfile.path()).unwrap();
        let pid = pid.trim();
        assert!(!pid.is_empty());

        let mut alive = is_alive(pid);
        for _ in 0..40 {
            if !alive {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
            alive = is_alive(pid);
        }
        assert!(!alive, "process {} survived the timeout", pid);
    }

    /// Missing from /proc, or a zombie waiting to be reaped
    #[cfg(target_os = "linux")]
    fn is_alive(pid: &str) -> bool {
        match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            Ok(stat) => match stat.rsplit_once(')') {
                Some((_, rest)) => !rest.trim_start().starts_with('Z'),
                None => true,
            },
            Err(_) => false,
        }
    }

    #[tokio::test]
    async fn test_missing_launcher_reported_by_shell() {
        let invoker = SubprocessInvoker::new(
            LaunchConfig {
                shell: "sh".to_string(),
                launcher: "atxp-launcher-that-does-not-exist".to_string(),
                package: "atxp@latest".to_string(),
            },
            Arc::new(StaticCredentialSource(None)),
        );
        let result = invoker.invoke(&line("balance"), Duration::from_secs(10)).await;

        assert_eq!(result.exit, ExitState::Failed { code: Some(127) });
        assert!(!normalize(&result).is_empty());
    }

    #[tokio::test]
    async fn test_spawn_failure_is_soft() {
        let invoker = SubprocessInvoker::new(
            LaunchConfig {
                shell: "/nonexistent/shell".to_string(),
                ..LaunchConfig::default()
            },
            Arc::new(StaticCredentialSource(None)),
        );
        let result = invoker.invoke(&line("balance"), Duration::from_secs(1)).await;

        assert_eq!(result.exit, ExitState::SpawnFailed);
        assert!(normalize(&result).starts_with("Failed to launch npx"));
    }
}
