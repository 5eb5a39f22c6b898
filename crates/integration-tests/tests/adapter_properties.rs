//! Adapter behaviour across crates: resolver -> builder -> invoker -> normalizer
//!
//! Runs the real subprocess invoker against small shell scripts standing in
//! for `npx atxp@latest`.

#![cfg(unix)]

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use atxp_mcp_core::application::{build_command, normalize, validate, Catalog, Dispatcher};
use atxp_mcp_core::domain::{ExitState, CONNECTION_ENV_VAR};
use atxp_mcp_core::port::config_reader::mocks::RecordingConfigReader;
use atxp_mcp_core::port::environment::mocks::MapEnvironment;
use atxp_mcp_core::port::{CredentialSource, FsConfigReader, ProcessInvoker};
use atxp_mcp_infra_system::{ConnectionResolver, LaunchConfig, SubprocessInvoker};
use serde_json::json;
use tempfile::NamedTempFile;

fn script(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", body).unwrap();
    file
}

fn launch(program: &NamedTempFile) -> LaunchConfig {
    LaunchConfig {
        launcher: "sh".to_string(),
        package: program.path().display().to_string(),
        ..LaunchConfig::default()
    }
}

fn resolver_with_file(env: MapEnvironment, contents: &str) -> (ConnectionResolver, NamedTempFile) {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    let resolver = ConnectionResolver::new(
        Arc::new(env),
        Arc::new(FsConfigReader),
        file.path().to_path_buf(),
    );
    (resolver, file)
}

/// Quoted values survive the shell as single arguments, whatever quotes they carry
#[tokio::test]
async fn test_hostile_quotes_stay_one_argument() {
    let catalog = Catalog::standard().unwrap();
    let op = catalog.get("atxp_email_send").unwrap();
    let subject = r#"He said "stop" \" and left"#;
    let params = validate(
        op,
        &json!({ "to": "a@b.c", "subject": subject, "body": "x\"; echo pwned; \"" }),
    )
    .unwrap();
    let command = build_command(op, &params);

    let program = script(r#"printf '%s\n' "$@""#);
    let invoker = SubprocessInvoker::new(
        launch(&program),
        Arc::new(ConnectionResolver::new(
            Arc::new(MapEnvironment::new()),
            Arc::new(RecordingConfigReader::missing()),
            "/nonexistent",
        )),
    );
    let result = invoker.invoke(&command, Duration::from_secs(10)).await;

    let argv: Vec<&str> = result.stdout.lines().collect();
    assert_eq!(
        argv,
        vec![
            "email",
            "send",
            "--to",
            "a@b.c",
            "--subject",
            subject,
            "--body",
            "x\"; echo pwned; \"",
        ]
    );
}

/// Environment credential wins and the config file is never opened
#[test]
fn test_env_credential_skips_file() {
    let reader = Arc::new(RecordingConfigReader::with_contents("ATXP_CONNECTION=file\n"));
    let resolver = ConnectionResolver::new(
        Arc::new(MapEnvironment::new().with(CONNECTION_ENV_VAR, "env-token")),
        reader.clone(),
        "/home/agent/.atxp/config",
    );

    for _ in 0..3 {
        assert_eq!(resolver.resolve().unwrap().expose(), "env-token");
    }
    assert_eq!(reader.read_count(), 0);
}

#[test]
fn test_quoted_file_credential() {
    let (resolver, _file) =
        resolver_with_file(MapEnvironment::new(), "ATXP_CONNECTION=\"abc123\"\n");
    assert_eq!(resolver.resolve().unwrap().expose(), "abc123");
}

/// No credential anywhere: the child sees only what the adapter itself inherited
#[tokio::test]
async fn test_absent_credential_adds_no_override() {
    let (resolver, _file) = resolver_with_file(MapEnvironment::new(), "OTHER=1\n");
    assert!(resolver.resolve().is_none());

    let program = script(r#"printf '%s' "${ATXP_CONNECTION-unset}""#);
    let invoker = SubprocessInvoker::new(launch(&program), Arc::new(resolver));
    assert!(invoker.env_overlay().is_empty());

    let result = invoker
        .invoke(&build_command_for("atxp_whoami", json!({})), Duration::from_secs(10))
        .await;
    let inherited = std::env::var(CONNECTION_ENV_VAR).unwrap_or_else(|_| "unset".to_string());
    assert_eq!(result.stdout, inherited);
}

#[tokio::test]
async fn test_file_credential_reaches_child() {
    let (resolver, _file) =
        resolver_with_file(MapEnvironment::new(), "ATXP_CONNECTION='tok-file'\n");
    let program = script(r#"printf '%s' "$ATXP_CONNECTION""#);
    let invoker = SubprocessInvoker::new(launch(&program), Arc::new(resolver));

    let result = invoker
        .invoke(&build_command_for("atxp_balance", json!({})), Duration::from_secs(10))
        .await;
    assert_eq!(result.stdout, "tok-file");
}

#[tokio::test]
async fn test_success_output_normalized() {
    let program = script("echo OK");
    let result = plain_invoker(&program)
        .invoke(&build_command_for("atxp_balance", json!({})), Duration::from_secs(10))
        .await;

    assert_eq!(result.exit, ExitState::Succeeded);
    assert_eq!(normalize(&result), "OK");
}

#[tokio::test]
async fn test_failure_stderr_normalized() {
    let program = script("echo 'bad token' >&2\nexit 1");
    let result = plain_invoker(&program)
        .invoke(&build_command_for("atxp_balance", json!({})), Duration::from_secs(10))
        .await;

    assert_eq!(result.exit, ExitState::Failed { code: Some(1) });
    assert_eq!(normalize(&result), "bad token");
}

#[tokio::test]
async fn test_silent_timeout_falls_back() {
    let program = script("sleep 10");
    let result = plain_invoker(&program)
        .invoke(
            &build_command_for("atxp_video", json!({ "prompt": "waves" })),
            Duration::from_millis(300),
        )
        .await;

    assert_eq!(result.exit, ExitState::TimedOut);
    assert_eq!(normalize(&result), "Command failed");
}

/// Omitted list: no flag. Two values: two flags, in order, as separate argv entries.
#[tokio::test]
async fn test_repeated_flags_in_order() {
    assert_eq!(
        build_command_for("atxp_contacts_add", json!({ "name": "Ada" })).as_str(),
        r#"contacts add --name "Ada""#
    );

    let command = build_command_for(
        "atxp_contacts_add",
        json!({ "name": "Ada", "phone": ["+1 555", "+44 20"] }),
    );
    assert_eq!(command.as_str().matches("--phone").count(), 2);
    assert!(!command.as_str().contains("--email"));

    let program = script(r#"printf '%s\n' "$@""#);
    let result = plain_invoker(&program)
        .invoke(&command, Duration::from_secs(10))
        .await;
    let argv: Vec<&str> = result.stdout.lines().collect();
    assert_eq!(
        argv,
        vec!["contacts", "add", "--name", "Ada", "--phone", "+1 555", "--phone", "+44 20"]
    );
}

/// Whole pipeline through the dispatcher with the real invoker
#[tokio::test]
async fn test_dispatcher_with_real_invoker() {
    let program = script(
        r#"case "$1" in
  search) echo "results for: $2" ;;
  *) echo "unexpected $1" >&2; exit 2 ;;
esac"#,
    );
    let dispatcher = Dispatcher::new(
        Arc::new(Catalog::standard().unwrap()),
        Arc::new(plain_invoker(&program)),
    );

    let text = dispatcher
        .dispatch("atxp_search", &json!({ "query": "rust \"async\"" }))
        .await
        .unwrap();
    assert_eq!(text, "results for: rust \"async\"");

    let text = dispatcher
        .dispatch("atxp_balance", &json!({}))
        .await
        .unwrap();
    assert_eq!(text, "unexpected balance");
}

fn plain_invoker(program: &NamedTempFile) -> SubprocessInvoker {
    SubprocessInvoker::new(
        launch(program),
        Arc::new(ConnectionResolver::new(
            Arc::new(MapEnvironment::new().with(CONNECTION_ENV_VAR, "test-token")),
            Arc::new(RecordingConfigReader::missing()),
            "/nonexistent",
        )),
    )
}

fn build_command_for(
    name: &str,
    arguments: serde_json::Value,
) -> atxp_mcp_core::domain::CommandLine {
    let catalog = Catalog::standard().unwrap();
    let op = catalog.get(name).unwrap();
    build_command(op, &validate(op, &arguments).unwrap())
}
