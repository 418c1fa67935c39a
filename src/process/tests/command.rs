//! Tests for `LaunchCommand` construction and the capturing runner.

use super::super::*;
use rstest::rstest;
use std::ffi::OsString;

#[rstest]
fn with_credentials_wraps_in_sshpass() {
    let command = LaunchCommand::new("rsync")
        .args(["-a", "src/", "host:dst"])
        .with_credentials("sshpass", Some(&Credentials::password("hunter2")));

    assert_eq!(command.program, "sshpass");
    assert_eq!(command.command_string(), "sshpass -e rsync -a src/ host:dst");
    assert_eq!(
        command.env,
        vec![(String::from(SSHPASS_ENV), String::from("hunter2"))]
    );
}

#[rstest]
fn with_credentials_without_password_is_identity() {
    let command = LaunchCommand::new("rsync").arg("-a");
    let wrapped = command.clone().with_credentials("sshpass", None);
    assert_eq!(wrapped, command);
}

#[rstest]
fn debug_output_redacts_environment_values() {
    let command = LaunchCommand::new("sshpass").env(SSHPASS_ENV, "hunter2");
    let rendered = format!("{command:?}");
    assert!(rendered.contains(SSHPASS_ENV), "rendered: {rendered}");
    assert!(!rendered.contains("hunter2"), "rendered: {rendered}");

    let creds = format!("{:?}", Credentials::password("hunter2"));
    assert!(!creds.contains("hunter2"), "rendered: {creds}");
}

#[rstest]
#[case(Some(0), true, "0")]
#[case(Some(23), false, "23")]
#[case(None, false, "unknown")]
fn command_output_reports_status(
    #[case] code: Option<i32>,
    #[case] success: bool,
    #[case] status_text: &str,
) {
    let output = CommandOutput {
        code,
        stdout: String::new(),
        stderr: String::new(),
    };
    assert_eq!(output.is_success(), success);
    assert_eq!(output.status_text(), status_text);
}

#[rstest]
fn process_runner_passes_extra_environment() {
    let command = LaunchCommand::new("sh")
        .args([OsString::from("-c"), OsString::from("printf %s \"$LAUNCHER_PROBE\"")])
        .env("LAUNCHER_PROBE", "visible");
    let output = ProcessCommandRunner
        .run(&command)
        .expect("command should execute successfully");

    assert_eq!(output.code, Some(0));
    assert_eq!(output.stdout, "visible");
}

#[rstest]
fn process_runner_failed_spawn_returns_spawn_error() {
    let result = ProcessCommandRunner.run(&LaunchCommand::new("definitely-not-a-real-binary-xyz"));

    match result {
        Err(RunnerError::Spawn { program, .. }) => {
            assert_eq!(program, "definitely-not-a-real-binary-xyz");
        }
        other => panic!("expected RunnerError::Spawn, got {other:?}"),
    }
}
