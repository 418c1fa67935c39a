//! Unit tests for the launch module.

use super::*;
use crate::job::{EndpointConfig, SyncOptions};
use crate::process::SSHPASS_ENV;
use crate::test_support::{ScriptedRunner, launcher_config};
use rstest::{fixture, rstest};

const LINE: &str = "rsync -a -v /home/me/photos 'alice@nas.local:/volume1/backup'";

#[fixture]
fn job() -> SyncJob {
    SyncJob::new(
        EndpointConfig::local("/home/me/photos"),
        EndpointConfig::remote("alice", "nas.local", "/volume1/backup"),
        SyncOptions {
            archive: true,
            verbose: true,
            ..SyncOptions::default()
        },
    )
}

#[fixture]
fn launcher() -> Launcher<ScriptedRunner> {
    Launcher::new(launcher_config(), ScriptedRunner::new()).expect("config should validate")
}

fn args_of(command: &LaunchCommand) -> Vec<String> {
    command
        .args
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

#[rstest]
fn new_rejects_invalid_config() {
    let config = LauncherConfig {
        rsync_bin: String::from(" "),
        ..launcher_config()
    };
    let err = Launcher::new(config, ScriptedRunner::new()).expect_err("blank rsync_bin");
    assert!(matches!(err, LaunchError::Config(ConfigError::MissingField(_))));
}

#[rstest]
fn preview_matches_rendered_shell_line(launcher: Launcher<ScriptedRunner>, job: SyncJob) {
    assert_eq!(launcher.preview(&job), LINE);
}

#[rstest]
fn direct_mode_spawns_rsync_with_argument_vector(launcher: Launcher<ScriptedRunner>, job: SyncJob) {
    let command = launcher
        .build_launch_command(&job, LaunchMode::Direct, None)
        .expect("direct command");
    assert_eq!(command.program, "rsync");
    assert_eq!(
        args_of(&command),
        ["-a", "-v", "/home/me/photos", "alice@nas.local:/volume1/backup"]
    );
}

#[rstest]
fn shell_mode_runs_preview_line(launcher: Launcher<ScriptedRunner>, job: SyncJob) {
    let command = launcher
        .build_launch_command(&job, LaunchMode::Shell, None)
        .expect("shell command");
    assert_eq!(command.program, "sh");
    assert_eq!(args_of(&command), ["-c", LINE]);
}

#[rstest]
fn applescript_mode_wraps_line_in_do_shell_script(
    launcher: Launcher<ScriptedRunner>,
    job: SyncJob,
) {
    let command = launcher
        .build_launch_command(&job, LaunchMode::AppleScript, None)
        .expect("applescript command");
    let script = format!("do shell script \"{LINE}\"");
    assert_eq!(command.program, "osascript");
    assert_eq!(args_of(&command), ["-e", script.as_str()]);
}

#[rstest]
fn terminal_mode_tells_terminal_to_run_line(launcher: Launcher<ScriptedRunner>, job: SyncJob) {
    let command = launcher
        .build_launch_command(&job, LaunchMode::Terminal, None)
        .expect("terminal command");
    let script = format!("do script \"{LINE}\"");
    assert_eq!(command.program, "osascript");
    assert_eq!(
        args_of(&command),
        [
            "-e",
            "tell application \"Terminal\"",
            "-e",
            "activate",
            "-e",
            script.as_str(),
            "-e",
            "end tell",
        ]
    );
}

#[rstest]
#[case("plain", "\"plain\"")]
#[case("say \"hi\"", "\"say \\\"hi\\\"\"")]
#[case("back\\slash", "\"back\\\\slash\"")]
fn applescript_quote_escapes_quotes_and_backslashes(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(applescript_quote(text), expected);
}

#[rstest]
#[case(LaunchMode::Direct, "rsync")]
#[case(LaunchMode::Shell, "sh")]
fn password_is_injected_through_sshpass(
    launcher: Launcher<ScriptedRunner>,
    job: SyncJob,
    #[case] mode: LaunchMode,
    #[case] wrapped_program: &str,
) {
    let credentials = Credentials::password("s3cret");
    let command = launcher
        .build_launch_command(&job, mode, Some(&credentials))
        .expect("password command");
    assert_eq!(command.program, "sshpass");
    let args = args_of(&command);
    assert_eq!(args.first().map(String::as_str), Some("-e"));
    assert_eq!(args.get(1).map(String::as_str), Some(wrapped_program));
    assert!(!args.iter().any(|arg| arg.contains("s3cret")));
    assert_eq!(
        command.env,
        vec![(String::from(SSHPASS_ENV), String::from("s3cret"))]
    );
}

#[rstest]
#[case(LaunchMode::AppleScript)]
#[case(LaunchMode::Terminal)]
fn password_is_rejected_for_osascript_modes(
    launcher: Launcher<ScriptedRunner>,
    job: SyncJob,
    #[case] mode: LaunchMode,
) {
    let credentials = Credentials::password("s3cret");
    let err = launcher
        .build_launch_command(&job, mode, Some(&credentials))
        .expect_err("password should be rejected");
    assert_eq!(err, LaunchError::PasswordUnsupported { mode });
}

#[rstest]
fn launch_reports_success(job: SyncJob) {
    let runner = ScriptedRunner::new();
    runner.push_output(Some(0), "sent 10 bytes", "");
    let launcher = Launcher::new(launcher_config(), runner.clone()).expect("launcher");

    let report = launcher
        .launch(&job, LaunchMode::Direct, None)
        .expect("launch should succeed");

    assert!(report.is_success());
    assert_eq!(report.command_line, LINE);
    assert_eq!(report.mode, LaunchMode::Direct);
    assert_eq!(report.output.stdout, "sent 10 bytes");
    assert_eq!(runner.invocations().len(), 1);
}

#[rstest]
fn launch_reports_non_zero_exit_without_error(job: SyncJob) {
    let runner = ScriptedRunner::new();
    runner.push_failure(23);
    let launcher = Launcher::new(launcher_config(), runner).expect("launcher");

    let report = launcher
        .launch(&job, LaunchMode::Shell, None)
        .expect("non-zero exit is still a report");

    assert!(!report.is_success());
    assert_eq!(report.output.code, Some(23));
    assert_eq!(report.output.stderr, "simulated failure");
}

#[rstest]
fn launch_rejects_incomplete_job_before_spawning(mut job: SyncJob) {
    job.target.host.clear();
    let runner = ScriptedRunner::new();
    let launcher = Launcher::new(launcher_config(), runner.clone()).expect("launcher");

    let err = launcher
        .launch(&job, LaunchMode::Direct, None)
        .expect_err("blank host should fail");

    assert!(matches!(err, LaunchError::Job(JobError::MissingField { .. })));
    assert!(runner.invocations().is_empty());
}

#[rstest]
fn launch_surfaces_spawn_failures(launcher: Launcher<ScriptedRunner>, job: SyncJob) {
    let err = launcher
        .launch(&job, LaunchMode::Direct, None)
        .expect_err("no scripted response");
    assert!(matches!(err, LaunchError::Runner(RunnerError::Spawn { .. })));
}

#[rstest]
#[case("direct", LaunchMode::Direct)]
#[case("Shell", LaunchMode::Shell)]
#[case("APPLESCRIPT", LaunchMode::AppleScript)]
#[case(" terminal ", LaunchMode::Terminal)]
fn launch_mode_parses_names(#[case] name: &str, #[case] expected: LaunchMode) {
    let parsed: LaunchMode = name.parse().expect("known mode");
    assert_eq!(parsed, expected);
    assert_eq!(parsed.to_string(), name.trim().to_ascii_lowercase());
}

#[rstest]
fn launch_mode_rejects_unknown_names() {
    let err = "pty".parse::<LaunchMode>().expect_err("unknown mode");
    assert_eq!(err, UnknownLaunchMode(String::from("pty")));
    assert_eq!(err.to_string(), "unknown launch mode 'pty'");
    let as_error: &dyn std::error::Error = &err;
    assert!(as_error.source().is_none());
}

#[rstest]
fn only_terminal_mode_detaches_output() {
    assert!(LaunchMode::Direct.captures_output());
    assert!(LaunchMode::AppleScript.captures_output());
    assert!(!LaunchMode::Terminal.captures_output());
}
