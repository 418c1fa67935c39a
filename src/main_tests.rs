//! Unit tests for the `rsync-launcher` CLI binary implementation.
//!
//! Keeping these tests in a separate module helps keep `src/main.rs` focused
//! on dispatch.

use super::*;
use rsync_launcher::test_support::{ScriptedRunner, launcher_config};
use rsync_launcher::{EntryKind, Side};
use rstest::rstest;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("rsync-launcher").chain(args.iter().copied()))
        .expect("arguments should parse")
}

fn preview_job(args: &[&str]) -> SyncJob {
    let mut full = vec!["preview"];
    full.extend_from_slice(args);
    match parse(&full) {
        Cli::Preview(command) => job_from_args(&command.job),
        other => panic!("expected preview, got {other:?}"),
    }
}

#[rstest]
fn job_flags_map_onto_options() {
    let job = preview_job(&[
        "-a",
        "-v",
        "-h",
        "--progress",
        "--dry-run",
        "--delete",
        "--contents",
        "/src",
        "/dst",
    ]);
    assert_eq!(
        job.options.flags(),
        ["-a", "-v", "--progress", "--dry-run", "--delete", "-h"]
    );
    assert!(job.options.copy_contents);
    assert_eq!(job.source.location(), "/src");
    assert_eq!(job.target.location(), "/dst");
}

#[rstest]
fn remote_flags_apply_to_their_side() {
    let job = preview_job(&[
        "/data",
        "bob@backup:/srv",
        "--target-identity",
        "/keys/backup",
        "--target-port",
        "2222",
        "--source-identity",
        "/keys/ignored",
    ]);
    assert_eq!(job.target.identity(), Some("/keys/backup"));
    assert_eq!(job.target.port, Some(2222));
    assert_eq!(job.source.identity(), None);
}

#[rstest]
fn help_is_long_only_where_h_means_human_readable() {
    let err = Cli::try_parse_from(["rsync-launcher", "preview", "--help"])
        .expect_err("--help exits through clap");
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[rstest]
#[case(ModeArg::Direct, LaunchMode::Direct)]
#[case(ModeArg::Shell, LaunchMode::Shell)]
#[case(ModeArg::Applescript, LaunchMode::AppleScript)]
#[case(ModeArg::Terminal, LaunchMode::Terminal)]
fn explicit_mode_wins_over_config(#[case] arg: ModeArg, #[case] expected: LaunchMode) {
    let config = LauncherConfig {
        launch_mode: String::from("terminal"),
        ..launcher_config()
    };
    assert_eq!(resolve_mode(&config, Some(arg)).expect("mode"), expected);
}

#[rstest]
fn configured_mode_is_the_fallback() {
    let config = LauncherConfig {
        launch_mode: String::from("shell"),
        ..launcher_config()
    };
    assert_eq!(resolve_mode(&config, None).expect("mode"), LaunchMode::Shell);

    let broken = LauncherConfig {
        launch_mode: String::from("pty"),
        ..launcher_config()
    };
    assert!(matches!(
        resolve_mode(&broken, None),
        Err(CliError::Config(_))
    ));
}

#[rstest]
fn launch_returns_child_exit_code() {
    let runner = ScriptedRunner::new();
    runner.push_failure(23);
    let launcher = Launcher::new(launcher_config(), runner.clone()).expect("launcher");
    let job = preview_job(&["/src", "/dst"]);

    let code = launch(&launcher, &job, LaunchMode::Direct, false).expect("launch");

    assert_eq!(code, 23);
    assert_eq!(runner.invocations().len(), 1);
}

#[rstest]
fn launch_rejects_password_for_osascript_modes_before_prompting() {
    let runner = ScriptedRunner::new();
    let launcher = Launcher::new(launcher_config(), runner.clone()).expect("launcher");
    let job = preview_job(&["/src", "/dst"]);

    let err = launch(&launcher, &job, LaunchMode::AppleScript, true).expect_err("unsupported");

    assert!(matches!(
        err,
        CliError::Launch(LaunchError::PasswordUnsupported {
            mode: LaunchMode::AppleScript
        })
    ));
    assert!(runner.invocations().is_empty());
}

#[rstest]
fn launch_validates_job_first() {
    let launcher = Launcher::new(launcher_config(), ScriptedRunner::new()).expect("launcher");
    let job = preview_job(&["", "/dst"]);

    let err = launch(&launcher, &job, LaunchMode::Direct, false).expect_err("blank source");

    assert!(matches!(
        err,
        CliError::Job(JobError::MissingField {
            side: Side::Source,
            ..
        })
    ));
}

#[rstest]
fn launch_reports_missing_exit_code() {
    let runner = ScriptedRunner::new();
    runner.push_missing_exit_code();
    let launcher = Launcher::new(launcher_config(), runner).expect("launcher");
    let job = preview_job(&["/src", "/dst"]);

    let err = launch(&launcher, &job, LaunchMode::Direct, false).expect_err("no status");

    assert!(matches!(err, CliError::MissingExitCode));
}

#[rstest]
fn format_entry_marks_directories_and_links() {
    let dir = RemoteEntry {
        name: String::from("backups"),
        kind: EntryKind::Directory,
        size: 4096,
        permissions: String::from("drwxr-xr-x"),
        modified: String::from("Feb 28 09:15"),
        link_target: None,
    };
    let link = RemoteEntry {
        name: String::from("latest"),
        kind: EntryKind::Symlink,
        link_target: Some(String::from("backups/day1")),
        ..dir.clone()
    };

    assert!(format_entry(&dir).ends_with(" backups/"));
    assert!(format_entry(&link).ends_with(" latest -> backups/day1"));
}

#[rstest]
#[case("5b0f8c7e-6a0e-4f35-9d0b-6a4b0d2b8a11", "5b0f8c7e")]
#[case("short", "short")]
fn short_id_truncates_uuids(#[case] id: &str, #[case] expected: &str) {
    assert_eq!(short_id(id), expected);
}

#[rstest]
fn write_error_prefixes_message() {
    let mut buf = Vec::new();
    write_error(&mut buf, &CliError::MissingExitCode);
    let rendered = String::from_utf8(buf).expect("utf8");
    assert_eq!(rendered, "error: rsync terminated without an exit status\n");
}

struct StoredBookmark {
    _dir: tempfile::TempDir,
    store: BookmarkStore,
    bookmark: Bookmark,
}

fn stored_bookmark(source: &str) -> StoredBookmark {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = camino::Utf8PathBuf::from_path_buf(dir.path().join("bookmarks.json"))
        .expect("utf8 temp path");
    let mut store = BookmarkStore::load(path).expect("empty store");
    let mut bookmark = Bookmark::from_job("nightly", &preview_job(&[source, "/dst"]), "rsync");
    bookmark.last_used = chrono::Utc::now() - chrono::Duration::days(1);
    store.add(bookmark.clone()).expect("add");
    StoredBookmark {
        _dir: dir,
        store,
        bookmark,
    }
}

fn last_used_on_disk(stored: &StoredBookmark) -> i64 {
    BookmarkStore::load(stored.store.path().to_path_buf())
        .expect("reload")
        .find("nightly")
        .expect("bookmark")
        .last_used
        .timestamp_micros()
}

#[rstest]
fn claim_bookmark_touches_launchable_jobs() {
    let mut stored = stored_bookmark("/src");

    let job = claim_bookmark(&mut stored.store, "nightly", LaunchMode::Direct, false)
        .expect("launchable");

    assert_eq!(job, stored.bookmark.job());
    assert!(last_used_on_disk(&stored) > stored.bookmark.last_used.timestamp_micros());
}

#[rstest]
#[case("", LaunchMode::Direct, false)]
#[case("/src", LaunchMode::Terminal, true)]
fn claim_bookmark_leaves_unlaunchable_jobs_untouched(
    #[case] source: &str,
    #[case] mode: LaunchMode,
    #[case] ask_password: bool,
) {
    let mut stored = stored_bookmark(source);

    let result = claim_bookmark(&mut stored.store, "nightly", mode, ask_password);

    assert!(matches!(
        result,
        Err(CliError::Job(_) | CliError::Launch(LaunchError::PasswordUnsupported { .. }))
    ));
    assert_eq!(
        last_used_on_disk(&stored),
        stored.bookmark.last_used.timestamp_micros()
    );
}

#[rstest]
fn claim_bookmark_reports_unknown_keys() {
    let mut stored = stored_bookmark("/src");

    let result = claim_bookmark(&mut stored.store, "weekly", LaunchMode::Direct, false);

    assert!(matches!(
        result,
        Err(CliError::Bookmark(BookmarkError::NotFound { .. }))
    ));
}
