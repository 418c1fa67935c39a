//! Binary entry point for the rsync launcher CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use rsync_launcher::{
    Bookmark, BookmarkError, BookmarkStore, CommandRunner, ConfigError, Credentials,
    EndpointConfig, JobError, LaunchError, LaunchMode, Launcher, LauncherConfig, ListError,
    RemoteEntry, RemoteHost, RemoteLister, SyncJob, SyncOptions,
};

mod cli;

use cli::{
    BookmarkCommand, BookmarkKey, BookmarkListCommand, BookmarkRunCommand, BookmarkSaveCommand,
    Cli, JobArgs, LsCommand, ModeArg, PreviewCommand, RunCommand,
};

/// Environment variable holding the `tracing` filter directive.
const LOG_ENV: &str = "RSYNC_LAUNCHER_LOG";

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid job: {0}")]
    Job(#[from] JobError),
    #[error("launch failed: {0}")]
    Launch(#[from] LaunchError),
    #[error("bookmark error: {0}")]
    Bookmark(#[from] BookmarkError),
    #[error("listing failed: {0}")]
    List(#[from] ListError),
    #[error("failed to read password: {0}")]
    Password(String),
    #[error("failed to write output: {0}")]
    Output(String),
    #[error("rsync terminated without an exit status")]
    MissingExitCode,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

fn dispatch(cli: Cli) -> Result<i32, CliError> {
    let config = LauncherConfig::load_without_cli_args()?;
    match cli {
        Cli::Preview(command) => preview(&config, &command),
        Cli::Run(command) => run_job(config, &command),
        Cli::Ls(command) => list_remote(config, &command),
        Cli::Bookmark(command) => bookmark(config, command),
    }
}

fn preview(config: &LauncherConfig, args: &PreviewCommand) -> Result<i32, CliError> {
    let job = job_from_args(&args.job);
    write_line(&job.render(&config.rsync_bin, &config.ssh_bin).to_shell_line())?;
    Ok(0)
}

fn run_job(config: LauncherConfig, args: &RunCommand) -> Result<i32, CliError> {
    let job = job_from_args(&args.job);
    let mode = resolve_mode(&config, args.mode)?;
    let launcher = Launcher::with_streaming_runner(config)?;
    launch(&launcher, &job, mode, args.ask_password)
}

fn launch<R: CommandRunner>(
    launcher: &Launcher<R>,
    job: &SyncJob,
    mode: LaunchMode,
    ask_password: bool,
) -> Result<i32, CliError> {
    check_launchable(job, mode, ask_password)?;
    let credentials = prompt_credentials(ask_password)?;

    write_line(&format!("$ {}", launcher.preview(job)))?;
    let report = launcher.launch(job, mode, credentials.as_ref())?;
    if !mode.captures_output() {
        write_line("opened in a new Terminal window")?;
    }
    report.output.code.ok_or(CliError::MissingExitCode)
}

fn check_launchable(job: &SyncJob, mode: LaunchMode, ask_password: bool) -> Result<(), CliError> {
    job.validate()?;
    if ask_password && !mode.supports_password() {
        return Err(LaunchError::PasswordUnsupported { mode }.into());
    }
    Ok(())
}

fn list_remote(config: LauncherConfig, args: &LsCommand) -> Result<i32, CliError> {
    let endpoint = endpoint_from(&args.location, args.identity.as_deref(), args.port);
    let host = RemoteHost::from_endpoint(&endpoint)?;
    let credentials = prompt_credentials(args.ask_password)?;
    let lister = RemoteLister::with_process_runner(config)?;
    let listing = lister.list(&host, &endpoint.remote_path, credentials.as_ref())?;

    let entries: Vec<&RemoteEntry> = if args.dirs_only {
        listing.directories().collect()
    } else {
        listing.entries.iter().collect()
    };

    if args.json {
        let rendered = serde_json::to_string_pretty(&entries)
            .map_err(|err| CliError::Output(err.to_string()))?;
        write_line(&rendered)?;
    } else {
        for entry in entries {
            write_line(&format_entry(entry))?;
        }
    }
    Ok(0)
}

fn bookmark(config: LauncherConfig, command: BookmarkCommand) -> Result<i32, CliError> {
    let mut store = BookmarkStore::load(config.bookmarks_file())?;
    match command {
        BookmarkCommand::Save(args) => save_bookmark(&config, &mut store, &args),
        BookmarkCommand::List(args) => list_bookmarks(&config, &store, &args),
        BookmarkCommand::Show(BookmarkKey { key }) => {
            let found = store
                .find(&key)
                .ok_or_else(|| BookmarkError::NotFound { key: key.clone() })?;
            write_line(&describe_bookmark(found))?;
            Ok(0)
        }
        BookmarkCommand::Run(args) => run_bookmark(config, &mut store, &args),
        BookmarkCommand::Remove(BookmarkKey { key }) => {
            let removed = store.remove(&key)?;
            write_line(&format!("removed bookmark '{}'", removed.name))?;
            Ok(0)
        }
    }
}

fn save_bookmark(
    config: &LauncherConfig,
    store: &mut BookmarkStore,
    args: &BookmarkSaveCommand,
) -> Result<i32, CliError> {
    let job = job_from_args(&args.job);
    let name = args
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(|| job.suggest_name(), str::to_owned);
    let command = job.render(&config.rsync_bin, &config.ssh_bin).to_shell_line();
    let saved = Bookmark::from_job(name, &job, command);
    let message = format!("saved bookmark '{}' ({})", saved.name, saved.id);
    store.add(saved)?;
    write_line(&message)?;
    Ok(0)
}

fn list_bookmarks(
    config: &LauncherConfig,
    store: &BookmarkStore,
    args: &BookmarkListCommand,
) -> Result<i32, CliError> {
    let limit = if args.all {
        store.bookmarks().len()
    } else {
        args.limit.unwrap_or(config.recent_limit)
    };
    let recent = store.recent(limit);
    if recent.is_empty() {
        write_line("no bookmarks saved")?;
    }
    for bookmark in recent {
        write_line(&format!(
            "{}  {}  {}\n    {}",
            short_id(&bookmark.id),
            bookmark
                .last_used
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            bookmark.name,
            bookmark.command
        ))?;
    }
    Ok(0)
}

fn run_bookmark(
    config: LauncherConfig,
    store: &mut BookmarkStore,
    args: &BookmarkRunCommand,
) -> Result<i32, CliError> {
    let mode = resolve_mode(&config, args.mode)?;
    let launcher = Launcher::with_streaming_runner(config)?;
    let job = claim_bookmark(store, &args.key, mode, args.ask_password)?;
    launch(&launcher, &job, mode, args.ask_password)
}

/// Marks the bookmark as used only once its job is ready to launch.
fn claim_bookmark(
    store: &mut BookmarkStore,
    key: &str,
    mode: LaunchMode,
    ask_password: bool,
) -> Result<SyncJob, CliError> {
    let job = store
        .find(key)
        .map(Bookmark::job)
        .ok_or_else(|| BookmarkError::NotFound {
            key: key.to_owned(),
        })?;
    check_launchable(&job, mode, ask_password)?;
    store.touch(key)?;
    Ok(job)
}

fn job_from_args(args: &JobArgs) -> SyncJob {
    SyncJob::new(
        endpoint_from(
            &args.source,
            args.source_identity.as_deref(),
            args.source_port,
        ),
        endpoint_from(
            &args.target,
            args.target_identity.as_deref(),
            args.target_port,
        ),
        SyncOptions {
            archive: args.archive,
            verbose: args.verbose,
            progress: args.progress,
            dry_run: args.dry_run,
            delete: args.delete,
            human_readable: args.human_readable,
            copy_contents: args.contents,
        },
    )
}

fn endpoint_from(input: &str, identity: Option<&str>, port: Option<u16>) -> EndpointConfig {
    let mut endpoint = EndpointConfig::parse(input);
    if let Some(key) = identity {
        endpoint = endpoint.with_identity(key);
    }
    endpoint.port = port;
    endpoint
}

fn resolve_mode(config: &LauncherConfig, arg: Option<ModeArg>) -> Result<LaunchMode, CliError> {
    if let Some(mode) = arg {
        return Ok(launch_mode(mode));
    }
    Ok(config.default_launch_mode()?)
}

const fn launch_mode(arg: ModeArg) -> LaunchMode {
    match arg {
        ModeArg::Direct => LaunchMode::Direct,
        ModeArg::Shell => LaunchMode::Shell,
        ModeArg::Applescript => LaunchMode::AppleScript,
        ModeArg::Terminal => LaunchMode::Terminal,
    }
}

fn prompt_credentials(ask_password: bool) -> Result<Option<Credentials>, CliError> {
    if !ask_password {
        return Ok(None);
    }
    let password = rpassword::prompt_password("SSH password: ")
        .map_err(|err| CliError::Password(err.to_string()))?;
    Ok(Some(Credentials::password(password)))
}

fn format_entry(entry: &RemoteEntry) -> String {
    let suffix = if entry.kind.is_dir() { "/" } else { "" };
    let mut line = format!(
        "{} {:>12} {:>12} {}{suffix}",
        entry.permissions, entry.size, entry.modified, entry.name
    );
    if let Some(target) = entry.link_target.as_deref() {
        line.push_str(" -> ");
        line.push_str(target);
    }
    line
}

fn describe_bookmark(bookmark: &Bookmark) -> String {
    let job = bookmark.job();
    let flags = job.options.flags().join(" ");
    [
        format!("name:      {}", bookmark.name),
        format!("id:        {}", bookmark.id),
        format!("source:    {}", job.source.location()),
        format!("target:    {}", job.target.location()),
        format!("options:   {flags}"),
        format!("command:   {}", bookmark.command),
        format!("last used: {}", bookmark.last_used.to_rfc3339()),
    ]
    .join("\n")
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn write_line(line: &str) -> Result<(), CliError> {
    writeln!(io::stdout(), "{line}").map_err(|err| CliError::Output(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "error: {err}").ok();
}

#[cfg(test)]
mod main_tests;
