//! Command runner that echoes output while it is produced.
//!
//! rsync's `--progress` output redraws with carriage returns rather than
//! newlines, so output is forwarded in raw chunks instead of lines.

use std::io::{self, Read, Write};
use std::process::Stdio;
use std::thread;

use super::types::{CommandOutput, CommandRunner, LaunchCommand, RunnerError};

const CHUNK_SIZE: usize = 8 * 1024;

/// Runner that forwards child stdout/stderr to the parent's streams while
/// also capturing them.
#[derive(Clone, Debug, Default)]
pub struct StreamingCommandRunner;

impl CommandRunner for StreamingCommandRunner {
    fn run(&self, command: &LaunchCommand) -> Result<CommandOutput, RunnerError> {
        let program = command.program.as_str();
        let mut child = command
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| RunnerError::Spawn {
                program: program.to_owned(),
                message: err.to_string(),
            })?;

        let child_stdout = child
            .stdout
            .take()
            .ok_or_else(|| io_error(program, "stdout not captured"))?;
        let child_stderr = child
            .stderr
            .take()
            .ok_or_else(|| io_error(program, "stderr not captured"))?;

        let (stdout, stderr) = thread::scope(|scope| {
            let out = scope.spawn(|| tee(child_stdout, io::stdout()));
            let err = scope.spawn(|| tee(child_stderr, io::stderr()));
            (out.join(), err.join())
        });

        let status = child
            .wait()
            .map_err(|err| io_error(program, &err.to_string()))?;

        Ok(CommandOutput {
            code: status.code(),
            stdout: collect(program, stdout)?,
            stderr: collect(program, stderr)?,
        })
    }
}

fn tee<R: Read, W: Write>(mut source: R, mut sink: W) -> io::Result<Vec<u8>> {
    let mut captured = Vec::new();
    let mut buffer = [0_u8; CHUNK_SIZE];
    loop {
        let read = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        let chunk = buffer.get(..read).unwrap_or_default();
        sink.write_all(chunk)?;
        sink.flush()?;
        captured.extend_from_slice(chunk);
    }
    Ok(captured)
}

fn collect(
    program: &str,
    joined: thread::Result<io::Result<Vec<u8>>>,
) -> Result<String, RunnerError> {
    let bytes = joined
        .map_err(|_| io_error(program, "output forwarding thread panicked"))?
        .map_err(|err| io_error(program, &err.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn io_error(program: &str, message: &str) -> RunnerError {
    RunnerError::Io {
        program: program.to_owned(),
        message: message.to_owned(),
    }
}
