use thiserror::Error;

use crate::process_command::{ProcessCommand, SpawnCommandResult};
use crate::scratch::ScratchFile;

/// Result of one formatter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    /// The tool rewrote the scratch file; this is its new content.
    Fixed(String),
    /// The tool found nothing fixable; the document must be left untouched.
    Unchanged,
}

/// A classified invocation failure. The `Display` string of each variant is
/// the one-line message a host shows to the user.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Failed to write the scratch file: {0}")]
    Write(#[source] std::io::Error),

    #[error("Failed to read the scratch file back: {0}")]
    Read(#[source] std::io::Error),

    #[error("'{command}' is not found. Check the executablePath setting.")]
    ExecutableNotFound { command: String },

    #[error("Failed to launch '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error of the application.")]
    ToolConfig,

    #[error("Configuration error of a Fixer.")]
    ToolFixer,

    #[error("Exception raised within the application.")]
    ToolInternal,

    #[error("The formatter produced an empty file; the result was discarded.")]
    EmptyResult,

    #[error("The formatter exited with unexpected code {0}.")]
    UnknownExitCode(i32),

    #[error("The formatter was terminated by a signal.")]
    Terminated,
}

/// Runs the external `phpcbf` binary over one document's text.
///
/// The text is written to a scratch file, the tool fixes that file in place,
/// and the file is read back when the exit code says fixes were applied. The
/// scratch file is removed on every termination path.
#[derive(Debug, Clone)]
pub struct Formatter {
    executable: String,
    standard: Option<String>,
}

impl Formatter {
    pub fn new(executable: impl Into<String>, standard: Option<String>) -> Self {
        Self {
            executable: executable.into(),
            standard,
        }
    }

    fn command(&self, scratch_path: &str) -> ProcessCommand {
        // -l restricts the tool to the given file, -q suppresses progress
        // output and interactivity.
        let standard_arg = self
            .standard
            .as_ref()
            .map(|standard| format!("--standard={standard}"));
        let mut args = vec!["-lq", scratch_path];
        if let Some(standard_arg) = &standard_arg {
            args.push(standard_arg);
        }
        ProcessCommand::new(&self.executable, &args)
    }

    /// Runs the tool to completion. No retries, no timeout; a hung tool hangs
    /// this call.
    pub fn format(&self, content: &str) -> Result<FormatOutcome, FormatError> {
        let scratch = ScratchFile::with_content(content).map_err(FormatError::Write)?;

        let child = match self.command(&scratch.path().to_string_lossy()).spawn() {
            SpawnCommandResult::CommandNotFound { command_name } => {
                return Err(FormatError::ExecutableNotFound {
                    command: command_name,
                })
            }
            SpawnCommandResult::Spawned(Err(error))
                if error.kind() == std::io::ErrorKind::NotFound =>
            {
                return Err(FormatError::ExecutableNotFound {
                    command: self.executable.clone(),
                })
            }
            SpawnCommandResult::Spawned(Err(error)) => {
                return Err(FormatError::Spawn {
                    command: self.executable.clone(),
                    source: error,
                })
            }
            SpawnCommandResult::Spawned(Ok(child)) => child,
        };

        let output = child
            .wait_with_output()
            .map_err(|source| FormatError::Spawn {
                command: self.executable.clone(),
                source,
            })?;

        // The streams are diagnostic only; control decisions come from the
        // exit code alone.
        if !output.stdout.is_empty() {
            log::trace!("phpcbf stdout: {}", String::from_utf8_lossy(&output.stdout));
        }
        if !output.stderr.is_empty() {
            log::info!("phpcbf stderr: {}", String::from_utf8_lossy(&output.stderr));
        }

        // phpcbf exit codes:
        // 0 = no fixable errors were found, nothing was fixed
        // 1 = all fixable errors were fixed correctly
        // 2 = some of the fixable errors could not be fixed
        // 3 = general script execution error
        // 16 = application configuration error
        // 32 = fixer configuration error
        // 64 = exception raised within the application
        match output.status.code() {
            Some(0) => Ok(FormatOutcome::Unchanged),
            Some(1) | Some(2) => {
                let fixed = scratch.read_back().map_err(FormatError::Read)?;
                if fixed.is_empty() {
                    // An empty file is never a valid formatting result; it
                    // must not overwrite the document.
                    Err(FormatError::EmptyResult)
                } else {
                    Ok(FormatOutcome::Fixed(fixed))
                }
            }
            Some(16) => Err(FormatError::ToolConfig),
            Some(32) => Err(FormatError::ToolFixer),
            Some(64) => Err(FormatError::ToolInternal),
            Some(code) => Err(FormatError::UnknownExitCode(code)),
            None => Err(FormatError::Terminated),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::os::unix::fs::PermissionsExt;

    /// Writes an executable shell script standing in for phpcbf. The script
    /// receives the same argument vector the real tool would: `-lq`, the
    /// scratch path, and optionally `--standard=<name>`.
    pub(crate) fn fake_phpcbf(dir: &tempfile::TempDir, script_body: &str) -> String {
        let path = dir.path().join("fake-phpcbf");
        std::fs::write(&path, format!("#!/usr/bin/env bash\n{script_body}\n")).unwrap();
        let mut permissions = std::fs::metadata(&path).unwrap().permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(&path, permissions).unwrap();
        path.to_string_lossy().into_owned()
    }
}
