//! External script execution.
//!
//! Each invocation is one-shot: spawn, wait for exit, capture stdout and stderr
//! in full. There is no timeout, no retry and no locking, so concurrent
//! requests may run the same script at the same time.

use async_trait::async_trait;
use healthdesk_core::CommandLine;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of a finished script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ScriptOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn run(&self, command: &CommandLine) -> Result<ScriptOutput, RunError>;
}

/// Runs commands as child processes of the server.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

#[async_trait]
impl ScriptRunner for ProcessRunner {
    async fn run(&self, command: &CommandLine) -> Result<ScriptOutput, RunError> {
        tracing::debug!(command = %command, "invoking script");

        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| RunError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        Ok(ScriptOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandLine {
        CommandLine {
            program: "/bin/sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[tokio::test]
    async fn captures_stdout_on_success() {
        let out = ProcessRunner
            .run(&sh(r#"printf '{"status":"success"}'"#))
            .await
            .unwrap();
        assert!(out.success);
        assert_eq!(out.exit_code, Some(0));
        assert_eq!(out.stdout, r#"{"status":"success"}"#);
        assert!(out.stderr.is_empty());
    }

    #[tokio::test]
    async fn captures_stderr_and_exit_code_on_failure() {
        let out = ProcessRunner
            .run(&sh("echo 'disk full' >&2; exit 3"))
            .await
            .unwrap();
        assert!(!out.success);
        assert_eq!(out.exit_code, Some(3));
        assert_eq!(out.stderr.trim(), "disk full");
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let cmd = CommandLine {
            program: "/nonexistent/healthdesk-script".to_string(),
            args: vec![],
        };
        let err = ProcessRunner.run(&cmd).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/healthdesk-script"));
    }
}
