use std::{path::PathBuf, process::Stdio, time::Duration};

use async_trait::async_trait;
use tokio::process::Command;

use crate::errors::AppError;

/// One run of the external translation script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub timeout: Duration,
}

impl ProcessInvocation {
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[async_trait]
pub trait TranslationRunner: Send + Sync {
    /// Runs the invocation to completion. Exceeding its timeout yields `AppError::TimedOut`.
    async fn run(&self, invocation: &ProcessInvocation) -> Result<ProcessOutput, AppError>;
}

#[derive(Debug, Default)]
pub struct ScriptRunner;

impl ScriptRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TranslationRunner for ScriptRunner {
    async fn run(&self, invocation: &ProcessInvocation) -> Result<ProcessOutput, AppError> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        // Dropping the output future on timeout kills the child.
        let output = tokio::time::timeout(invocation.timeout, command.output())
            .await
            .map_err(|_| AppError::TimedOut)?
            .map_err(|err| {
                AppError::internal(format!(
                    "failed to run {}: {err}",
                    invocation.program
                ))
            })?;

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
