//! Run the koi CLI and capture its output

use crate::config::KoiConfig;
use crate::error::{KoiError, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Subcommands understood by the koi CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KoiCommand {
    Status,
    Local,
    Tree,
    Reconfigure,
    Maintenance,
    Promote,
    Demote,
    Elect,
    Start,
    Stop,
    Recover,
    Failures,
}

impl KoiCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            KoiCommand::Status => "status",
            KoiCommand::Local => "local",
            KoiCommand::Tree => "tree",
            KoiCommand::Reconfigure => "reconfigure",
            KoiCommand::Maintenance => "maintenance",
            KoiCommand::Promote => "promote",
            KoiCommand::Demote => "demote",
            KoiCommand::Elect => "elect",
            KoiCommand::Start => "start",
            KoiCommand::Stop => "stop",
            KoiCommand::Recover => "recover",
            KoiCommand::Failures => "failures",
        }
    }
}

impl std::fmt::Display for KoiCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request to the daemon CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: KoiCommand,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(command: KoiCommand) -> Self {
        Self {
            command,
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append the argument only when present
    pub fn opt_arg(self, arg: Option<&str>) -> Self {
        match arg {
            Some(arg) => self.arg(arg),
            None => self,
        }
    }
}

/// Runs daemon CLI requests and returns their raw standard output
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandInvoker: Send + Sync {
    async fn invoke(&self, invocation: &Invocation) -> Result<String>;
}

/// Spawns the koi binary for every invocation
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    binary: PathBuf,
    /// `-f <file>` and host/port flags, resolved once at construction
    base_args: Vec<OsString>,
    timeout: Duration,
}

impl ProcessInvoker {
    pub fn new(config: &KoiConfig) -> Self {
        let mut base_args = Vec::new();
        for file in config.existing_config_files() {
            base_args.push(OsString::from("-f"));
            base_args.push(file.into_os_string());
        }
        if let Some(host) = &config.host {
            base_args.push(OsString::from("-H"));
            base_args.push(OsString::from(host));
        }
        if let Some(port) = config.port {
            base_args.push(OsString::from("-p"));
            base_args.push(OsString::from(port.to_string()));
        }

        Self {
            binary: config.binary.clone(),
            base_args,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point this invoker at a different binary and config set
    pub fn rebind(&mut self, config: &KoiConfig) {
        debug!("Rebinding invoker to {}", config.binary.display());
        *self = Self::new(config).with_timeout(self.timeout);
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    /// Full argument list passed to the binary for `invocation`
    pub fn command_line(&self, invocation: &Invocation) -> Vec<OsString> {
        let mut args = self.base_args.clone();
        args.push(OsString::from(invocation.command.as_str()));
        args.extend(invocation.args.iter().map(OsString::from));
        args
    }

    async fn run(&self, invocation: &Invocation) -> Result<String> {
        let args = self.command_line(invocation);
        debug!("Running {} {:?}", self.binary.display(), args);

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| KoiError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(KoiError::CommandFailed {
                command: invocation.command.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl CommandInvoker for ProcessInvoker {
    async fn invoke(&self, invocation: &Invocation) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.run(invocation)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "{} {} timed out after {:?}",
                    self.binary.display(),
                    invocation.command,
                    self.timeout
                );
                Err(KoiError::Timeout {
                    command: invocation.command.to_string(),
                    limit: self.timeout,
                })
            }
        }
    }
}
