//! Error types for koi-client

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// The daemon answered, but the text does not follow its response grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// `line` is one-based and counts lines of the payload after header stripping
    #[error("node block starting at payload line {line} has no uuid")]
    MissingNodeUuid { line: usize },

    #[error("local info response has no uuid")]
    MissingLocalUuid,

    #[error("elector state is missing required key '{0}'")]
    MissingElectorKey(&'static str),

    #[error("invalid uuid for '{key}': {value}")]
    InvalidUuid { key: String, value: String },

    #[error("master {0} is not among the reported nodes")]
    UnknownMaster(Uuid),
}

#[derive(Error, Debug)]
pub enum KoiError {
    #[error("Malformed daemon response: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Command '{command}' timed out after {limit:?}")]
    Timeout { command: String, limit: Duration },

    #[error("Command '{command}' exited with {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to spawn {}: {source}", binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KoiError {
    /// True when the daemon was reached but its output was not understood
    pub fn is_protocol(&self) -> bool {
        matches!(self, KoiError::Protocol(_))
    }

    /// True when running the daemon CLI itself failed
    pub fn is_invocation(&self) -> bool {
        matches!(
            self,
            KoiError::Timeout { .. } | KoiError::CommandFailed { .. } | KoiError::Spawn { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, KoiError>;
