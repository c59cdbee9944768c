//! High-level operations against the koi daemon
//!
//! Each operation performs exactly one CLI invocation. Control commands return
//! the daemon's reply with the routing headers stripped; `status` and `local`
//! are parsed into typed records.

use crate::config::KoiConfig;
use crate::error::{KoiError, Result};
use crate::invoker::{CommandInvoker, Invocation, KoiCommand, ProcessInvoker};
use crate::normalize::{from_chain, strip_headers, Routed};
use crate::parse::{parse_local, parse_status};
use crate::render::render_status;
use crate::types::{ClusterSnapshot, LocalInfo};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

/// Prefix of the `failures` reply when nothing has failed
const NO_FAILURES: &str = "Last 0 failures";

/// Cluster maintenance switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceMode {
    On,
    Off,
}

impl MaintenanceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MaintenanceMode::On => "on",
            MaintenanceMode::Off => "off",
        }
    }
}

impl fmt::Display for MaintenanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for MaintenanceMode {
    fn from(on: bool) -> Self {
        if on {
            MaintenanceMode::On
        } else {
            MaintenanceMode::Off
        }
    }
}

impl TryFrom<i64> for MaintenanceMode {
    type Error = KoiError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            1 => Ok(MaintenanceMode::On),
            0 => Ok(MaintenanceMode::Off),
            other => Err(KoiError::InvalidArgument(format!(
                "maintenance expects on or off, got {other}"
            ))),
        }
    }
}

impl FromStr for MaintenanceMode {
    type Err = KoiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "1" => Ok(MaintenanceMode::On),
            "off" | "false" | "0" => Ok(MaintenanceMode::Off),
            _ => Err(KoiError::InvalidArgument(format!(
                "maintenance expects on or off, got '{s}'"
            ))),
        }
    }
}

/// Client for the koi daemon, generic over how the CLI is run
pub struct KoiClient<I = ProcessInvoker> {
    invoker: I,
}

impl KoiClient<ProcessInvoker> {
    /// Client that spawns the binary described by `config`
    pub fn from_config(config: &KoiConfig) -> Self {
        Self::new(ProcessInvoker::new(config))
    }
}

impl<I: CommandInvoker> KoiClient<I> {
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Mutable access, e.g. to rebind a [`ProcessInvoker`] to another binary
    pub fn invoker_mut(&mut self) -> &mut I {
        &mut self.invoker
    }

    async fn raw(&self, invocation: Invocation) -> Result<String> {
        self.invoker.invoke(&invocation).await
    }

    async fn passthrough(&self, invocation: Invocation) -> Result<String> {
        Ok(strip_headers(&self.raw(invocation).await?))
    }

    /// Cluster-wide elector and node state
    pub async fn status(&self) -> Result<ClusterSnapshot> {
        let raw = self.raw(Invocation::new(KoiCommand::Status)).await?;
        let snapshot = parse_status(&strip_headers(&raw))?;
        if !snapshot.is_available() {
            debug!("Daemon returned no status");
        }
        Ok(snapshot)
    }

    /// `status` rendered as a text report; empty when no status is available
    pub async fn status_report(&self) -> Result<String> {
        let snapshot = self.status().await?;
        Ok(render_status(&snapshot)?)
    }

    /// Attributes of the node the CLI is talking to
    pub async fn local(&self) -> Result<LocalInfo> {
        Ok(self.local_routed().await?.value)
    }

    /// `local` together with the nodes that relayed the answer
    pub async fn local_routed(&self) -> Result<Routed<LocalInfo>> {
        let raw = self.raw(Invocation::new(KoiCommand::Local)).await?;
        let value = parse_local(&strip_headers(&raw))?;
        Ok(Routed {
            route: from_chain(&raw),
            value,
        })
    }

    pub async fn local_uuid(&self) -> Result<Uuid> {
        Ok(self.local().await?.uuid)
    }

    /// Attributes of another node; the elector redirects `status <node>` to it
    pub async fn node_status(&self, node: &str) -> Result<LocalInfo> {
        let raw = self
            .raw(Invocation::new(KoiCommand::Status).arg(node))
            .await?;
        Ok(parse_local(&strip_headers(&raw))?)
    }

    pub async fn promote(&self, node: &str) -> Result<String> {
        self.passthrough(Invocation::new(KoiCommand::Promote).arg(node))
            .await
    }

    pub async fn tree(&self) -> Result<String> {
        self.passthrough(Invocation::new(KoiCommand::Tree)).await
    }

    pub async fn demote(&self) -> Result<String> {
        self.passthrough(Invocation::new(KoiCommand::Demote)).await
    }

    pub async fn elect(&self) -> Result<String> {
        self.passthrough(Invocation::new(KoiCommand::Elect)).await
    }

    pub async fn recover(&self, node: Option<&str>) -> Result<String> {
        self.passthrough(Invocation::new(KoiCommand::Recover).opt_arg(node))
            .await
    }

    /// Recent failures, or an empty string when there are none
    pub async fn failures(&self) -> Result<String> {
        let text = self.passthrough(Invocation::new(KoiCommand::Failures)).await?;
        if text.starts_with(NO_FAILURES) {
            return Ok(String::new());
        }
        Ok(text)
    }

    pub async fn start(&self, node: Option<&str>) -> Result<String> {
        self.passthrough(Invocation::new(KoiCommand::Start).opt_arg(node))
            .await
    }

    pub async fn stop(&self, node: Option<&str>) -> Result<String> {
        self.passthrough(Invocation::new(KoiCommand::Stop).opt_arg(node))
            .await
    }

    pub async fn maintenance(&self, mode: MaintenanceMode) -> Result<String> {
        self.passthrough(Invocation::new(KoiCommand::Maintenance).arg(mode.as_str()))
            .await
    }

    /// Like [`maintenance`](Self::maintenance) for loosely typed input
    /// (`on`, `off`, `true`, `false`, `1`, `0`). Anything else is rejected
    /// before the daemon is contacted.
    pub async fn maintenance_value(&self, value: &str) -> Result<String> {
        let mode: MaintenanceMode = value.parse()?;
        self.maintenance(mode).await
    }

    pub async fn reconfigure(&self, node: Option<&str>) -> Result<String> {
        self.passthrough(Invocation::new(KoiCommand::Reconfigure).opt_arg(node))
            .await
    }
}
