//! Parsers for the daemon's line-oriented response payloads
//!
//! A `status` payload is an elector block of `key: value` lines, a blank
//! separator, then any number of node blocks:
//!
//! ```text
//! maintenance: false
//! manual-master: false
//! master: 7c9e6679-7425-40de-944b-e07fc1f90ae7
//! target: 00000000-0000-0000-0000-000000000000
//!
//! [node]
//! name: echo
//! services: [echo:Promoted:none:+, mako:Promoted:none:+]
//! uuid: 7c9e6679-7425-40de-944b-e07fc1f90ae7
//! [end]
//! ```
//!
//! All functions expect text already passed through
//! [`strip_headers`](crate::normalize::strip_headers).

use crate::error::ProtocolError;
use crate::types::{ClusterSnapshot, ElectorState, Fields, LocalInfo, NodeRecord, ServiceEntry};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

const NODE_START: &str = "[node]";
const NODE_END: &str = "[end]";

/// Forward-only position over the lines of a payload
#[derive(Debug)]
pub struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    pub fn next_line(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    /// Zero-based index of the line `peek` would return
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_done(&self) -> bool {
        self.pos >= self.lines.len()
    }
}

/// Split `key: value` on the first colon, trimming both halves
fn split_pair(line: &str) -> Option<(&str, &str)> {
    line.split_once(':').map(|(k, v)| (k.trim(), v.trim()))
}

fn parse_uuid(key: &str, value: &str) -> Result<Uuid, ProtocolError> {
    Uuid::parse_str(value).map_err(|_| ProtocolError::InvalidUuid {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Parse an inline service list such as `[echo:Promoted:none:+, mako:Promoted]`.
///
/// Never fails: blank segments are skipped and a segment without a name
/// yields an entry with an empty name.
pub fn parse_services(value: &str) -> Vec<ServiceEntry> {
    let inner = match value.strip_prefix('[') {
        Some(rest) => {
            let mut chars = rest.chars();
            chars.next_back();
            chars.as_str()
        }
        None => value,
    };

    inner
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut tokens = segment.split(':');
            let name = tokens.next().unwrap_or_default();
            ServiceEntry::new(name, tokens.map(str::to_string).collect())
        })
        .collect()
}

/// Parse one node block. The cursor must sit just past the `[node]` line and
/// is left on the `[end]` line (or at end of input).
pub fn parse_node(cursor: &mut LineCursor<'_>) -> Result<NodeRecord, ProtocolError> {
    let start = cursor.position();
    let mut uuid = None;
    let mut services = Vec::new();
    let mut known: BTreeMap<&str, String> = BTreeMap::new();
    let mut extra = Fields::new();

    while let Some(line) = cursor.peek() {
        if line == NODE_END {
            break;
        }
        cursor.next_line();

        let Some((key, value)) = split_pair(line) else {
            continue;
        };
        match key {
            "uuid" => uuid = Some(parse_uuid(key, value)?),
            "services" => services = parse_services(value),
            "name" | "addr" | "state" | "target-action" | "mode" | "seen" | "flags"
            | "lastfailed" => {
                known.insert(key, value.to_string());
            }
            _ => {
                extra.insert(key, value);
            }
        }
    }

    let uuid = uuid.ok_or(ProtocolError::MissingNodeUuid { line: start + 1 })?;
    let mut node = NodeRecord::new(uuid);
    node.name = known.remove("name");
    node.addr = known.remove("addr");
    node.state = known.remove("state");
    node.target_action = known.remove("target-action");
    node.mode = known.remove("mode");
    node.seen = known.remove("seen");
    node.flags = known.remove("flags");
    node.lastfailed = known.remove("lastfailed");
    node.services = services;
    node.extra = extra;
    Ok(node)
}

fn parse_elector(cursor: &mut LineCursor<'_>) -> Result<ElectorState, ProtocolError> {
    let mut maintenance = None;
    let mut manual_master = None;
    let mut master = None;
    let mut target = None;
    let mut extra = Fields::new();

    // The blank separator ends the block and is consumed with it
    while let Some(line) = cursor.next_line() {
        if line.is_empty() {
            break;
        }
        let Some((key, value)) = split_pair(line) else {
            continue;
        };
        match key {
            "maintenance" => maintenance = Some(value.to_string()),
            "manual-master" => manual_master = Some(value.to_string()),
            "master" => master = Some(parse_uuid(key, value)?),
            "target" => target = Some(parse_uuid(key, value)?),
            _ => {
                extra.insert(key, value);
            }
        }
    }

    Ok(ElectorState {
        maintenance: maintenance.ok_or(ProtocolError::MissingElectorKey("maintenance"))?,
        manual_master: manual_master.ok_or(ProtocolError::MissingElectorKey("manual-master"))?,
        master: master.ok_or(ProtocolError::MissingElectorKey("master"))?,
        target: target.ok_or(ProtocolError::MissingElectorKey("target"))?,
        extra,
    })
}

/// Parse a normalized `status` payload into a cluster snapshot.
///
/// An empty payload means the daemon had nothing to report and yields a
/// snapshot without elector state.
pub fn parse_status(text: &str) -> Result<ClusterSnapshot, ProtocolError> {
    if text.is_empty() {
        return Ok(ClusterSnapshot::default());
    }

    let mut cursor = LineCursor::new(text);
    let elector = parse_elector(&mut cursor)?;

    let mut nodes = BTreeMap::new();
    while let Some(line) = cursor.next_line() {
        if line == NODE_START {
            let node = parse_node(&mut cursor)?;
            nodes.insert(node.uuid, node);
        }
    }

    debug!("Parsed status with {} nodes", nodes.len());
    Ok(ClusterSnapshot {
        elector: Some(elector),
        nodes,
    })
}

/// Parse a normalized `local` payload
pub fn parse_local(text: &str) -> Result<LocalInfo, ProtocolError> {
    let mut uuid = None;
    let mut known: BTreeMap<&str, String> = BTreeMap::new();
    let mut extra = Fields::new();

    for line in text.lines().filter(|l| !l.is_empty()) {
        let Some((key, value)) = split_pair(line) else {
            continue;
        };
        match key {
            "uuid" => uuid = Some(parse_uuid(key, value)?),
            "name" | "port" | "maintenance" | "runner" | "elector" | "starttime" | "nodes"
            | "cluster" | "state" => {
                known.insert(key, value.to_string());
            }
            _ => {
                extra.insert(key, value);
            }
        }
    }

    let mut info = LocalInfo::new(uuid.ok_or(ProtocolError::MissingLocalUuid)?);
    info.name = known.remove("name");
    info.port = known.remove("port");
    info.maintenance = known.remove("maintenance");
    info.runner = known.remove("runner");
    info.elector = known.remove("elector");
    info.starttime = known.remove("starttime");
    info.nodes = known.remove("nodes");
    info.cluster = known.remove("cluster");
    info.state = known.remove("state");
    info.extra = extra;
    Ok(info)
}
