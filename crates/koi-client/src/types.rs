//! Typed records built from daemon responses

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;
use uuid::Uuid;

/// Sentinel the daemon reports for "no node selected"
pub const NIL_UUID: Uuid = Uuid::nil();

/// Maximum number of unrecognized keys kept per record
pub const MAX_EXTRA_FIELDS: usize = 64;

/// Prefix of the `lastfailed` timestamp the daemon uses for "never failed"
pub const NEVER_FAILED_PREFIX: &str = "1984";

/// Keys the daemon sent that this client has no named field for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, String>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a key, replacing an earlier value. New keys past the cap are dropped.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.0.len() >= MAX_EXTRA_FIELDS && !self.0.contains_key(&key) {
            warn!("Dropping unrecognized field '{}': extra field cap reached", key);
            return false;
        }
        self.0.insert(key, value.into());
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A service running on a node, with its status fields in daemon order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEntry {
    pub name: String,
    pub fields: Vec<String>,
}

impl ServiceEntry {
    pub fn new(name: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// First status field, shown next to the name in reports
    pub fn primary_field(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }
}

/// Leadership metadata of the cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElectorState {
    pub maintenance: String,
    #[serde(rename = "manual-master")]
    pub manual_master: String,
    pub master: Uuid,
    pub target: Uuid,
    #[serde(flatten)]
    pub extra: Fields,
}

impl ElectorState {
    /// The elected master, if any
    pub fn current_master(&self) -> Option<Uuid> {
        non_nil(self.master)
    }

    /// The node the elector is moving mastership to, if any
    pub fn target_master(&self) -> Option<Uuid> {
        non_nil(self.target)
    }
}

/// One cluster member as reported in a `[node]` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    pub uuid: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "target-action", skip_serializing_if = "Option::is_none")]
    pub target_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastfailed: Option<String>,
    pub services: Vec<ServiceEntry>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl NodeRecord {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            name: None,
            addr: None,
            state: None,
            target_action: None,
            mode: None,
            seen: None,
            flags: None,
            lastfailed: None,
            services: Vec::new(),
            extra: Fields::new(),
        }
    }

    /// Whether the node has a real failure timestamp
    pub fn has_failed(&self) -> bool {
        self.lastfailed
            .as_deref()
            .is_some_and(|ts| !ts.starts_with(NEVER_FAILED_PREFIX))
    }
}

/// Cluster-wide view returned by `status`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elector: Option<ElectorState>,
    pub nodes: BTreeMap<Uuid, NodeRecord>,
}

impl ClusterSnapshot {
    /// False when the daemon returned no status at all
    pub fn is_available(&self) -> bool {
        self.elector.is_some()
    }

    pub fn node(&self, uuid: &Uuid) -> Option<&NodeRecord> {
        self.nodes.get(uuid)
    }

    /// Look up a node by its configured name
    pub fn node_by_name(&self, name: &str) -> Option<&NodeRecord> {
        self.nodes
            .values()
            .find(|n| n.name.as_deref() == Some(name))
    }

    pub fn master_node(&self) -> Option<&NodeRecord> {
        let master = self.elector.as_ref()?.current_master()?;
        self.nodes.get(&master)
    }
}

/// Attributes of the node the CLI talked to, from `local`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalInfo {
    pub uuid: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starttime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl LocalInfo {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            name: None,
            port: None,
            maintenance: None,
            runner: None,
            elector: None,
            starttime: None,
            nodes: None,
            cluster: None,
            state: None,
            extra: Fields::new(),
        }
    }

    /// All attributes as `(key, value)` pairs, using the daemon's key names
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = vec![("uuid".to_string(), self.uuid.to_string())];
        let named = [
            ("name", &self.name),
            ("port", &self.port),
            ("maintenance", &self.maintenance),
            ("runner", &self.runner),
            ("elector", &self.elector),
            ("starttime", &self.starttime),
            ("nodes", &self.nodes),
            ("cluster", &self.cluster),
            ("state", &self.state),
        ];
        for (key, value) in named {
            if let Some(value) = value {
                out.push((key.to_string(), value.clone()));
            }
        }
        out.extend(self.extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        out
    }
}

fn non_nil(uuid: Uuid) -> Option<Uuid> {
    if uuid.is_nil() {
        None
    } else {
        Some(uuid)
    }
}
