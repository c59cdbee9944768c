//! Human-readable cluster status report

use crate::error::ProtocolError;
use crate::types::{ClusterSnapshot, NodeRecord};
use std::fmt::Write;

const MISSING: &str = "-";

fn or_missing(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING)
}

/// Render a snapshot the way `koi-ctl status` prints it.
///
/// Returns an empty string for a snapshot without elector state. A master
/// UUID that is not among the reported nodes is a protocol error.
pub fn render_status(snapshot: &ClusterSnapshot) -> Result<String, ProtocolError> {
    let Some(elector) = &snapshot.elector else {
        return Ok(String::new());
    };

    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "Maintenance mode: {}", elector.maintenance);
    let _ = writeln!(out, "Manual master mode: {}", elector.manual_master);

    if let Some(master) = elector.current_master() {
        let node = snapshot
            .node(&master)
            .ok_or(ProtocolError::UnknownMaster(master))?;
        let _ = writeln!(out, "Master: {} ({})", or_missing(&node.name), node.uuid);
    }
    if let Some(target) = elector.target_master() {
        let _ = writeln!(out, "Target master: {}", target);
    }

    out.push('\n');
    for (i, node) in snapshot.nodes.values().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_node(&mut out, node);
    }
    Ok(out)
}

fn render_node(out: &mut String, node: &NodeRecord) {
    let _ = writeln!(out, "{} ({}):", or_missing(&node.name), node.uuid);
    let _ = writeln!(out, "   Address: {}", or_missing(&node.addr));
    match &node.target_action {
        Some(action) => {
            let _ = writeln!(out, "   State: {} ({})", or_missing(&node.state), action);
        }
        None => {
            let _ = writeln!(out, "   State: {}", or_missing(&node.state));
        }
    }
    let _ = writeln!(out, "   Updated: {}", or_missing(&node.seen));
    if let Some(flags) = &node.flags {
        let _ = writeln!(out, "   Flags: {}", flags);
    }
    if node.has_failed() {
        let _ = writeln!(out, "   Last Failed: {}", or_missing(&node.lastfailed));
    }
    if !node.services.is_empty() {
        out.push_str("   Services:\n");
        for service in &node.services {
            match service.primary_field() {
                Some(field) => {
                    let _ = writeln!(out, "      {} ({})", service.name, field);
                }
                None => {
                    let _ = writeln!(out, "      {}", service.name);
                }
            }
        }
    }
}
