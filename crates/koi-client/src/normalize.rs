//! Strip the routing envelope from raw daemon responses
//!
//! Every response from the koi CLI may be prefixed by `From: <uuid>` lines
//! naming the node that answered, and `Redirect: <endpoint>` lines when the
//! request was forwarded to the elector. Parsers only ever see the payload.

use serde::Serialize;

const FROM_PREFIX: &str = "From: ";
const REDIRECT_PREFIX: &str = "Redirect: ";

fn is_header(line: &str) -> bool {
    line.starts_with(FROM_PREFIX) || line.starts_with(REDIRECT_PREFIX)
}

/// Remove leading `From:` / `Redirect:` lines and trim the remaining payload
pub fn strip_headers(raw: &str) -> String {
    let payload: Vec<&str> = raw.split('\n').skip_while(|line| is_header(line)).collect();
    payload.join("\n").trim().to_string()
}

/// Collect the senders named by the leading `From:` lines, in order
pub fn from_chain(raw: &str) -> Vec<String> {
    raw.split('\n')
        .take_while(|line| is_header(line))
        .filter_map(|line| line.strip_prefix(FROM_PREFIX))
        .map(|sender| sender.trim().to_string())
        .collect()
}

/// A parsed payload together with the nodes that relayed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Routed<T> {
    pub route: Vec<String>,
    pub value: T,
}
