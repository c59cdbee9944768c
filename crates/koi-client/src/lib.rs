//! Client adapter for the koi cluster failover daemon
//!
//! The koi CLI answers every request with line-oriented text, optionally
//! prefixed by routing headers. This crate runs the CLI, strips the headers,
//! and turns `status` / `local` payloads into typed records. Control commands
//! (promote, demote, maintenance, ...) are passed through as text.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use koi_client::{KoiClient, KoiConfig};
//!
//! let config = KoiConfig::load(None).await?;
//! let client = KoiClient::from_config(&config);
//! let snapshot = client.status().await?;
//! if let Some(master) = snapshot.master_node() {
//!     println!("master is {:?}", master.name);
//! }
//! ```

mod client;
mod config;
mod error;
mod invoker;
mod normalize;
pub mod parse;
mod render;
mod types;

pub use client::*;
pub use config::*;
pub use error::*;
pub use invoker::*;
pub use normalize::*;
pub use parse::{parse_local, parse_services, parse_status};
pub use render::*;
pub use types::*;
