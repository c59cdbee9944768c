//! koi-ctl: command-line front-end for the koi failover daemon

pub mod cli;
pub mod commands;
pub mod logging;
