use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, LogLevel};

/// Level requested on the command line; warnings only by default
pub fn level_for(cli: &Cli) -> LevelFilter {
    match (cli.log_level, cli.verbose) {
        (Some(level), _) => level.into(),
        (None, true) => LogLevel::Debug.into(),
        (None, false) => LevelFilter::WARN,
    }
}

/// Initialize logging to stderr. `RUST_LOG` takes precedence when set.
pub fn init(level: LevelFilter) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("koi_cli={level},koi_client={level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
