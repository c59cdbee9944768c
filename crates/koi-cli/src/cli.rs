use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages, including every spawned command line
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "koi-ctl")]
#[command(about = "koi-ctl - query and control a koi failover cluster")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Client settings file (defaults to ~/.config/koi/client.toml when present)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// koi CLI binary to run (overrides settings)
    #[arg(long, global = true, env = "KOI_BINARY")]
    pub binary: Option<PathBuf>,

    /// Daemon config file to pass to koi; replaces the search list (can be repeated)
    #[arg(short = 'f', long = "config-file", global = true)]
    pub config_files: Vec<PathBuf>,

    /// Seconds to wait for koi before giving up
    #[arg(short = 't', long, global = true)]
    pub timeout: Option<u64>,

    /// Host to connect to instead of the local node
    #[arg(short = 'H', long, global = true)]
    pub host: Option<String>,

    /// Port to connect to
    #[arg(short = 'p', long, global = true)]
    pub port: Option<u16>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cluster status report
    Status {
        /// Print the parsed snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Attributes of the local node
    Local {
        /// Print as JSON, including the relaying nodes
        #[arg(long)]
        json: bool,
    },

    /// Print the UUID of the local node
    LocalUuid,

    /// Attributes of another node
    Node {
        /// Node name or UUID
        node: String,

        #[arg(long)]
        json: bool,
    },

    /// Cluster status formatted as a tree
    Tree,

    /// Promote the given node to master
    Promote {
        /// Node name or UUID
        node: String,
    },

    /// Demote the current master without electing a new one
    Demote,

    /// Elect a new master after a manual demotion
    Elect,

    /// Recover failed nodes
    Recover { node: Option<String> },

    /// List recent failures
    Failures,

    /// Start services on a stopped node
    Start { node: Option<String> },

    /// Demote and stop services on a node
    Stop { node: Option<String> },

    /// Set cluster maintenance mode (on, off, true, false, 1, 0)
    Maintenance { value: String },

    /// Reload the daemon configuration
    Reconfigure { node: Option<String> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "koi-ctl", "recover", "mako", "-f", "/etc/koi/a.conf", "-f", "/etc/koi/b.conf",
            "--timeout", "5",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Recover { node: Some(ref n) } if n == "mako"));
        assert_eq!(cli.config_files.len(), 2);
        assert_eq!(cli.timeout, Some(5));
    }

    #[test]
    fn maintenance_requires_value() {
        assert!(Cli::try_parse_from(["koi-ctl", "maintenance"]).is_err());
    }
}
