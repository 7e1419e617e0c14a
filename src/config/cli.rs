//! Command-line options.
//!
//! Global flags map one-to-one onto [`Config`]; each also reads an
//! environment variable so deployments can configure the binary through
//! `.env`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::{
    DB_PATH, DEFAULT_PAGE_SIZE, DEFAULT_SERVER_PORT, DEFAULT_USER_AGENT, MAX_REDIRECT_HOPS,
    PER_HOP_TIMEOUT_SECS,
};
use crate::config::types::{Config, LogFormat, LogLevel};

/// Unwraps campaign call-to-action links to their final destinations.
#[derive(Debug, Parser)]
#[command(name = "rip_unwrap", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Log level
    #[arg(long, value_enum, default_value = "info", env = "RIP_LOG_LEVEL", global = true)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain", env = "RIP_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// SQLite database file
    #[arg(long, default_value = DB_PATH, env = "RIP_DB_PATH", global = true)]
    pub db_path: PathBuf,

    /// Per-hop request timeout in seconds
    #[arg(long, default_value_t = PER_HOP_TIMEOUT_SECS, env = "RIP_TIMEOUT_SECONDS", global = true)]
    pub timeout_seconds: u64,

    /// Maximum number of hops followed per link
    #[arg(long, default_value_t = MAX_REDIRECT_HOPS, env = "RIP_MAX_REDIRECTS", global = true)]
    pub max_redirects: usize,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT, env = "RIP_USER_AGENT", global = true)]
    pub user_agent: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the HTTP API
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = DEFAULT_SERVER_PORT, env = "RIP_PORT")]
        port: u16,
    },
    /// Run one unwrap batch (or all of them with --all)
    Batch {
        /// Records per content type
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,

        /// Resume after this campaign id
        #[arg(long)]
        last_email_id: Option<String>,

        /// Resume after this SMS id
        #[arg(long)]
        last_sms_id: Option<String>,

        /// Keep running batches until no page is full
        #[arg(long)]
        all: bool,
    },
    /// Resolve one URL and print its redirect trace
    TestUrl {
        /// URL to resolve
        url: String,
    },
    /// Unwrap every link of one record (campaign id, SMS id or share token)
    UnwrapRecord {
        /// Record identifier
        id: String,
    },
}

impl Cli {
    /// Builds the library configuration from global flags and subcommand
    /// options that overlap with it.
    pub fn to_config(&self) -> Config {
        let mut config = Config {
            log_level: self.global.log_level.clone(),
            log_format: self.global.log_format.clone(),
            db_path: self.global.db_path.clone(),
            timeout_seconds: self.global.timeout_seconds,
            max_redirects: self.global.max_redirects,
            user_agent: self.global.user_agent.clone(),
            ..Default::default()
        };
        match &self.command {
            Command::Serve { port } => config.port = *port,
            Command::Batch { page_size, .. } => config.page_size = *page_size,
            Command::TestUrl { .. } | Command::UnwrapRecord { .. } => {}
        }
        config
    }
}
