//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing,
//! node options and library configuration.

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_ENDPOINT, DEFAULT_MAX_PENDING_REQUESTS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    NODE_OPTIONS_API_VERSION,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages and printed events are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Exit code policy for the CLI.
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    /// Always exit with 0 once the lookup ran
    Never,
    /// Exit with 2 when any error event was emitted
    AnyError,
}

/// Options a location node is opened with.
///
/// `api_version` must match [`NODE_OPTIONS_API_VERSION`]; it guards against
/// options built for a different layout of this struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOptions {
    /// Layout version of these options
    pub api_version: u16,
    /// Base URL of the geolocation service (e.g. `http://freegeoip.net`)
    pub endpoint: String,
    /// Maximum number of requests that may be pending at once
    pub max_pending: usize,
}

impl NodeOptions {
    /// Creates options for the current API version with the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            api_version: NODE_OPTIONS_API_VERSION,
            endpoint: endpoint.into(),
            max_pending: DEFAULT_MAX_PENDING_REQUESTS,
        }
    }
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

/// Library configuration, also parsed from the command line.
///
/// # Examples
///
/// ```bash
/// # Resolve the caller's own IP
/// ip_location
///
/// # Resolve explicit addresses against a custom endpoint
/// ip_location 8.8.8.8 example.com --endpoint http://localhost:8080
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ip_location",
    about = "Resolves the geographic location of IP addresses or hosts."
)]
pub struct Config {
    /// Addresses (IPs or host names) to resolve; resolves the caller's own IP when empty
    #[arg(value_name = "ADDRESS")]
    pub addresses: Vec<String>,

    /// Base URL of the geolocation service
    #[arg(long, env = "IP_LOCATION_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Maximum number of requests pending at once
    #[arg(long, default_value_t = DEFAULT_MAX_PENDING_REQUESTS)]
    pub max_pending: usize,

    /// Exit code policy: never|any-error
    #[arg(long, value_enum, default_value_t = FailOn::Never)]
    pub fail_on: FailOn,
}

impl Config {
    /// Builds the node options described by this configuration.
    pub fn node_options(&self) -> NodeOptions {
        NodeOptions {
            api_version: NODE_OPTIONS_API_VERSION,
            endpoint: self.endpoint.clone(),
            max_pending: self.max_pending,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addresses: Vec::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_pending: DEFAULT_MAX_PENDING_REQUESTS,
            fail_on: FailOn::Never,
        }
    }
}
