//! Configuration constants.
//!
//! This module defines the constants used throughout the application, including
//! the default geolocation endpoint, request limits and timeouts.

use std::time::Duration;

/// Default base URL of the geolocation service.
///
/// The node appends `/json/<address>` to this value to form the request URL.
/// Can be overridden with `--endpoint` or the `IP_LOCATION_ENDPOINT` environment
/// variable.
pub const DEFAULT_ENDPOINT: &str = "http://freegeoip.net";

/// Human-readable name of the remote service, used in error event messages.
pub const SERVICE_NAME: &str = "FreeGeoIP";

/// Path segment placed between the endpoint and the queried address.
pub const QUERY_PATH_SEGMENT: &str = "json";

/// Maximum length in bytes of a composed query URL.
///
/// Matches the bounded buffer (`PATH_MAX`) the URL is traditionally built into.
/// Longer URLs are rejected before any request is issued.
pub const MAX_QUERY_URL_LENGTH: usize = 4096;

/// Version of the `NodeOptions` layout understood by this build.
///
/// Options carrying any other version are rejected at `open`.
pub const NODE_OPTIONS_API_VERSION: u16 = 1;

/// Default upper bound on simultaneously pending requests per node.
///
/// Registering a request beyond this bound fails with `ResourceExhausted`.
pub const DEFAULT_MAX_PENDING_REQUESTS: usize = 1024;

/// Capacity of the queue carrying triggers into a spawned node
pub const NODE_COMMAND_QUEUE_SIZE: usize = 64;

// Network operation timeouts
/// Per-request HTTP timeout in seconds (applied by the transport, not the node)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// Upper bound for a whole lookup run before pending requests are cancelled
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent string for HTTP requests.
pub const DEFAULT_USER_AGENT: &str = concat!("ip_location/", env!("CARGO_PKG_VERSION"));

/// HTTP status code the service answers with on success.
pub const HTTP_STATUS_OK: u16 = 200;

/// errno-style code carried by every outbound error event (`EINVAL`).
pub const ERROR_EVENT_CODE: i32 = 22;
