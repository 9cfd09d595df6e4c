//! ip_location library: geolocation of IP addresses through a FreeGeoIP-style service
//!
//! This library provides a location node that turns triggers ("resolve my own
//! IP", "resolve this address") into HTTP lookups and decodes each response into
//! per-field string events, a composite location event, or an error event.
//!
//! # Example
//!
//! ```no_run
//! use ip_location::{run_lookup, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     addresses: vec!["8.8.8.8".to_string()],
//!     endpoint: "http://localhost:8080".to_string(),
//!     ..Default::default()
//! };
//!
//! let report = run_lookup(config).await?;
//! println!("{} events, {} failed", report.events.len(), report.failed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod app;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod location;
pub mod transport;

// Re-export public API
pub use config::{Config, FailOn, LogFormat, LogLevel, NodeOptions};
pub use error_handling::{ErrorKind, NodeError, TransportError};
pub use location::{spawn_node, LocationEvent, LocationNode, NodeHandle, Packet, Trigger};
pub use run::{run_lookup, LookupReport};
pub use transport::{HttpResponse, HttpTransport, Transport};

// Internal run module (contains the lookup orchestration)
mod run {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use anyhow::{Context, Result};
    use log::{info, warn};
    use tokio::sync::mpsc;

    use crate::app::{print_error_statistics, print_summary, shutdown_gracefully};
    use crate::config::{Config, FailOn, LOOKUP_TIMEOUT};
    use crate::error_handling::{InitializationError, LookupStats};
    use crate::initialization::init_client;
    use crate::location::{spawn_node, LocationEvent, LocationNode};
    use crate::transport::HttpTransport;

    const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

    /// Results of a lookup run.
    #[derive(Debug, Clone)]
    pub struct LookupReport {
        /// Number of lookups the node accepted
        pub requested: usize,
        /// Number of triggers the node rejected synchronously
        pub rejected: usize,
        /// Every event emitted during the run, in emission order
        pub events: Vec<LocationEvent>,
        /// Number of error events among `events`
        pub failed: usize,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    impl LookupReport {
        /// Process exit code for this report under the given policy.
        ///
        /// `Never` always yields 0; `AnyError` yields 2 when any error event was
        /// emitted or any trigger was rejected.
        pub fn exit_code(&self, fail_on: &FailOn) -> i32 {
            match fail_on {
                FailOn::Never => 0,
                FailOn::AnyError => {
                    if self.failed > 0 || self.rejected > 0 {
                        2
                    } else {
                        0
                    }
                }
            }
        }
    }

    /// Runs one lookup per configured address.
    ///
    /// Resolves the caller's own IP when `config.addresses` is empty. Waits for
    /// every request to complete, bounded by [`LOOKUP_TIMEOUT`]; requests still
    /// pending after that are cancelled and produce no events.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The HTTP client cannot be built
    /// - The node cannot be opened with the configured options
    pub async fn run_lookup(config: Config) -> Result<LookupReport> {
        run_lookup_with_timeout(config, LOOKUP_TIMEOUT).await
    }

    pub(crate) async fn run_lookup_with_timeout(
        config: Config,
        timeout: Duration,
    ) -> Result<LookupReport> {
        let start_time = Instant::now();

        let client = init_client(&config)
            .map_err(InitializationError::from)
            .context("Failed to initialize HTTP client")?;
        let transport = Arc::new(HttpTransport::new(client));

        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let node = LocationNode::open(&config.node_options(), transport, events_tx)
            .context("Failed to open location node")?;
        let (handle, task) = spawn_node(node);

        let mut requested = 0;
        let mut rejected = 0;
        let results = if config.addresses.is_empty() {
            vec![("<self>".to_string(), handle.resolve_self().await)]
        } else {
            let mut results = Vec::with_capacity(config.addresses.len());
            for address in &config.addresses {
                results.push((address.clone(), handle.resolve(address.as_str()).await));
            }
            results
        };
        for (address, result) in results {
            match result {
                Ok(id) => {
                    log::debug!("Lookup of {} issued as request {}", address, id);
                    requested += 1;
                }
                Err(e) => {
                    warn!("Failed to resolve {}: {}", address, e);
                    rejected += 1;
                }
            }
        }

        if tokio::time::timeout(timeout, handle.wait_idle()).await.is_err() {
            warn!(
                "Lookup timed out after {:.1}s with {} requests pending",
                timeout.as_secs_f64(),
                handle.pending()
            );
        }
        shutdown_gracefully(&handle, task, SHUTDOWN_GRACE).await;

        let error_stats = LookupStats::new();
        let mut events = Vec::new();
        while let Ok(event) = events_rx.try_recv() {
            if let LocationEvent::Error(error) = &event {
                error_stats.increment_error(error.kind);
            }
            events.push(event);
        }

        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        let failed = error_stats.total_errors();
        info!("Lookup finished against {}", config.endpoint);
        print_error_statistics(&error_stats);
        print_summary(requested, events.len(), failed, elapsed_seconds);

        Ok(LookupReport {
            requested,
            rejected,
            events,
            failed,
            elapsed_seconds,
        })
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn report(failed: usize, rejected: usize) -> LookupReport {
            LookupReport {
                requested: 1,
                rejected,
                events: Vec::new(),
                failed,
                elapsed_seconds: 0.1,
            }
        }

        #[test]
        fn test_exit_code_policies() {
            assert_eq!(report(3, 1).exit_code(&FailOn::Never), 0);
            assert_eq!(report(0, 0).exit_code(&FailOn::AnyError), 0);
            assert_eq!(report(1, 0).exit_code(&FailOn::AnyError), 2);
            assert_eq!(report(0, 1).exit_code(&FailOn::AnyError), 2);
        }

        #[tokio::test]
        async fn test_run_lookup_rejects_empty_endpoint() {
            let config = Config {
                endpoint: String::new(),
                ..Config::default()
            };
            let err = run_lookup(config).await.unwrap_err();
            assert!(err.to_string().contains("Failed to open location node"));
        }

        #[tokio::test]
        async fn test_run_lookup_unreachable_endpoint_reports_error_event() {
            // Port 9 (discard) is closed on test machines, so the connect is refused
            let config = Config {
                addresses: vec!["8.8.8.8".to_string()],
                endpoint: "http://127.0.0.1:9".to_string(),
                timeout_seconds: 2,
                ..Config::default()
            };
            let report = run_lookup_with_timeout(config, Duration::from_secs(10))
                .await
                .unwrap();
            assert_eq!(report.requested, 1);
            assert_eq!(report.failed, 1);
            assert_eq!(report.events.len(), 1);
            assert!(report.events[0].is_error());
        }
    }
}
