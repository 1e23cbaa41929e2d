//! Telemetry Uplink for HelmGuard
//!
//! ## Overview
//!
//! This crate carries snapshots off the helmet and into the incident
//! collector. The collector is a plain HTTP endpoint accepting one flat
//! JSON record per report; this crate owns the record layout and the
//! transport.
//!
//! ## Delivery Policy
//!
//! Reports are best effort, end to end:
//!
//! - one POST per report, no retry, no backoff
//! - a failed send is counted and dropped; the next scheduled report
//!   carries the fresher snapshot anyway
//! - no local queue or buffering; a stale record is worth less than
//!   the sampling cadence it would cost to deliver
//!
//! Emergency reports use the same record with an added `emergency`
//! field and a priority header so the collector can fast-path them.
//! Their failure handling is identical.
//!
//! ## Example Usage
//!
//! ```no_run
//! use helmguard_connectors::{HttpReporter, HttpReporterConfig};
//! use helmguard_core::Snapshot;
//!
//! # fn example() -> Result<(), helmguard_connectors::ReporterError> {
//! let config = HttpReporterConfig::new("https://collector.example.com/api/readings")
//!     .device_id("helmet-014")
//!     .api_key("station-7-shared-secret")
//!     .timeout_secs(3);
//!
//! let mut reporter = HttpReporter::new(config)?;
//!
//! let snapshot = Snapshot::new(0);
//! reporter.send_snapshot(&snapshot, false)?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "http")]
pub mod http;

pub mod record;

#[cfg(feature = "http")]
pub use http::{HttpReporter, HttpReporterConfig};
pub use record::TelemetryRecord;

use thiserror::Error;

/// Uplink errors
#[derive(Debug, Error)]
pub enum ReporterError {
    /// Invalid reporter configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Collector rejected the device credential
    #[error("Authentication rejected: {0}")]
    Auth(String),

    /// Collector answered with a non-success status
    #[error("Server error {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body, when one was readable
        message: String,
    },

    /// Request never reached the collector
    #[error("Request failed: {0}")]
    Transport(String),

    /// Record could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Delivery counters kept by a reporter
#[derive(Debug, Default, Clone)]
pub struct ReporterStats {
    /// Reports accepted by the collector
    pub messages_sent: u64,
    /// Reports dropped after a failed send
    pub messages_dropped: u64,
    /// Payload bytes delivered
    pub bytes_sent: u64,
    /// Last failure, if any
    pub last_error: Option<String>,
}
