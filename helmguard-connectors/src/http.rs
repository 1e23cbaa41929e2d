//! HTTP Reporter - Collector Uplink over Plain POST
//!
//! ## Overview
//!
//! One POST per report against a fixed collector endpoint. HTTP was
//! chosen for the same reasons it usually is on station networks:
//! universal firewall compatibility, trivial server-side ingestion,
//! and painless debugging with ordinary web tooling.
//!
//! ## Implementation Choices
//!
//! Deliberately minimal:
//! - single-shot sends; a failure drops the report and the next
//!   scheduled transmission carries newer data
//! - short default timeout so a dead collector cannot starve the
//!   sampling cadence
//! - the device credential rides in the record body, matching the
//!   collector's exact-match check
//! - connection reuse comes free from the agent's keep-alive pool
//!
//! Emergency reports add a priority header so the collector can
//! fast-path them ahead of routine ingestion.
//!
//! ## Example Usage
//!
//! ```no_run
//! use helmguard_connectors::http::{HttpReporter, HttpReporterConfig};
//! use helmguard_core::Snapshot;
//!
//! # fn example() -> Result<(), helmguard_connectors::ReporterError> {
//! let config = HttpReporterConfig::new("https://collector.example.com/api/readings")
//!     .device_id("helmet-014")
//!     .api_key("station-7-shared-secret");
//!
//! let mut reporter = HttpReporter::new(config)?;
//! let status = reporter.send_snapshot(&Snapshot::new(0), false)?;
//! assert_eq!(status, 200);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use helmguard_core::{ReportSink, Snapshot};

use crate::record::TelemetryRecord;
use crate::{ReporterError, ReporterStats};

/// Header marking priority transmissions for the collector
const PRIORITY_HEADER: &str = "X-Priority";
/// Priority header value on emergency reports
const PRIORITY_VALUE: &str = "emergency";

/// HTTP reporter configuration
#[derive(Clone)]
pub struct HttpReporterConfig {
    /// Full collector endpoint URL
    pub endpoint_url: String,
    /// Device identifier stamped into every record
    pub device_id: String,
    /// Shared-secret credential stamped into every record
    pub api_key: String,
    /// Request timeout; keep short, a stalled send blocks the loop
    pub timeout: Duration,
    /// Custom headers
    pub headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl HttpReporterConfig {
    /// Create new configuration against a collector endpoint
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            device_id: "helmet-001".into(),
            api_key: String::new(),
            timeout: Duration::from_secs(3),
            headers: HashMap::new(),
            user_agent: format!("HelmGuard/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the device identifier
    pub fn device_id(mut self, id: impl Into<String>) -> Self {
        self.device_id = id.into();
        self
    }

    /// Set the shared-secret credential
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Add custom header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Collector uplink using the lightweight ureq client
pub struct HttpReporter {
    config: HttpReporterConfig,
    agent: ureq::Agent,
    stats: ReporterStats,
    reachable: bool,
}

impl HttpReporter {
    /// Create new reporter; validates the endpoint URL
    pub fn new(config: HttpReporterConfig) -> Result<Self, ReporterError> {
        if !config.endpoint_url.starts_with("http://")
            && !config.endpoint_url.starts_with("https://")
        {
            return Err(ReporterError::Config(
                "Endpoint URL must start with http:// or https://".into(),
            ));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            config,
            agent,
            stats: ReporterStats::default(),
            reachable: true,
        })
    }

    /// Flatten and POST one snapshot; returns the collector's status
    /// code on success
    ///
    /// Any failure drops the report. There is no retry; the next
    /// scheduled transmission sends fresher data instead.
    pub fn send_snapshot(
        &mut self,
        snapshot: &Snapshot,
        emergency: bool,
    ) -> Result<u16, ReporterError> {
        let record = TelemetryRecord::from_snapshot(
            &self.config.device_id,
            &self.config.api_key,
            snapshot,
            emergency,
            Utc::now(),
        );
        let json = serde_json::to_string(&record)
            .map_err(|e| ReporterError::Serialization(e.to_string()))?;

        let mut request = self
            .agent
            .post(&self.config.endpoint_url)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json");

        for (name, value) in &self.config.headers {
            request = request.set(name, value);
        }

        if emergency {
            request = request.set(PRIORITY_HEADER, PRIORITY_VALUE);
        }

        match request.send_string(&json) {
            Ok(resp) => {
                self.reachable = true;
                self.stats.messages_sent += 1;
                self.stats.bytes_sent += json.len() as u64;
                Ok(resp.status())
            }
            Err(ureq::Error::Status(code, resp)) => {
                // A status response means the collector is reachable,
                // it just refused the record.
                self.reachable = true;
                let message = resp.into_string().unwrap_or_default();
                let err = if code == 401 || code == 403 {
                    ReporterError::Auth(message)
                } else {
                    ReporterError::Server {
                        status: code,
                        message,
                    }
                };
                self.drop_report(&err);
                Err(err)
            }
            Err(ureq::Error::Transport(e)) => {
                self.reachable = false;
                let err = ReporterError::Transport(e.to_string());
                self.drop_report(&err);
                Err(err)
            }
        }
    }

    /// Delivery counters
    pub fn stats(&self) -> &ReporterStats {
        &self.stats
    }

    fn drop_report(&mut self, err: &ReporterError) {
        self.stats.messages_dropped += 1;
        self.stats.last_error = Some(err.to_string());
    }
}

impl ReportSink for HttpReporter {
    type Error = ReporterError;

    fn send(&mut self, snapshot: &Snapshot, emergency: bool) -> Result<(), Self::Error> {
        self.send_snapshot(snapshot, emergency).map(|_| ())
    }

    fn is_connected(&self) -> bool {
        self.reachable
    }
}
