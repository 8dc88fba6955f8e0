//! The probe pipeline: invoke, parse, aggregate, classify

use super::command::ProbeCommandBuilder;
use super::error::{ProbeError, ProbeResult};
use super::parser::parse_probe_output;
use super::runner::{ProbeRunner, SystemProbeRunner};
use super::verdict::{average_latency, classify, HealthStatus, HealthVerdict, ProbeMetrics};
use crate::config::ProbeConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRequest {
    pub host: String,
    pub packet_count: u32,
}

impl ProbeRequest {
    pub fn new(host: impl Into<String>, packet_count: u32) -> Self {
        Self {
            host: host.into(),
            packet_count,
        }
    }

    /// Rejects values the probe tool would misread, such as a host that looks like a flag.
    pub fn validate(&self) -> ProbeResult<()> {
        if self.packet_count == 0 {
            return Err(ProbeError::InvalidRequest(
                "packet count must be greater than 0".to_string(),
            ));
        }

        if self.host.is_empty() {
            return Err(ProbeError::InvalidRequest("host cannot be empty".to_string()));
        }

        if self.host.starts_with('-') || self.host.chars().any(char::is_whitespace) {
            return Err(ProbeError::InvalidRequest(format!(
                "host '{}' is not a valid target",
                self.host
            )));
        }

        Ok(())
    }
}

impl Default for ProbeRequest {
    fn default() -> Self {
        Self::new("google.com", 4)
    }
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `ping` sends one packet per second and may linger this long for the last reply.
const REPLY_GRACE: Duration = Duration::from_secs(10);

/// Probes a host and classifies the connection quality.
///
/// Holds no per-request state, so one instance is shared by every request.
#[derive(Clone)]
pub struct NetworkHealthProbe {
    platform: ProbeCommandBuilder,
    runner: Arc<dyn ProbeRunner + Send + Sync>,
    timeout: Duration,
}

impl NetworkHealthProbe {
    pub fn new<R>(platform: ProbeCommandBuilder, runner: R) -> Self
    where
        R: ProbeRunner + Send + Sync + 'static,
    {
        Self {
            platform,
            runner: Arc::new(runner),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(ProbeCommandBuilder::detect(), SystemProbeRunner::new(config.command.clone()))
            .with_timeout(Duration::from_secs(config.timeout_seconds))
    }

    /// Minimum time a probe round may take before it is abandoned.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn platform(&self) -> ProbeCommandBuilder {
        self.platform
    }

    /// Time allowed for a round of `packet_count` packets: the configured
    /// minimum, or one second per packet plus [`REPLY_GRACE`] when that is longer.
    pub fn timeout_for(&self, packet_count: u32) -> Duration {
        let round = Duration::from_secs(u64::from(packet_count)) + REPLY_GRACE;
        self.timeout.max(round)
    }

    /// Runs one probe round. Never fails: every error becomes a critical verdict.
    pub async fn evaluate(&self, host: &str, packet_count: u32) -> HealthVerdict {
        let request = ProbeRequest::new(host, packet_count);
        let start = Instant::now();

        let verdict = match self.try_evaluate(&request).await {
            Ok(verdict) => verdict,
            Err(e) => {
                error!("Probe of '{}' failed: {}", request.host, e);
                HealthVerdict::from_error(&e)
            }
        };

        let elapsed = start.elapsed();
        match verdict.status {
            HealthStatus::Healthy => {
                info!("Probe of '{}' finished in {:?}: {}", request.host, elapsed, verdict.reason);
            }
            HealthStatus::Warning => {
                warn!("Probe of '{}' degraded in {:?}: {}", request.host, elapsed, verdict.reason);
            }
            HealthStatus::Critical => {
                error!("Probe of '{}' critical in {:?}: {}", request.host, elapsed, verdict.reason);
            }
        }

        verdict
    }

    pub async fn try_evaluate(&self, request: &ProbeRequest) -> ProbeResult<HealthVerdict> {
        request.validate()?;

        let args = self.platform.args(&request.host, request.packet_count);
        let outcome = self
            .runner
            .run(&args, self.timeout_for(request.packet_count))
            .await?;

        if !outcome.success() {
            return Ok(HealthVerdict::unreachable());
        }

        let parsed = parse_probe_output(&outcome.stdout, self.platform)?;
        let avg_latency_ms = average_latency(&parsed.latency_samples)?;

        Ok(classify(ProbeMetrics {
            avg_latency_ms,
            packet_loss_pct: parsed.packet_loss_pct,
        }))
    }
}

impl std::fmt::Debug for NetworkHealthProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkHealthProbe")
            .field("platform", &self.platform)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
