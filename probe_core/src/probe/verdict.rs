//! Latency aggregation and health tier classification

use super::error::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};

pub const UNREACHABLE_REASON: &str = "Network unreachable.";
pub const NO_RESPONSE_REASON: &str = "No response from host.";

const CRITICAL_LOSS_PCT: u8 = 50;
const CRITICAL_LATENCY_MS: f64 = 500.0;
const WARNING_LOSS_PCT: u8 = 10;
const WARNING_LATENCY_MS: f64 = 200.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Warning => write!(f, "warning"),
            HealthStatus::Critical => write!(f, "critical"),
        }
    }
}

/// Aggregate figures of one probe round. Both numbers always travel together.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProbeMetrics {
    pub avg_latency_ms: f64,
    pub packet_loss_pct: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthVerdict {
    pub status: HealthStatus,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ProbeMetrics>,
}

impl HealthVerdict {
    pub fn healthy(reason: String, metrics: ProbeMetrics) -> Self {
        Self {
            status: HealthStatus::Healthy,
            reason,
            data: Some(metrics),
        }
    }

    pub fn warning(reason: String, metrics: ProbeMetrics) -> Self {
        Self {
            status: HealthStatus::Warning,
            reason,
            data: Some(metrics),
        }
    }

    pub fn critical(reason: String) -> Self {
        Self {
            status: HealthStatus::Critical,
            reason,
            data: None,
        }
    }

    pub fn unreachable() -> Self {
        Self::critical(UNREACHABLE_REASON.to_string())
    }

    pub fn from_error(err: &ProbeError) -> Self {
        Self::critical(format!("Error: {}", err))
    }

    pub fn with_data(mut self, metrics: ProbeMetrics) -> Self {
        self.data = Some(metrics);
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Arithmetic mean of the latency samples.
pub fn average_latency(samples: &[f64]) -> ProbeResult<f64> {
    if samples.is_empty() {
        return Err(ProbeError::NoSamples);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Maps aggregate figures to a verdict. Rules are checked in order, first match wins.
pub fn classify(metrics: ProbeMetrics) -> HealthVerdict {
    let ProbeMetrics {
        avg_latency_ms: avg,
        packet_loss_pct: loss,
    } = metrics;
    let figures = format!("{} ms, {}% packet loss.", format_latency(avg), loss);

    if loss == 100 {
        HealthVerdict::critical(NO_RESPONSE_REASON.to_string()).with_data(metrics)
    } else if loss > CRITICAL_LOSS_PCT || avg > CRITICAL_LATENCY_MS {
        HealthVerdict::critical(format!("High latency: {}", figures)).with_data(metrics)
    } else if loss > WARNING_LOSS_PCT || avg > WARNING_LATENCY_MS {
        HealthVerdict::warning(format!("Moderate latency: {}", figures), metrics)
    } else {
        HealthVerdict::healthy(format!("Stable connection: {}", figures), metrics)
    }
}

/// Whole values keep one decimal (`20.0`), others print their shortest form (`20.5`).
pub fn format_latency(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
