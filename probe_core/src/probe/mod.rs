//! ICMP reachability probing and connection-quality classification

pub mod command;
pub mod error;
pub mod parser;
pub mod runner;
pub mod service;
pub mod verdict;

#[cfg(test)]
mod tests;

pub use command::ProbeCommandBuilder;
pub use error::ProbeError;
pub use parser::{parse_probe_output, ParsedProbeOutput};
pub use runner::{ProbeOutcome, ProbeRunner, SystemProbeRunner};
pub use service::{NetworkHealthProbe, ProbeRequest};
pub use verdict::{average_latency, classify, HealthStatus, HealthVerdict, ProbeMetrics};
