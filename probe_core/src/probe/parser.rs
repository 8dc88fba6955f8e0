//! Text parsing of `ping` transcripts
//!
//! Parsing is a pure function of the captured stdout and the platform
//! convention, so it can be exercised against recorded transcripts without
//! spawning anything.

use super::command::ProbeCommandBuilder;
use super::error::{ProbeError, ProbeResult};
use lazy_static::lazy_static;
use regex::Regex;

/// Loss assumed when no loss summary line is present.
pub const LOSS_WHEN_MISSING: u8 = 100;

/// Stand-in sample used when no round-trip time could be read.
pub const SENTINEL_LATENCY_MS: f64 = 9999.0;

lazy_static! {
    static ref POSIX_LOSS: Regex = Regex::new(r"(\d+)(?:\.\d+)?% packet loss").unwrap();
    static ref POSIX_LATENCY: Regex = Regex::new(r"time=(\d+\.?\d*) ms").unwrap();
    static ref WINDOWS_LOSS: Regex = Regex::new(r"(\d+)% loss").unwrap();
    static ref WINDOWS_LATENCY: Regex = Regex::new(r"Average = (\d+)ms").unwrap();
}

/// Loss and latency figures read from one probe transcript, defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedProbeOutput {
    /// Always within `0..=100`.
    pub packet_loss_pct: u8,
    /// Never empty: holds a single [`SENTINEL_LATENCY_MS`] when nothing parsed.
    pub latency_samples: Vec<f64>,
}

pub fn parse_probe_output(text: &str, platform: ProbeCommandBuilder) -> ProbeResult<ParsedProbeOutput> {
    let (loss_pattern, latency_pattern) = match platform {
        ProbeCommandBuilder::Posix => (&*POSIX_LOSS, &*POSIX_LATENCY),
        ProbeCommandBuilder::Windows => (&*WINDOWS_LOSS, &*WINDOWS_LATENCY),
    };

    let packet_loss_pct = match loss_pattern.captures(text) {
        Some(caps) => {
            let token = &caps[1];
            let value: u32 = token.parse().map_err(|_| ProbeError::MalformedToken {
                what: "packet loss",
                token: token.to_string(),
            })?;
            value.min(100) as u8
        }
        None => LOSS_WHEN_MISSING,
    };

    let mut latency_samples = latency_pattern
        .captures_iter(text)
        .map(|caps| {
            let token = &caps[1];
            token.parse::<f64>().map_err(|_| ProbeError::MalformedToken {
                what: "latency",
                token: token.to_string(),
            })
        })
        .collect::<ProbeResult<Vec<f64>>>()?;

    if latency_samples.is_empty() {
        latency_samples.push(SENTINEL_LATENCY_MS);
    }

    Ok(ParsedProbeOutput {
        packet_loss_pct,
        latency_samples,
    })
}
