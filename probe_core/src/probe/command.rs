//! Platform-specific command lines for the system `ping` utility

use serde::{Deserialize, Serialize};
use std::fmt;

/// Argument convention of the ICMP echo utility on the running platform.
///
/// Windows `ping` takes the packet count as `-n`, every POSIX flavour takes
/// it as `-c`. The two also report their results differently, so the same
/// value selects the output patterns in [`crate::probe::parser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeCommandBuilder {
    Posix,
    Windows,
}

impl ProbeCommandBuilder {
    /// Resolves the convention of the platform this binary was built for.
    pub fn detect() -> Self {
        if cfg!(windows) {
            ProbeCommandBuilder::Windows
        } else {
            ProbeCommandBuilder::Posix
        }
    }

    pub fn count_flag(&self) -> &'static str {
        match self {
            ProbeCommandBuilder::Posix => "-c",
            ProbeCommandBuilder::Windows => "-n",
        }
    }

    /// Arguments in the order `[count-flag, packet_count, host]`.
    pub fn args(&self, host: &str, packet_count: u32) -> Vec<String> {
        vec![
            self.count_flag().to_string(),
            packet_count.to_string(),
            host.to_string(),
        ]
    }
}

impl Default for ProbeCommandBuilder {
    fn default() -> Self {
        Self::detect()
    }
}

impl fmt::Display for ProbeCommandBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeCommandBuilder::Posix => write!(f, "posix"),
            ProbeCommandBuilder::Windows => write!(f, "windows"),
        }
    }
}
