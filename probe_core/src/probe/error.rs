//! Errors raised by the individual probe stages

use std::time::Duration;
use thiserror::Error;

pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// Failure of one stage of the probe pipeline.
///
/// The `Display` text is surfaced verbatim in the verdict reason, after the
/// `Error: ` prefix.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("invalid probe request: {0}")]
    InvalidRequest(String),

    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("probe timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("could not read {what} from `{token}`")]
    MalformedToken { what: &'static str, token: String },

    #[error("no latency samples to aggregate")]
    NoSamples,
}
