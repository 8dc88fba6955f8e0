//! Execution of the external probe process

use super::error::{ProbeError, ProbeResult};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Raw result of one probe execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProbeOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[async_trait::async_trait]
pub trait ProbeRunner {
    /// Runs one probe with `args`, giving up once `timeout` has elapsed.
    async fn run(&self, args: &[String], timeout: Duration) -> ProbeResult<ProbeOutcome>;
}

/// Runs the system ICMP echo utility as a child process.
#[derive(Debug, Clone)]
pub struct SystemProbeRunner {
    program: String,
}

impl SystemProbeRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemProbeRunner {
    fn default() -> Self {
        Self::new("ping")
    }
}

#[async_trait::async_trait]
impl ProbeRunner for SystemProbeRunner {
    async fn run(&self, args: &[String], timeout: Duration) -> ProbeResult<ProbeOutcome> {
        debug!("Running {} {}", self.program, args.join(" "));

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProbeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Dropping the wait future on timeout kills the child.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| ProbeError::Spawn {
                program: self.program.clone(),
                source,
            })?,
            Err(_) => return Err(ProbeError::Timeout(timeout)),
        };

        let outcome = ProbeOutcome {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !outcome.stderr.is_empty() {
            debug!("{} stderr: {}", self.program, outcome.stderr.trim_end());
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_success() {
        let mut outcome = ProbeOutcome {
            exit_code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(outcome.success());

        outcome.exit_code = Some(1);
        assert!(!outcome.success());

        outcome.exit_code = None;
        assert!(!outcome.success());
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let runner = SystemProbeRunner::new("definitely-not-a-real-ping-binary");
        let args = ["-c".to_string(), "1".to_string(), "localhost".to_string()];
        let err = runner.run(&args, Duration::from_secs(1)).await.unwrap_err();

        match err {
            ProbeError::Spawn { program, .. } => assert_eq!(program, "definitely-not-a-real-ping-binary"),
            other => panic!("expected spawn error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_output_and_exit_code() {
        let runner = SystemProbeRunner::new("sh");
        let args = vec!["-c".to_string(), "echo '0% packet loss'; echo oops >&2; exit 3".to_string()];
        let outcome = runner.run(&args, Duration::from_secs(5)).await.unwrap();

        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.stdout, "0% packet loss\n");
        assert_eq!(outcome.stderr, "oops\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout() {
        let runner = SystemProbeRunner::new("sleep");
        let err = runner.run(&["5".to_string()], Duration::from_millis(100)).await.unwrap_err();
        assert!(matches!(err, ProbeError::Timeout(_)));
    }
}
