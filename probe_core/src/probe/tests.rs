#[cfg(test)]
mod tests {
    use crate::probe::{
        HealthStatus, NetworkHealthProbe, ProbeCommandBuilder, ProbeError, ProbeOutcome,
        ProbeRequest, ProbeRunner, ProbeMetrics,
    };
    use crate::probe::error::ProbeResult;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Replays a canned outcome and records the arguments it was called with.
    struct ScriptedRunner {
        outcome: Result<ProbeOutcome, String>,
        calls: Arc<AtomicUsize>,
        last_args: Arc<Mutex<Vec<String>>>,
        last_timeout: Arc<Mutex<Option<Duration>>>,
    }

    impl ScriptedRunner {
        fn new(exit_code: i32, stdout: &str) -> Self {
            Self {
                outcome: Ok(ProbeOutcome {
                    exit_code: Some(exit_code),
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                }),
                calls: Arc::new(AtomicUsize::new(0)),
                last_args: Arc::new(Mutex::new(Vec::new())),
                last_timeout: Arc::new(Mutex::new(None)),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                outcome: Err(message.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
                last_args: Arc::new(Mutex::new(Vec::new())),
                last_timeout: Arc::new(Mutex::new(None)),
            }
        }
    }

    #[async_trait::async_trait]
    impl ProbeRunner for ScriptedRunner {
        async fn run(&self, args: &[String], timeout: Duration) -> ProbeResult<ProbeOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_args.lock().unwrap() = args.to_vec();
            *self.last_timeout.lock().unwrap() = Some(timeout);

            match &self.outcome {
                Ok(outcome) => Ok(outcome.clone()),
                Err(message) => Err(ProbeError::Spawn {
                    program: "ping".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, message.clone()),
                }),
            }
        }
    }

    const HEALTHY_OUTPUT: &str = "\
64 bytes from 142.250.74.46: icmp_seq=1 ttl=117 time=20 ms
64 bytes from 142.250.74.46: icmp_seq=2 ttl=117 time=22 ms
64 bytes from 142.250.74.46: icmp_seq=3 ttl=117 time=19 ms
64 bytes from 142.250.74.46: icmp_seq=4 ttl=117 time=21 ms
4 packets transmitted, 4 received, 0% packet loss, time 3004ms
";

    #[tokio::test]
    async fn test_healthy_scenario() {
        let probe = NetworkHealthProbe::new(ProbeCommandBuilder::Posix, ScriptedRunner::new(0, HEALTHY_OUTPUT));
        let verdict = probe.evaluate("google.com", 4).await;

        assert_eq!(verdict.status, HealthStatus::Healthy);
        assert_eq!(verdict.reason, "Stable connection: 20.5 ms, 0% packet loss.");
        assert_eq!(
            verdict.data,
            Some(ProbeMetrics {
                avg_latency_ms: 20.5,
                packet_loss_pct: 0
            })
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_unreachable() {
        let probe = NetworkHealthProbe::new(ProbeCommandBuilder::Posix, ScriptedRunner::new(1, HEALTHY_OUTPUT));
        let verdict = probe.evaluate("google.com", 4).await;

        assert_eq!(verdict.status, HealthStatus::Critical);
        assert_eq!(verdict.reason, "Network unreachable.");
        assert!(verdict.data.is_none());

        let json = serde_json::to_value(&verdict).unwrap();
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn test_total_loss_scenario() {
        let output = "4 packets transmitted, 0 received, 100% packet loss, time 3071ms\n";
        let probe = NetworkHealthProbe::new(ProbeCommandBuilder::Posix, ScriptedRunner::new(0, output));
        let verdict = probe.evaluate("google.com", 4).await;

        assert_eq!(verdict.status, HealthStatus::Critical);
        assert_eq!(verdict.reason, "No response from host.");
        assert_eq!(
            verdict.data,
            Some(ProbeMetrics {
                avg_latency_ms: 9999.0,
                packet_loss_pct: 100
            })
        );
    }

    #[tokio::test]
    async fn test_unparseable_output_is_total_loss() {
        let probe = NetworkHealthProbe::new(ProbeCommandBuilder::Posix, ScriptedRunner::new(0, "garbage"));
        let verdict = probe.evaluate("google.com", 4).await;

        assert_eq!(verdict.status, HealthStatus::Critical);
        assert_eq!(verdict.reason, "No response from host.");
    }

    #[tokio::test]
    async fn test_zero_loss_without_samples_is_high_latency() {
        let output = "4 packets transmitted, 4 received, 0% packet loss, time 3004ms\n";
        let probe = NetworkHealthProbe::new(ProbeCommandBuilder::Posix, ScriptedRunner::new(0, output));
        let verdict = probe.evaluate("google.com", 4).await;

        assert_eq!(verdict.status, HealthStatus::Critical);
        assert_eq!(verdict.reason, "High latency: 9999.0 ms, 0% packet loss.");
        assert_eq!(
            verdict.data,
            Some(ProbeMetrics {
                avg_latency_ms: 9999.0,
                packet_loss_pct: 0
            })
        );
    }

    #[tokio::test]
    async fn test_windows_output_warning() {
        let output = "\
    Packets: Sent = 4, Received = 3, Lost = 1 (25% loss),
    Minimum = 40ms, Maximum = 60ms, Average = 50ms
";
        let probe = NetworkHealthProbe::new(ProbeCommandBuilder::Windows, ScriptedRunner::new(0, output));
        let verdict = probe.evaluate("google.com", 4).await;

        assert_eq!(verdict.status, HealthStatus::Warning);
        assert_eq!(verdict.reason, "Moderate latency: 50.0 ms, 25% packet loss.");
    }

    #[tokio::test]
    async fn test_spawn_failure_becomes_error_verdict() {
        let probe = NetworkHealthProbe::new(ProbeCommandBuilder::Posix, ScriptedRunner::failing("no such file"));
        let verdict = probe.evaluate("google.com", 4).await;

        assert_eq!(verdict.status, HealthStatus::Critical);
        assert_eq!(verdict.reason, "Error: failed to launch `ping`: no such file");
        assert!(verdict.data.is_none());
    }

    #[tokio::test]
    async fn test_timeout_becomes_error_verdict() {
        struct HangingRunner;

        #[async_trait::async_trait]
        impl ProbeRunner for HangingRunner {
            async fn run(&self, _args: &[String], timeout: Duration) -> ProbeResult<ProbeOutcome> {
                Err(ProbeError::Timeout(timeout))
            }
        }

        let probe = NetworkHealthProbe::new(ProbeCommandBuilder::Posix, HangingRunner);
        let verdict = probe.evaluate("google.com", 4).await;

        assert_eq!(verdict.status, HealthStatus::Critical);
        assert_eq!(verdict.reason, "Error: probe timed out after 30s");
    }

    #[tokio::test]
    async fn test_passes_platform_arguments() {
        let runner = ScriptedRunner::new(0, HEALTHY_OUTPUT);
        let last_args = runner.last_args.clone();

        let probe = NetworkHealthProbe::new(ProbeCommandBuilder::Windows, runner);
        probe.evaluate("example.org", 7).await;

        assert_eq!(*last_args.lock().unwrap(), vec!["-n", "7", "example.org"]);
    }

    #[tokio::test]
    async fn test_timeout_grows_with_packet_count() {
        let runner = ScriptedRunner::new(0, HEALTHY_OUTPUT);
        let last_timeout = runner.last_timeout.clone();
        let probe = NetworkHealthProbe::new(ProbeCommandBuilder::Posix, runner)
            .with_timeout(Duration::from_secs(30));

        probe.evaluate("google.com", 4).await;
        assert_eq!(*last_timeout.lock().unwrap(), Some(Duration::from_secs(30)));

        probe.evaluate("google.com", 40).await;
        let allowed = last_timeout.lock().unwrap().unwrap();
        assert!(allowed >= Duration::from_secs(50), "only {:?} for 40 packets", allowed);
        assert_eq!(probe.timeout_for(40), allowed);
    }

    #[tokio::test]
    async fn test_invalid_request_never_runs_probe() {
        let runner = ScriptedRunner::new(0, HEALTHY_OUTPUT);
        let calls = runner.calls.clone();
        let probe = NetworkHealthProbe::new(ProbeCommandBuilder::Posix, runner);

        let verdict = probe.evaluate("google.com", 0).await;
        assert_eq!(verdict.status, HealthStatus::Critical);
        assert_eq!(verdict.reason, "Error: invalid probe request: packet count must be greater than 0");

        let verdict = probe.evaluate("-f", 4).await;
        assert_eq!(verdict.status, HealthStatus::Critical);
        assert!(verdict.reason.starts_with("Error: invalid probe request"));

        let verdict = probe.evaluate("", 4).await;
        assert_eq!(verdict.status, HealthStatus::Critical);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_idempotent_for_identical_output() {
        let probe = NetworkHealthProbe::new(ProbeCommandBuilder::Posix, ScriptedRunner::new(0, HEALTHY_OUTPUT));

        let first = probe.evaluate("google.com", 4).await;
        let second = probe.evaluate("google.com", 4).await;

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_concurrent_evaluations() {
        let probe = NetworkHealthProbe::new(ProbeCommandBuilder::Posix, ScriptedRunner::new(0, HEALTHY_OUTPUT));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let probe = probe.clone();
                tokio::spawn(async move { probe.evaluate("google.com", 4).await })
            })
            .collect();

        for handle in handles {
            let verdict = handle.await.unwrap();
            assert_eq!(verdict.status, HealthStatus::Healthy);
        }
    }

    #[test]
    fn test_request_defaults() {
        let request = ProbeRequest::default();
        assert_eq!(request.host, "google.com");
        assert_eq!(request.packet_count, 4);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_validation() {
        assert!(ProbeRequest::new("10.0.0.1", 1).validate().is_ok());
        assert!(ProbeRequest::new("host name", 4).validate().is_err());
        assert!(ProbeRequest::new("--help", 4).validate().is_err());
        assert!(ProbeRequest::new("google.com", 0).validate().is_err());
    }
}
