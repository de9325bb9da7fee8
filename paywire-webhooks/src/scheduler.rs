//! Attempt loop with exponential backoff

use crate::{DeliveryTask, RetryPolicy, ShutdownSignal, WebhookPayload, WebhookTransport};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Drives delivery tasks through their attempts.
///
/// Each task runs on its own tokio task; a backoff wait only suspends that
/// task. Cloning shares the transport and the shutdown signal.
#[derive(Clone)]
pub struct RetryScheduler {
    transport: Arc<dyn WebhookTransport>,
    policy: RetryPolicy,
    shutdown: ShutdownSignal,
}

impl RetryScheduler {
    pub fn new(transport: Arc<dyn WebhookTransport>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            shutdown: ShutdownSignal::new(),
        }
    }

    /// Share an existing shutdown signal instead of a private one
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Start delivering `payload` to `url` in the background.
    ///
    /// Returns immediately. Must be called within a tokio runtime.
    pub fn deliver(
        &self,
        url: impl Into<String>,
        payload: WebhookPayload,
    ) -> JoinHandle<DeliveryTask> {
        let task = DeliveryTask::new(url, payload);
        let scheduler = self.clone();
        tokio::spawn(async move { scheduler.run(task).await })
    }

    /// Run `task` to a terminal state and return it
    pub async fn run(&self, mut task: DeliveryTask) -> DeliveryTask {
        let max_attempts = self.policy.max_attempts;
        let mut shutdown = self.shutdown.subscribe();

        while !task.state.is_terminal() {
            task.mark_attempting();
            let attempt = task.attempts;
            info!(
                task_id = %task.id,
                url = %task.subscriber_url,
                attempt,
                max_attempts,
                "Attempting webhook delivery"
            );

            let error = match self.transport.send(&task.subscriber_url, &task.payload).await {
                Ok(()) => {
                    info!(
                        task_id = %task.id,
                        url = %task.subscriber_url,
                        attempt,
                        "Webhook delivered"
                    );
                    task.mark_succeeded();
                    continue;
                }
                Err(error) => error,
            };

            error!(
                task_id = %task.id,
                url = %task.subscriber_url,
                attempt,
                max_attempts,
                reason = %error.reason(),
                "Webhook delivery attempt failed"
            );
            let retryable = error.is_retryable();
            task.record_failure(error);

            if !retryable || !self.policy.should_retry(attempt) {
                error!(
                    task_id = %task.id,
                    url = %task.subscriber_url,
                    attempts = attempt,
                    "Giving up on webhook delivery"
                );
                task.mark_exhausted();
                continue;
            }

            let delay = self.policy.delay_for_attempt(attempt);
            info!(
                task_id = %task.id,
                url = %task.subscriber_url,
                delay_ms = delay.as_millis() as u64,
                "Retrying webhook delivery after backoff"
            );

            tokio::select! {
                biased;
                _ = shutdown.triggered() => {
                    warn!(
                        task_id = %task.id,
                        url = %task.subscriber_url,
                        attempt,
                        "Webhook retry interrupted by shutdown"
                    );
                    task.mark_exhausted();
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        task
    }
}

impl std::fmt::Debug for RetryScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryScheduler")
            .field("policy", &self.policy)
            .field("shutdown", &self.shutdown.is_triggered())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeliveryError, DeliveryState};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Fails the first `failures` attempts, then succeeds. Records attempt times.
    struct ScriptedTransport {
        failures: u32,
        attempts: Mutex<Vec<Instant>>,
    }

    impl ScriptedTransport {
        fn new(failures: u32) -> Arc<Self> {
            Arc::new(Self {
                failures,
                attempts: Mutex::new(Vec::new()),
            })
        }

        fn attempt_times(&self) -> Vec<Instant> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WebhookTransport for ScriptedTransport {
        async fn send(&self, _url: &str, _payload: &WebhookPayload) -> Result<(), DeliveryError> {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(Instant::now());
            if attempts.len() as u32 <= self.failures {
                Err(DeliveryError::Status(500))
            } else {
                Ok(())
            }
        }
    }

    fn task() -> DeliveryTask {
        DeliveryTask::new(HOOK_URL, payload())
    }

    const HOOK_URL: &str = "https://example.com/hook";

    fn payload() -> WebhookPayload {
        WebhookPayload::from_bytes("TEST", "{}")
    }

    fn gaps(times: &[Instant]) -> Vec<Duration> {
        times.windows(2).map(|w| w[1] - w[0]).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_succeeds() {
        let transport = ScriptedTransport::new(0);
        let scheduler = RetryScheduler::new(transport.clone(), RetryPolicy::default());

        let done = scheduler.run(task()).await;
        assert_eq!(done.state, DeliveryState::Succeeded);
        assert_eq!(done.attempts, 1);
        assert_eq!(transport.attempt_times().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_after_max_attempts_with_doubling_delays() {
        let transport = ScriptedTransport::new(u32::MAX);
        let scheduler = RetryScheduler::new(transport.clone(), RetryPolicy::default());

        let done = scheduler.run(task()).await;
        assert_eq!(done.state, DeliveryState::Exhausted);
        assert_eq!(done.attempts, 3);
        assert_eq!(done.last_error, Some(DeliveryError::Status(500)));

        let times = transport.attempt_times();
        assert_eq!(times.len(), 3);
        assert_eq!(
            gaps(&times),
            vec![Duration::from_millis(5000), Duration::from_millis(10000)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fail_once_then_succeed() {
        let transport = ScriptedTransport::new(1);
        let policy = RetryPolicy::exponential(3, Duration::from_millis(200));
        let scheduler = RetryScheduler::new(transport.clone(), policy);

        let done = scheduler.run(task()).await;
        assert_eq!(done.state, DeliveryState::Succeeded);
        assert_eq!(done.attempts, 2);
        assert_eq!(
            gaps(&transport.attempt_times()),
            vec![Duration::from_millis(200)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_has_no_backoff() {
        let transport = ScriptedTransport::new(u32::MAX);
        let scheduler = RetryScheduler::new(transport.clone(), RetryPolicy::none());

        let started = Instant::now();
        let done = scheduler.run(task()).await;
        assert_eq!(done.state, DeliveryState::Exhausted);
        assert_eq!(done.attempts, 1);
        assert_eq!(Instant::now(), started);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_backoff() {
        let transport = ScriptedTransport::new(u32::MAX);
        let scheduler = RetryScheduler::new(transport.clone(), RetryPolicy::default());
        let signal = scheduler.shutdown_signal().clone();

        let handle = scheduler.deliver(HOOK_URL, payload());
        tokio::time::sleep(Duration::from_millis(1000)).await;
        signal.trigger();

        let done = handle.await.unwrap();
        assert_eq!(done.state, DeliveryState::Exhausted);
        assert_eq!(done.attempts, 1);
        assert_eq!(transport.attempt_times().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deliver_returns_before_attempting() {
        let transport = ScriptedTransport::new(0);
        let scheduler = RetryScheduler::new(transport.clone(), RetryPolicy::default());

        let handle = scheduler.deliver(HOOK_URL, payload());
        assert!(transport.attempt_times().is_empty());

        let done = handle.await.unwrap();
        assert!(done.state.is_success());
    }
}
