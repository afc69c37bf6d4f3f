use std::time::Duration;

use tracing::{debug, warn};

use crate::{Runnable, ScholarError};

/// How an error coming back from a provider should be treated by [`Throttled`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryClass {
    Throttled,
    Fatal,
}

/// Explicit rate-limit errors are throttled. Providers that only report the
/// condition in their message text are matched on `429` / `rate_limit`.
pub fn classify(error: &ScholarError) -> RetryClass {
    match error {
        ScholarError::RateLimited { .. } => RetryClass::Throttled,
        ScholarError::LlmProvider(message) if has_throttle_signature(message) => {
            RetryClass::Throttled
        }
        _ => RetryClass::Fatal,
    }
}

pub fn is_throttled(error: &ScholarError) -> bool {
    classify(error) == RetryClass::Throttled
}

/// The provider's own `Retry-After` hint, when it sent one.
pub fn retry_hint(error: &ScholarError) -> Option<Duration> {
    match error {
        ScholarError::RateLimited { retry_after, .. } => *retry_after,
        _ => None,
    }
}

fn has_throttle_signature(message: &str) -> bool {
    message.contains("429") || message.to_lowercase().contains("rate_limit")
}

/// Two-tier delay schedule: a pacing delay before every guarded attempt and a
/// longer cooldown after each throttled one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub delay_step: Duration,
    pub cooldown_delay: Duration,
    pub cooldown_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(3),
            delay_step: Duration::from_secs(2),
            cooldown_delay: Duration::from_secs(5),
            cooldown_step: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// A policy that never sleeps. Used by tests and offline tooling.
    pub fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            delay_step: Duration::ZERO,
            cooldown_delay: Duration::ZERO,
            cooldown_step: Duration::ZERO,
        }
    }

    pub fn pacing_delay(&self, attempt: usize) -> Duration {
        self.base_delay + self.delay_step * attempt as u32
    }

    pub fn cooldown(&self, attempt: usize) -> Duration {
        self.cooldown_delay + self.cooldown_step * attempt as u32
    }
}

/// Wraps a runnable with [`RetryPolicy`] pacing and throttle cooldowns.
///
/// Up to `max_attempts` guarded attempts are made; a throttled failure sleeps
/// the cooldown (or the provider's `Retry-After`, if longer) and tries again.
/// Any other failure is returned immediately.
/// Once the guarded attempts are spent one last call is made and its result is
/// returned as-is.
pub struct Throttled<R> {
    runnable: R,
    policy: RetryPolicy,
}

impl<R> Throttled<R> {
    pub fn new(runnable: R, policy: RetryPolicy) -> Self {
        Self { runnable, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn inner(&self) -> &R {
        &self.runnable
    }
}

#[async_trait::async_trait]
impl<Input, Output, R> Runnable<Input, Output> for Throttled<R>
where
    Input: Send + Clone + 'static,
    Output: Send + 'static,
    R: Runnable<Input, Output> + Send + Sync,
{
    async fn invoke(&self, input: Input) -> Result<Output, ScholarError> {
        for attempt in 0..self.policy.max_attempts {
            let pacing = self.policy.pacing_delay(attempt);
            debug!(attempt, delay_ms = pacing.as_millis() as u64, "pacing model call");
            tokio::time::sleep(pacing).await;

            match self.runnable.invoke(input.clone()).await {
                Ok(output) => return Ok(output),
                Err(error) => match classify(&error) {
                    RetryClass::Throttled => {
                        let cooldown = self
                            .policy
                            .cooldown(attempt)
                            .max(retry_hint(&error).unwrap_or_default());
                        warn!(
                            attempt,
                            cooldown_ms = cooldown.as_millis() as u64,
                            %error,
                            "rate limit hit, cooling down"
                        );
                        tokio::time::sleep(cooldown).await;
                    }
                    RetryClass::Fatal => return Err(error),
                },
            }
        }

        self.runnable.invoke(input).await
    }
}
