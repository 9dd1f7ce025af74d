//! 일시적 실패에 대한 제한된 재시도.
//!
//! # 상태 전이
//!
//! ```text
//! Attempting(n) ──2xx──────────────────> Done(Success)
//! Attempting(n) ──transient, n < max──> [base_delay * n 대기] ──> Attempting(n+1)
//! Attempting(n) ──transient, n == max─> Done(ExhaustedRetries)
//! Attempting(n) ──permanent───────────> Done(Permanent)
//! ```
//!
//! 대기 시간은 선형입니다: 기본값(2초, 최대 3회)에서 2초, 4초.
//! 대기는 `tokio::time::sleep`이므로 호출한 태스크만 멈추고 다른 호출은 계속 진행됩니다.

use crate::error::{AttemptError, GatewayError};
use crate::observer::{AttemptEvent, AttemptObserver, AttemptOutcome};
use assistant_core::RetrySettings;
use std::future::Future;
use std::time::Duration;

/// 재시도 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 최대 시도 횟수 (첫 시도 포함, 최소 1)
    max_attempts: u32,
    /// 기본 대기 시간
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// 새 정책 생성. `max_attempts`가 0이면 1로 취급합니다.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// 설정에서 생성.
    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self::new(settings.max_attempts, settings.base_delay())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// `attempt`번째 시도가 일시적 실패로 끝난 뒤의 대기 시간.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// 재시도 정책에 따라 작업을 실행합니다.
    ///
    /// `attempt_fn`은 시도 번호(1부터)를 받아 한 번의 시도를 수행하며,
    /// 매 시도는 결과와 관계없이 `observer`에 보고됩니다.
    pub async fn execute<T, F, Fut>(
        &self,
        operation: &'static str,
        observer: &dyn AttemptObserver,
        mut attempt_fn: F,
    ) -> Result<T, GatewayError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
    {
        let mut attempt = 1;

        loop {
            let report = |outcome: AttemptOutcome, delay: Option<Duration>| {
                observer.on_attempt(&AttemptEvent {
                    operation,
                    attempt,
                    max_attempts: self.max_attempts,
                    outcome,
                    delay,
                });
            };

            match attempt_fn(attempt).await {
                Ok(value) => {
                    report(AttemptOutcome::Success, None);
                    return Ok(value);
                }
                Err(AttemptError::Permanent(err)) => {
                    report(
                        AttemptOutcome::Permanent {
                            detail: err.to_string(),
                        },
                        None,
                    );
                    return Err(err);
                }
                Err(AttemptError::Transient(cause)) => {
                    let outcome = AttemptOutcome::Transient {
                        http_status: cause.http_status,
                        cause: cause.cause.clone(),
                    };

                    if attempt >= self.max_attempts {
                        report(outcome, None);
                        return Err(GatewayError::ExhaustedRetries {
                            attempts: attempt,
                            last_cause: cause,
                        });
                    }

                    let delay = self.delay_for(attempt);
                    report(outcome, Some(delay));
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
