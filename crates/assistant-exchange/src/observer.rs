//! 시도 단위 이벤트 관찰자.
//!
//! 재시도 루프는 로그를 직접 남기지 않고 매 시도마다 `AttemptEvent`를 관찰자에게 전달합니다.
//! 기본 관찰자 `TracingObserver`는 이벤트를 tracing 레코드로 변환하고,
//! `RecordingObserver`는 이벤트를 메모리에 모아 검증에 사용합니다.

use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error, warn};

/// 한 번의 시도 분류 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 2xx + 정상 본문
    Success,
    /// 일시적 실패 (502/503/504, 네트워크)
    Transient {
        http_status: Option<u16>,
        cause: String,
    },
    /// 영구 실패
    Permanent { detail: String },
}

impl AttemptOutcome {
    /// 로그 필드용 짧은 이름.
    pub fn label(&self) -> &'static str {
        match self {
            AttemptOutcome::Success => "success",
            AttemptOutcome::Transient { .. } => "transient",
            AttemptOutcome::Permanent { .. } => "permanent",
        }
    }
}

/// 시도 이벤트.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptEvent {
    /// 게이트웨이 작업 이름 (예: "place_order")
    pub operation: &'static str,
    /// 시도 번호 (1부터)
    pub attempt: u32,
    /// 최대 시도 횟수
    pub max_attempts: u32,
    pub outcome: AttemptOutcome,
    /// 다음 시도까지 대기 시간 (재시도가 예정된 경우에만)
    pub delay: Option<Duration>,
}

/// 시도 이벤트 관찰자.
pub trait AttemptObserver: Send + Sync {
    fn on_attempt(&self, event: &AttemptEvent);
}

/// tracing으로 이벤트를 기록하는 기본 관찰자.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AttemptObserver for TracingObserver {
    fn on_attempt(&self, event: &AttemptEvent) {
        match (&event.outcome, event.delay) {
            (AttemptOutcome::Success, _) => debug!(
                operation = event.operation,
                attempt = event.attempt,
                "Exchange call succeeded"
            ),
            (AttemptOutcome::Transient { http_status, cause }, Some(delay)) => warn!(
                operation = event.operation,
                attempt = event.attempt,
                max_attempts = event.max_attempts,
                status = ?http_status,
                delay_ms = delay.as_millis() as u64,
                cause = %cause,
                "Transient exchange failure, retrying"
            ),
            (AttemptOutcome::Transient { http_status, cause }, None) => error!(
                operation = event.operation,
                attempts = event.attempt,
                status = ?http_status,
                cause = %cause,
                "Transient exchange failure, retries exhausted"
            ),
            (AttemptOutcome::Permanent { detail }, _) => warn!(
                operation = event.operation,
                attempt = event.attempt,
                detail = %detail,
                "Exchange rejected request"
            ),
        }
    }
}

/// 이벤트를 메모리에 기록하는 관찰자.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<AttemptEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기록된 이벤트 복사본.
    pub fn events(&self) -> Vec<AttemptEvent> {
        self.lock().clone()
    }

    /// 기록된 대기 시간 목록 (순서대로).
    pub fn delays(&self) -> Vec<Duration> {
        self.lock().iter().filter_map(|e| e.delay).collect()
    }

    /// 기록된 시도 횟수.
    pub fn attempt_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AttemptEvent>> {
        // 관찰 중 panic이 나도 기록은 계속 읽을 수 있어야 함
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AttemptObserver for RecordingObserver {
    fn on_attempt(&self, event: &AttemptEvent) {
        self.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_observer() {
        let observer = RecordingObserver::new();
        observer.on_attempt(&AttemptEvent {
            operation: "get_balance",
            attempt: 1,
            max_attempts: 3,
            outcome: AttemptOutcome::Transient {
                http_status: Some(502),
                cause: "Bad Gateway".to_string(),
            },
            delay: Some(Duration::from_secs(2)),
        });
        observer.on_attempt(&AttemptEvent {
            operation: "get_balance",
            attempt: 2,
            max_attempts: 3,
            outcome: AttemptOutcome::Success,
            delay: None,
        });

        assert_eq!(observer.attempt_count(), 2);
        assert_eq!(observer.delays(), vec![Duration::from_secs(2)]);
        assert_eq!(observer.events()[1].outcome.label(), "success");
    }
}
