//! 게이트웨이 에러 타입.
//!
//! 호출자는 세 가지 종료 결과만 봅니다: 성공, `Permanent`, `ExhaustedRetries`.
//! `TransientError`는 재시도 루프 내부에서만 사용되며, 마지막 시도까지 실패하면
//! `ExhaustedRetries` 안에 담겨 전달됩니다.

use assistant_core::ValidationError;
use std::fmt;
use thiserror::Error;

/// 자동 복구를 기대할 수 있는 일시적 실패 (502/503/504, 연결/타임아웃).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientError {
    /// HTTP 상태 코드 (네트워크 수준 실패면 `None`)
    pub http_status: Option<u16>,
    /// 원인 설명
    pub cause: String,
}

impl fmt::Display for TransientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.http_status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.cause),
            None => write!(f, "network: {}", self.cause),
        }
    }
}

impl std::error::Error for TransientError {}

impl TransientError {
    /// 재시도 대상 HTTP 상태 코드.
    pub const RETRYABLE_STATUSES: [u16; 3] = [502, 503, 504];

    pub fn http(status: u16, cause: impl Into<String>) -> Self {
        Self {
            http_status: Some(status),
            cause: cause.into(),
        }
    }

    pub fn network(cause: impl Into<String>) -> Self {
        Self {
            http_status: None,
            cause: cause.into(),
        }
    }

    /// 재시도 대상 상태 코드인지 확인.
    pub fn is_transient_status(status: u16) -> bool {
        Self::RETRYABLE_STATUSES.contains(&status)
    }
}

/// 게이트웨이 호출의 최종 에러.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 거래소 거부 (재시도 안 함). 메시지는 거래소 원문 그대로.
    #[error("Exchange rejected request (HTTP {http_status}, code {code}): {message}")]
    Permanent {
        http_status: u16,
        code: i64,
        message: String,
    },

    /// 일시적 실패가 최대 시도 횟수만큼 반복됨
    #[error("Exchange unavailable after {attempts} attempts: {last_cause}")]
    ExhaustedRetries {
        attempts: u32,
        last_cause: TransientError,
    },

    /// 2xx 응답 본문을 해석할 수 없음 (재시도 안 함)
    #[error("Malformed exchange response: {0}")]
    MalformedResponse(String),

    /// 네트워크 호출 전 입력 검증 실패
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// HTTP 클라이언트/서명 설정 오류
    #[error("Gateway configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// 거래소가 비즈니스 의미를 담아 거부한 경우.
    pub fn is_permanent(&self) -> bool {
        matches!(self, GatewayError::Permanent { .. })
    }

    /// 재시도를 모두 소진한 경우.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, GatewayError::ExhaustedRetries { .. })
    }

    /// 거래소 에러 코드 (예: -2019 잔고 부족).
    pub fn exchange_code(&self) -> Option<i64> {
        match self {
            GatewayError::Permanent { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// 시도 횟수 (재시도 소진 시).
    pub fn attempts(&self) -> Option<u32> {
        match self {
            GatewayError::ExhaustedRetries { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}

/// 한 번의 시도 결과 분류 (재시도 루프 내부용).
#[derive(Debug)]
pub enum AttemptError {
    /// 재시도 대상
    Transient(TransientError),
    /// 즉시 중단
    Permanent(GatewayError),
}

impl From<TransientError> for AttemptError {
    fn from(err: TransientError) -> Self {
        AttemptError::Transient(err)
    }
}

impl From<GatewayError> for AttemptError {
    fn from(err: GatewayError) -> Self {
        AttemptError::Permanent(err)
    }
}

impl From<reqwest::Error> for AttemptError {
    /// 전송 계층 에러 분류.
    ///
    /// 요청 구성/리다이렉트 오류는 재시도해도 바뀌지 않으므로 영구 실패,
    /// 나머지(연결, 타임아웃, 전송 중 끊김, 본문 수신 실패)는 일시적 실패입니다.
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() || err.is_redirect() {
            AttemptError::Permanent(GatewayError::Config(err.to_string()))
        } else if err.is_timeout() {
            AttemptError::Transient(TransientError::network(format!("timeout: {}", err)))
        } else {
            AttemptError::Transient(TransientError::network(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses() {
        assert!(TransientError::is_transient_status(502));
        assert!(TransientError::is_transient_status(503));
        assert!(TransientError::is_transient_status(504));
        assert!(!TransientError::is_transient_status(500));
        assert!(!TransientError::is_transient_status(429));
        assert!(!TransientError::is_transient_status(400));
    }

    #[test]
    fn test_transient_display() {
        assert_eq!(
            TransientError::http(503, "Service Unavailable").to_string(),
            "HTTP 503: Service Unavailable"
        );
        assert_eq!(
            TransientError::network("connection refused").to_string(),
            "network: connection refused"
        );
    }

    #[test]
    fn test_gateway_error_helpers() {
        let rejected = GatewayError::Permanent {
            http_status: 400,
            code: -2019,
            message: "Margin is insufficient.".to_string(),
        };
        assert!(rejected.is_permanent());
        assert_eq!(rejected.exchange_code(), Some(-2019));
        assert_eq!(rejected.attempts(), None);

        let exhausted = GatewayError::ExhaustedRetries {
            attempts: 3,
            last_cause: TransientError::http(504, "Gateway Timeout"),
        };
        assert!(exhausted.is_exhausted());
        assert_eq!(exhausted.attempts(), Some(3));
        assert_eq!(
            exhausted.to_string(),
            "Exchange unavailable after 3 attempts: HTTP 504: Gateway Timeout"
        );
    }
}
