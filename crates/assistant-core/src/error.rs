//! 어시스턴트 코어의 에러 타입.
//!
//! - `ValidationError`: 주문 요청 검증 실패. 네트워크 계층에 도달하지 않습니다.
//! - `ConfigError`: 설정 로드 및 자격증명 누락.

use rust_decimal::Decimal;
use thiserror::Error;

/// 주문 요청 검증 에러.
///
/// 항상 로컬에서 발생하며 입력을 수정하면 복구할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 심볼 누락
    #[error("Symbol is required")]
    EmptySymbol,

    /// 지원하지 않는 주문 방향
    #[error("Side must be BUY or SELL (got '{0}')")]
    InvalidSide(String),

    /// 지원하지 않는 주문 유형
    #[error("Order type must be MARKET or LIMIT (got '{0}')")]
    InvalidType(String),

    /// 0 이하의 수량
    #[error("Quantity must be greater than 0 (got {0})")]
    InvalidQuantity(Decimal),

    /// 지정가 주문에 가격 누락
    #[error("Price is required for LIMIT orders")]
    MissingPrice,

    /// 0 이하의 가격
    #[error("Price must be greater than 0 (got {0})")]
    InvalidPrice(Decimal),
}

impl ValidationError {
    /// 에러 사유의 짧은 식별자를 반환합니다 (로그 필드용).
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::EmptySymbol => "empty_symbol",
            ValidationError::InvalidSide(_) => "invalid_side",
            ValidationError::InvalidType(_) => "invalid_type",
            ValidationError::InvalidQuantity(_) => "invalid_quantity",
            ValidationError::MissingPrice => "missing_price",
            ValidationError::InvalidPrice(_) => "invalid_price",
        }
    }
}

/// 설정 에러.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 필수 환경 변수 누락
    #[error("{0} environment variable is required (BINANCE_API_KEY and BINANCE_API_SECRET must both be set)")]
    MissingCredentials(&'static str),

    /// 설정 소스 로드/역직렬화 실패
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// 값 범위 오류
    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::EmptySymbol.to_string(), "Symbol is required");
        assert_eq!(
            ValidationError::InvalidQuantity(dec!(-1)).to_string(),
            "Quantity must be greater than 0 (got -1)"
        );
        assert_eq!(ValidationError::MissingPrice.reason(), "missing_price");
    }

    #[test]
    fn test_missing_credentials_message() {
        let err = ConfigError::MissingCredentials("BINANCE_API_SECRET");
        assert!(err.to_string().starts_with("BINANCE_API_SECRET environment variable"));
    }
}
