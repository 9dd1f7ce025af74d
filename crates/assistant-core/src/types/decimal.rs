//! 정밀한 금융 계산을 위한 Decimal 유틸리티.

use rust_decimal::Decimal;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 주문 수량을 위한 타입.
pub type Quantity = Decimal;

/// 거래소가 문자열로 내려주는 숫자 필드를 엄격하게 파싱합니다.
///
/// 빈 문자열이나 숫자가 아닌 값은 `None`을 반환합니다. 0으로 대체하지 않습니다.
pub fn parse_exchange_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// 표시용으로 불필요한 꼬리 0을 제거합니다 (예: "0.00100000" -> "0.001").
pub fn display_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}
