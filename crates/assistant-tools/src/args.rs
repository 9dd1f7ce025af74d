//! 도구 인자 역직렬화.
//!
//! 수량과 가격은 JSON 숫자와 숫자 문자열을 모두 받습니다.
//! 값의 범위(0보다 큰지)는 여기서 확인하지 않고 주문 검증기에 맡깁니다.

use crate::catalog::ToolKind;
use crate::error::ToolError;
use assistant_core::parse_exchange_decimal;
use rust_decimal::Decimal;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `place_market_order` 인자.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketOrderArgs {
    pub symbol: String,
    pub side: String,
    #[serde(deserialize_with = "decimal_arg")]
    pub quantity: Decimal,
}

/// `place_limit_order` 인자.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitOrderArgs {
    pub symbol: String,
    pub side: String,
    #[serde(deserialize_with = "decimal_arg")]
    pub quantity: Decimal,
    #[serde(deserialize_with = "decimal_arg")]
    pub price: Decimal,
}

/// `get_position_info` 인자.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionArgs {
    pub symbol: String,
}

/// JSON 숫자 또는 숫자 문자열을 Decimal로 변환.
fn decimal_arg<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let raw = match &value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => {
            return Err(D::Error::custom(format!(
                "expected a number or numeric string, got {}",
                other
            )))
        }
    };

    parse_exchange_decimal(&raw)
        .ok_or_else(|| D::Error::custom(format!("'{}' is not a valid number", raw)))
}

/// 도구 인자를 파싱합니다. 실패하면 `ToolError::InvalidArguments`.
pub fn parse_args<T: DeserializeOwned>(tool: ToolKind, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool: tool.name(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_number_and_string_quantities() {
        let from_number: MarketOrderArgs = parse_args(
            ToolKind::PlaceMarketOrder,
            json!({"symbol": "BTCUSDT", "side": "BUY", "quantity": 0.001}),
        )
        .unwrap();
        let from_string: MarketOrderArgs = parse_args(
            ToolKind::PlaceMarketOrder,
            json!({"symbol": "BTCUSDT", "side": "BUY", "quantity": "0.001"}),
        )
        .unwrap();

        assert_eq!(from_number.quantity, dec!(0.001));
        assert_eq!(from_string.quantity, dec!(0.001));
    }

    #[test]
    fn test_missing_field_is_invalid() {
        let err = parse_args::<LimitOrderArgs>(
            ToolKind::PlaceLimitOrder,
            json!({"symbol": "ETHUSDT", "side": "SELL", "quantity": 0.5}),
        )
        .unwrap_err();

        match err {
            ToolError::InvalidArguments { tool, reason } => {
                assert_eq!(tool, "place_limit_order");
                assert!(reason.contains("price"));
            }
            other => panic!("expected InvalidArguments, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_quantity_is_invalid() {
        for quantity in [json!("abc"), json!(true), json!(null)] {
            let result = parse_args::<MarketOrderArgs>(
                ToolKind::PlaceMarketOrder,
                json!({"symbol": "BTCUSDT", "side": "BUY", "quantity": quantity}),
            );
            assert!(matches!(result, Err(ToolError::InvalidArguments { .. })));
        }
    }

    #[test]
    fn test_negative_quantity_passes_through() {
        let args: MarketOrderArgs = parse_args(
            ToolKind::PlaceMarketOrder,
            json!({"symbol": "BTCUSDT", "side": "BUY", "quantity": -1}),
        )
        .unwrap();
        assert_eq!(args.quantity, dec!(-1));
    }
}
