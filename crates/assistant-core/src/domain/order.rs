//! 주문 타입 및 주문 요청 검증.
//!
//! 이 모듈은 주문 관련 타입을 정의합니다:
//! - `Side` - 주문 방향 (매수/매도)
//! - `OrderType` - 주문 유형 (시장가/지정가)
//! - `OrderRequest` - 검증을 통과한 불변 주문 요청
//! - `OrderResult` - 거래소가 접수한 주문 결과
//! - `validate` - 원시 입력을 `OrderRequest`로 변환하는 순수 함수

use crate::error::ValidationError;
use crate::types::{display_decimal, Price, Quantity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 주문 방향 (매수 또는 매도).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// 매수
    Buy,
    /// 매도
    Sell,
}

impl Side {
    /// 거래소 전송 형식 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            _ => Err(ValidationError::InvalidSide(s.to_string())),
        }
    }
}

/// 주문 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// 시장가 주문 - 현재 시장 가격으로 즉시 체결
    Market,
    /// 지정가 주문 - 지정 가격 이상/이하에서 체결
    Limit,
}

impl OrderType {
    /// 거래소 전송 형식 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            _ => Err(ValidationError::InvalidType(s.to_string())),
        }
    }
}

/// 검증을 통과한 주문 요청.
///
/// `validate`로만 생성할 수 있으며 생성 후에는 변경할 수 없습니다.
/// 시장가 주문은 항상 `price()`가 `None`입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    symbol: String,
    side: Side,
    order_type: OrderType,
    quantity: Quantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<Price>,
}

impl OrderRequest {
    /// 원시 입력을 검증하여 주문 요청을 생성합니다. [`validate`]와 동일합니다.
    pub fn new(
        symbol: &str,
        side: &str,
        order_type: &str,
        quantity: Quantity,
        price: Option<Price>,
    ) -> Result<Self, ValidationError> {
        validate(symbol, side, order_type, quantity, price)
    }

    /// 대문자 심볼 (예: "BTCUSDT").
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// 지정가 (지정가 주문에만 존재).
    pub fn price(&self) -> Option<Price> {
        self.price
    }
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.side,
            display_decimal(self.quantity),
            self.symbol,
            self.order_type
        )?;
        if let Some(price) = self.price {
            write!(f, " @ {}", display_decimal(price))?;
        }
        Ok(())
    }
}

/// 주문 요청을 정규화하고 검증합니다.
///
/// 규칙은 순서대로 적용되며 첫 번째 실패가 반환됩니다:
/// 1. 심볼은 공백 제거 후 비어 있으면 안 되며 대문자로 정규화됩니다.
///    심볼 존재 여부는 확인하지 않습니다 (거래소가 거부).
/// 2. 방향은 BUY/SELL (대소문자 무시).
/// 3. 유형은 MARKET/LIMIT (대소문자 무시).
/// 4. 수량은 0보다 커야 합니다.
/// 5. 지정가 주문은 0보다 큰 가격이 필요합니다.
/// 6. 시장가 주문에 가격이 주어지면 에러 없이 **무시**됩니다.
///    결과 요청에는 가격이 포함되지 않습니다.
///
/// 네트워크 호출이나 부수 효과가 없는 순수 함수입니다.
pub fn validate(
    symbol: &str,
    side: &str,
    order_type: &str,
    quantity: Quantity,
    price: Option<Price>,
) -> Result<OrderRequest, ValidationError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(ValidationError::EmptySymbol);
    }

    let side: Side = side.parse()?;
    let order_type: OrderType = order_type.parse()?;

    if quantity <= Decimal::ZERO {
        return Err(ValidationError::InvalidQuantity(quantity));
    }

    let price = match order_type {
        OrderType::Limit => match price {
            None => return Err(ValidationError::MissingPrice),
            Some(p) if p <= Decimal::ZERO => return Err(ValidationError::InvalidPrice(p)),
            Some(p) => Some(p),
        },
        OrderType::Market => None,
    };

    Ok(OrderRequest {
        symbol: symbol.to_uppercase(),
        side,
        order_type,
        quantity,
        price,
    })
}

/// 거래소가 접수한 주문 결과.
///
/// 성공한 게이트웨이 호출에서만 생성되며, 필드가 부분적으로 채워지는 일은 없습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    /// 거래소 주문 ID
    pub order_id: i64,
    /// 클라이언트 주문 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// 거래소 보고 상태 (예: "NEW", "FILLED")
    pub status: String,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    /// 주문 수량 (`origQty`)
    pub quantity: Quantity,
    /// 지정가 (시장가 주문이면 `None`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// 체결 수량
    pub executed_quantity: Quantity,
    /// 평균 체결가 (체결이 없으면 `None`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_price: Option<Price>,
    /// 거래소 타임스탬프 원본 (밀리초)
    pub update_time: i64,
}

impl OrderResult {
    /// 거래소 타임스탬프를 UTC 시각으로 변환합니다.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.update_time)
    }

    /// 전량 체결 여부.
    pub fn is_filled(&self) -> bool {
        self.status == "FILLED"
    }
}
