//! 도구 메타데이터와 JSON 파라미터 스키마.

use crate::error::ToolError;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// 지원하는 도구 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    PlaceMarketOrder,
    PlaceLimitOrder,
    GetAccountBalance,
    GetPositionInfo,
}

impl ToolKind {
    /// 카탈로그 순서대로 모든 도구.
    pub const ALL: [ToolKind; 4] = [
        ToolKind::PlaceMarketOrder,
        ToolKind::PlaceLimitOrder,
        ToolKind::GetAccountBalance,
        ToolKind::GetPositionInfo,
    ];

    /// 에이전트가 호출에 사용하는 이름.
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::PlaceMarketOrder => "place_market_order",
            ToolKind::PlaceLimitOrder => "place_limit_order",
            ToolKind::GetAccountBalance => "get_account_balance",
            ToolKind::GetPositionInfo => "get_position_info",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::PlaceMarketOrder => {
                "Place a MARKET order on Binance USDⓈ-M Futures. \
                 Returns order id, status, executed quantity and average price."
            }
            ToolKind::PlaceLimitOrder => {
                "Place a GTC LIMIT order on Binance USDⓈ-M Futures. \
                 Returns order id, status, price, executed quantity and average price."
            }
            ToolKind::GetAccountBalance => {
                "Get the futures account balance: wallet and available balance per funded asset."
            }
            ToolKind::GetPositionInfo => {
                "Get open position information for a trading pair: size, entry price, \
                 mark price, unrealized PnL and leverage."
            }
        }
    }

    /// JSON Schema 형식의 파라미터 정의.
    pub fn parameters(&self) -> Value {
        let symbol = json!({
            "type": "string",
            "description": "Trading pair symbol (e.g., BTCUSDT)"
        });
        let side = json!({
            "type": "string",
            "enum": ["BUY", "SELL"],
            "description": "Order side"
        });
        let quantity = json!({
            "type": ["number", "string"],
            "description": "Order quantity, greater than 0"
        });

        match self {
            ToolKind::PlaceMarketOrder => json!({
                "type": "object",
                "properties": {
                    "symbol": symbol,
                    "side": side,
                    "quantity": quantity,
                },
                "required": ["symbol", "side", "quantity"],
            }),
            ToolKind::PlaceLimitOrder => json!({
                "type": "object",
                "properties": {
                    "symbol": symbol,
                    "side": side,
                    "quantity": quantity,
                    "price": {
                        "type": ["number", "string"],
                        "description": "Limit price, greater than 0"
                    },
                },
                "required": ["symbol", "side", "quantity", "price"],
            }),
            ToolKind::GetAccountBalance => json!({
                "type": "object",
                "properties": {},
            }),
            ToolKind::GetPositionInfo => json!({
                "type": "object",
                "properties": { "symbol": symbol },
                "required": ["symbol"],
            }),
        }
    }

    /// 함수 호출 형식의 도구 정의.
    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "parameters": self.parameters(),
        })
    }

    /// 전체 카탈로그 (에이전트 루프에 전달).
    pub fn catalog_json() -> Value {
        Value::Array(Self::ALL.iter().map(ToolKind::to_json).collect())
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }
}
