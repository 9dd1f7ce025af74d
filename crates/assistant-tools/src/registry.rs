//! 도구 이름 기반 디스패치.

use crate::args::{parse_args, LimitOrderArgs, MarketOrderArgs, PositionArgs};
use crate::catalog::ToolKind;
use crate::error::ToolError;
use crate::render;
use assistant_core::validate;
use assistant_exchange::OrderGateway;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// 도구 호출 결과.
///
/// 검증 실패와 게이트웨이 실패도 `is_error = true`인 출력으로 돌려주어
/// 에이전트가 사용자에게 그대로 설명할 수 있게 합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub tool: ToolKind,
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    fn ok(tool: ToolKind, text: String) -> Self {
        Self {
            tool,
            text,
            is_error: false,
        }
    }

    fn error(tool: ToolKind, text: String) -> Self {
        Self {
            tool,
            text,
            is_error: true,
        }
    }
}

/// 게이트웨이 위에서 도구 호출을 처리하는 레지스트리.
pub struct ToolRegistry {
    gateway: Arc<dyn OrderGateway>,
}

impl ToolRegistry {
    pub fn new(gateway: Arc<dyn OrderGateway>) -> Self {
        Self { gateway }
    }

    /// 등록된 도구 목록.
    pub fn tools(&self) -> &'static [ToolKind] {
        &ToolKind::ALL
    }

    /// 도구 카탈로그 JSON.
    pub fn catalog(&self) -> Value {
        ToolKind::catalog_json()
    }

    /// 이름으로 도구를 찾아 실행합니다.
    ///
    /// # Errors
    /// 알 수 없는 이름은 `UnknownTool`, 인자 형식 오류는 `InvalidArguments`.
    pub async fn call(&self, name: &str, args: Value) -> Result<ToolOutput, ToolError> {
        let tool: ToolKind = name.parse()?;
        info!(tool = %tool, gateway = self.gateway.name(), "Tool invoked");

        let output = match tool {
            ToolKind::PlaceMarketOrder => {
                let args: MarketOrderArgs = parse_args(tool, args)?;
                self.place(tool, &args.symbol, &args.side, "MARKET", args.quantity, None)
                    .await
            }
            ToolKind::PlaceLimitOrder => {
                let args: LimitOrderArgs = parse_args(tool, args)?;
                self.place(
                    tool,
                    &args.symbol,
                    &args.side,
                    "LIMIT",
                    args.quantity,
                    Some(args.price),
                )
                .await
            }
            ToolKind::GetAccountBalance => match self.gateway.get_balance().await {
                Ok(snapshot) => ToolOutput::ok(tool, render::render_balance(&snapshot)),
                Err(e) => ToolOutput::error(tool, render::render_gateway_error(&e)),
            },
            ToolKind::GetPositionInfo => {
                let args: PositionArgs = parse_args(tool, args)?;
                match self.gateway.get_position(&args.symbol).await {
                    Ok(snapshot) => ToolOutput::ok(tool, render::render_position(&snapshot)),
                    Err(e) => ToolOutput::error(tool, render::render_gateway_error(&e)),
                }
            }
        };

        if output.is_error {
            warn!(tool = %tool, "Tool call failed");
        }
        Ok(output)
    }

    async fn place(
        &self,
        tool: ToolKind,
        symbol: &str,
        side: &str,
        order_type: &str,
        quantity: rust_decimal::Decimal,
        price: Option<rust_decimal::Decimal>,
    ) -> ToolOutput {
        let request = match validate(symbol, side, order_type, quantity, price) {
            Ok(request) => request,
            Err(e) => {
                warn!(reason = e.reason(), "Order input rejected");
                return ToolOutput::error(tool, render::render_validation_error(&e));
            }
        };

        match self.gateway.place_order(&request).await {
            Ok(result) => ToolOutput::ok(tool, render::render_order(&result)),
            Err(e) => ToolOutput::error(tool, render::render_gateway_error(&e)),
        }
    }
}
