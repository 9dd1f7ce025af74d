//! 단일 주문 명령.

use anyhow::bail;
use assistant_core::{
    display_decimal, parse_exchange_decimal, validate, OrderRequest, OrderResult,
};
use assistant_exchange::OrderGateway;
use assistant_tools::render::{render_gateway_error, render_validation_error};
use rust_decimal::Decimal;
use std::fmt::Write;
use tracing::{error, info};

/// 주문 명령 인자 (검증 전 원시 입력).
#[derive(Debug, Clone)]
pub struct OrderArgs {
    pub symbol: String,
    pub side: String,
    pub order_type: String,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
}

/// clap 값 파서: 수량/가격 문자열을 Decimal로 변환.
pub fn parse_decimal(s: &str) -> Result<Decimal, String> {
    parse_exchange_decimal(s).ok_or_else(|| format!("'{}' is not a valid number", s))
}

/// 주문 입력을 검증합니다. 실패하면 사유를 출력하고 에러를 반환합니다.
pub fn prepare(args: &OrderArgs) -> anyhow::Result<OrderRequest> {
    match validate(
        &args.symbol,
        &args.side,
        &args.order_type,
        args.quantity,
        args.price,
    ) {
        Ok(request) => Ok(request),
        Err(e) => {
            error!(reason = e.reason(), "Validation error: {}", e);
            println!("\n{}\n", render_validation_error(&e));
            bail!("validation error: {}", e)
        }
    }
}

/// 주문 요약 블록.
pub fn order_summary(request: &OrderRequest) -> String {
    let mut out = String::from("=== Order Request Summary ===\n");
    let _ = writeln!(out, "Symbol:    {}", request.symbol());
    let _ = writeln!(out, "Side:      {}", request.side());
    let _ = writeln!(out, "Type:      {}", request.order_type());
    let _ = writeln!(out, "Quantity:  {}", display_decimal(request.quantity()));
    if let Some(price) = request.price() {
        let _ = writeln!(out, "Price:     {}", display_decimal(price));
    }
    out.push_str("=============================");
    out
}

/// 주문 응답 블록.
pub fn order_response(result: &OrderResult) -> String {
    let optional = |v: Option<Decimal>| v.map(display_decimal).unwrap_or_else(|| "N/A".into());

    let mut out = String::from("=== Order Response ===\n");
    let _ = writeln!(out, "Order ID:      {}", result.order_id);
    let _ = writeln!(out, "Status:        {}", result.status);
    let _ = writeln!(out, "Symbol:        {}", result.symbol);
    let _ = writeln!(out, "Side:          {}", result.side);
    let _ = writeln!(out, "Type:          {}", result.order_type);
    let _ = writeln!(out, "Quantity:      {}", display_decimal(result.quantity));
    if result.price.is_some() {
        let _ = writeln!(out, "Price:         {}", optional(result.price));
    }
    let _ = writeln!(
        out,
        "Executed Qty:  {}",
        display_decimal(result.executed_quantity)
    );
    let _ = writeln!(out, "Avg Price:     {}", optional(result.average_price));
    if let Some(id) = &result.client_order_id {
        let _ = writeln!(out, "Client ID:     {}", id);
    }
    out.push_str("======================");
    out
}

/// 검증된 주문을 제출하고 결과를 출력합니다.
pub async fn place(gateway: &dyn OrderGateway, request: &OrderRequest) -> anyhow::Result<()> {
    info!("Running order command: {}", request);
    println!("\n{}\n", order_summary(request));

    match gateway.place_order(request).await {
        Ok(result) => {
            println!("{}", order_response(&result));
            println!("\n✅ Order placed successfully!\n");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Order failed");
            println!("{}", render_gateway_error(&e));
            println!("\n❌ Failed to place order!\n");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::{OrderType, Side};
    use rust_decimal_macros::dec;

    fn args(order_type: &str, price: Option<Decimal>) -> OrderArgs {
        OrderArgs {
            symbol: "ethusdt".to_string(),
            side: "sell".to_string(),
            order_type: order_type.to_string(),
            quantity: dec!(0.5),
            price,
        }
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("0.001"), Ok(dec!(0.001)));
        assert!(parse_decimal("abc").is_err());
    }

    #[test]
    fn test_prepare_limit_order() {
        let request = prepare(&args("limit", Some(dec!(3000)))).unwrap();
        let summary = order_summary(&request);

        assert!(summary.contains("Symbol:    ETHUSDT"));
        assert!(summary.contains("Type:      LIMIT"));
        assert!(summary.contains("Price:     3000"));
    }

    #[test]
    fn test_prepare_rejects_limit_without_price() {
        let err = prepare(&args("LIMIT", None)).unwrap_err();
        assert!(err.to_string().contains("Price is required for LIMIT orders"));
    }

    #[test]
    fn test_market_summary_omits_price() {
        let request = prepare(&args("MARKET", Some(dec!(1)))).unwrap();
        assert!(!order_summary(&request).contains("Price:"));
    }

    #[test]
    fn test_order_response_block() {
        let result = OrderResult {
            order_id: 7,
            client_order_id: Some("fa-0123".to_string()),
            status: "FILLED".to_string(),
            symbol: "BTCUSDT".to_string(),
            side: Side::Buy,
            order_type: OrderType::Market,
            quantity: dec!(0.001),
            price: None,
            executed_quantity: dec!(0.001),
            average_price: Some(dec!(50000)),
            update_time: 0,
        };
        let text = order_response(&result);

        assert!(text.contains("Order ID:      7"));
        assert!(text.contains("Avg Price:     50000"));
        assert!(text.contains("Client ID:     fa-0123"));
        assert!(!text.contains("Price:         "));
    }
}
