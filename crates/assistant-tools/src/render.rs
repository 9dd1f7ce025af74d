//! 도구 결과의 텍스트 렌더링.
//!
//! 에이전트가 그대로 사용자에게 전달할 수 있는 사람이 읽는 형식입니다.
//! 실패는 항상 구체적인 에러 종류를 드러냅니다.

use assistant_core::{
    display_decimal, AccountSnapshot, OrderResult, OrderType, PositionSnapshot, ValidationError,
};
use assistant_exchange::GatewayError;
use std::fmt::Write;

fn or_na(value: Option<rust_decimal::Decimal>) -> String {
    value.map(display_decimal).unwrap_or_else(|| "N/A".to_string())
}

/// 주문 결과.
pub fn render_order(result: &OrderResult) -> String {
    let mut out = format!("✅ {} order placed successfully!\n", result.order_type);
    let _ = writeln!(out, "Order ID: {}", result.order_id);
    let _ = writeln!(out, "Symbol: {}", result.symbol);
    let _ = writeln!(out, "Side: {}", result.side);
    let _ = writeln!(out, "Status: {}", result.status);
    if result.order_type == OrderType::Limit {
        let _ = writeln!(out, "Price: {}", or_na(result.price));
    }
    let _ = writeln!(out, "Quantity: {}", display_decimal(result.quantity));
    let _ = writeln!(
        out,
        "Executed Qty: {}",
        display_decimal(result.executed_quantity)
    );
    let _ = write!(out, "Avg Price: {}", or_na(result.average_price));
    out
}

/// 계좌 잔고. 지갑 잔고가 있는 자산만 나열합니다.
pub fn render_balance(snapshot: &AccountSnapshot) -> String {
    let blocks: Vec<String> = snapshot
        .funded_assets()
        .map(|a| {
            format!(
                "Asset: {}\nWallet Balance: {}\nAvailable Balance: {}",
                a.asset,
                display_decimal(a.wallet_balance),
                display_decimal(a.available_balance)
            )
        })
        .collect();

    if blocks.is_empty() {
        return "No balance found in account.".to_string();
    }

    format!(
        "📊 Account Balance:\n\nTotal Wallet Balance: {}\nAvailable Balance: {}\nUnrealized PnL: {}\n\n{}",
        display_decimal(snapshot.total_wallet_balance),
        display_decimal(snapshot.available_balance),
        display_decimal(snapshot.total_unrealized_pnl),
        blocks.join("\n\n")
    )
}

/// 포지션 정보. 열린 포지션이 없으면 한 줄 안내.
pub fn render_position(snapshot: &PositionSnapshot) -> String {
    if snapshot.is_flat() {
        return format!("No open position for {}", snapshot.symbol);
    }

    let blocks: Vec<String> = snapshot
        .positions
        .iter()
        .map(|p| {
            format!(
                "📈 Position Information for {} ({}):\n\
                 Position Size: {}\n\
                 Entry Price: {}\n\
                 Mark Price: {}\n\
                 Unrealized PnL: {}\n\
                 Leverage: {}x",
                p.symbol,
                p.position_side,
                display_decimal(p.amount),
                display_decimal(p.entry_price),
                display_decimal(p.mark_price),
                display_decimal(p.unrealized_pnl),
                p.leverage
            )
        })
        .collect();

    blocks.join("\n\n")
}

/// 검증 실패 (입력 수정으로 복구 가능).
pub fn render_validation_error(err: &ValidationError) -> String {
    format!("❌ Invalid order input: {}. Please fix your input and try again.", err)
}

/// 게이트웨이 실패. 에러 종류별로 다른 안내를 붙입니다.
pub fn render_gateway_error(err: &GatewayError) -> String {
    match err {
        GatewayError::Validation(inner) => render_validation_error(inner),
        GatewayError::Permanent {
            http_status,
            code,
            message,
        } => format!(
            "❌ Request rejected by exchange (HTTP {}).\nError Code: {}\nError Message: {}",
            http_status, code, message
        ),
        GatewayError::ExhaustedRetries {
            attempts,
            last_cause,
        } => format!(
            "❌ Exchange currently unavailable after {} attempts (last cause: {}). Please try again later.",
            attempts, last_cause
        ),
        GatewayError::MalformedResponse(detail) => format!(
            "❌ Exchange returned an unreadable response: {}. Check the order status before retrying.",
            detail
        ),
        GatewayError::Config(detail) => format!("❌ Gateway configuration error: {}", detail),
    }
}
