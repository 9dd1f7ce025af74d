//! 잔고 및 포지션 조회 명령.

use assistant_exchange::OrderGateway;
use assistant_tools::render::{render_balance, render_gateway_error, render_position};
use tracing::error;

/// 계좌 잔고 출력.
pub async fn balance(gateway: &dyn OrderGateway) -> anyhow::Result<()> {
    match gateway.get_balance().await {
        Ok(snapshot) => {
            println!("{}", render_balance(&snapshot));
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Balance query failed");
            println!("{}", render_gateway_error(&e));
            Err(e.into())
        }
    }
}

/// 심볼 포지션 출력.
pub async fn position(gateway: &dyn OrderGateway, symbol: &str) -> anyhow::Result<()> {
    match gateway.get_position(symbol).await {
        Ok(snapshot) => {
            println!("{}", render_position(&snapshot));
            Ok(())
        }
        Err(e) => {
            error!(error = %e, symbol, "Position query failed");
            println!("{}", render_gateway_error(&e));
            Err(e.into())
        }
    }
}
