//! CLI 명령어 구현 모듈.

pub mod account;
pub mod order;
pub mod tools;

use anyhow::Context;
use assistant_core::{AppConfig, Credentials};
use assistant_exchange::{FuturesConfig, FuturesGateway, RetryPolicy};
use tracing::info;

/// 설정과 환경 변수 자격증명으로 게이트웨이를 생성합니다.
pub fn build_gateway(config: &AppConfig) -> anyhow::Result<FuturesGateway> {
    let credentials = Credentials::from_env().context("API credentials unavailable")?;
    let futures_config = FuturesConfig::from_settings(credentials, &config.exchange);

    info!(
        base_url = %futures_config.base_url,
        testnet = futures_config.testnet,
        max_attempts = config.retry.max_attempts,
        "Gateway initialized"
    );

    let gateway = FuturesGateway::new(futures_config)?
        .with_retry_policy(RetryPolicy::from_settings(&config.retry));
    Ok(gateway)
}
