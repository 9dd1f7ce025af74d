//! 게이트웨이 trait 정의.

use assistant_core::{AccountSnapshot, OrderRequest, OrderResult, PositionSnapshot};
use async_trait::async_trait;

use crate::GatewayError;

/// 게이트웨이 작업을 위한 Result 타입.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// 주문 제출 및 계좌 조회 인터페이스.
///
/// 구현체는 `Send + Sync`이며 여러 태스크에서 동시에 호출할 수 있어야 합니다.
/// 호출마다 독립된 재시도 상태를 가집니다.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// 게이트웨이 이름 반환 (예: "binance-futures-testnet").
    fn name(&self) -> &str;

    /// 검증된 주문을 제출합니다.
    async fn place_order(&self, request: &OrderRequest) -> GatewayResult<OrderResult>;

    /// 계좌 잔고를 조회합니다.
    async fn get_balance(&self) -> GatewayResult<AccountSnapshot>;

    /// 심볼의 포지션을 조회합니다.
    async fn get_position(&self, symbol: &str) -> GatewayResult<PositionSnapshot>;
}
