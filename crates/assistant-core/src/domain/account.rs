//! 계좌 및 포지션 스냅샷.
//!
//! 거래소 상태의 읽기 전용 투영입니다. 조회 시점마다 새로 생성되며 캐시하지 않습니다.

use crate::domain::Side;
use crate::types::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 자산별 잔고.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalance {
    /// 자산 이름 (예: "USDT", "BTC")
    pub asset: String,
    /// 지갑 잔고
    pub wallet_balance: Decimal,
    /// 주문 가능 잔고
    pub available_balance: Decimal,
    /// 미실현 손익
    pub unrealized_pnl: Decimal,
}

/// 선물 계좌 스냅샷.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// 총 지갑 잔고
    pub total_wallet_balance: Decimal,
    /// 총 주문 가능 잔고
    pub available_balance: Decimal,
    /// 총 미실현 손익
    pub total_unrealized_pnl: Decimal,
    /// 자산별 잔고
    pub assets: Vec<AssetBalance>,
}

impl AccountSnapshot {
    /// 지갑 잔고가 0보다 큰 자산만 반환합니다.
    pub fn funded_assets(&self) -> impl Iterator<Item = &AssetBalance> {
        self.assets
            .iter()
            .filter(|a| a.wallet_balance > Decimal::ZERO)
    }

    /// 특정 자산의 잔고를 찾습니다 (대소문자 무시).
    pub fn asset(&self, asset: &str) -> Option<&AssetBalance> {
        self.assets
            .iter()
            .find(|a| a.asset.eq_ignore_ascii_case(asset))
    }
}

/// 단일 선물 포지션.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    pub symbol: String,
    /// 포지션 방향 구분 ("BOTH", "LONG", "SHORT")
    pub position_side: String,
    /// 포지션 수량 (롱은 양수, 숏은 음수)
    pub amount: Quantity,
    /// 평균 진입가
    pub entry_price: Price,
    /// 마크 가격
    pub mark_price: Price,
    /// 미실현 손익
    pub unrealized_pnl: Decimal,
    /// 레버리지
    pub leverage: u32,
}

impl PositionInfo {
    /// 수량이 0이면 포지션이 없는 상태입니다.
    pub fn is_flat(&self) -> bool {
        self.amount.is_zero()
    }

    /// 포지션 방향 (롱 = Buy, 숏 = Sell).
    pub fn direction(&self) -> Option<Side> {
        if self.amount > Decimal::ZERO {
            Some(Side::Buy)
        } else if self.amount < Decimal::ZERO {
            Some(Side::Sell)
        } else {
            None
        }
    }
}

/// 심볼의 포지션 스냅샷.
///
/// 열린 포지션이 없으면 `positions`가 비어 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    /// 조회한 심볼
    pub symbol: String,
    /// 수량이 0이 아닌 포지션 목록
    pub positions: Vec<PositionInfo>,
}

impl PositionSnapshot {
    /// 열린 포지션이 없는지 확인합니다.
    pub fn is_flat(&self) -> bool {
        self.positions.is_empty()
    }
}
