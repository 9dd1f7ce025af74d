//! 에이전트 도구 카탈로그.
//!
//! 대화형 에이전트가 이름과 JSON 인자로 호출하는 네 가지 도구를 제공합니다:
//! - `place_market_order`, `place_limit_order`: 주문 검증 후 제출
//! - `get_account_balance`: 계좌 잔고 조회
//! - `get_position_info`: 심볼 포지션 조회
//!
//! 동적 디스패치와 JSON 처리는 이 크레이트에만 있으며,
//! 게이트웨이는 강타입 `OrderGateway` 계약만 봅니다.

pub mod args;
pub mod catalog;
pub mod error;
pub mod registry;
pub mod render;

pub use catalog::ToolKind;
pub use error::ToolError;
pub use registry::{ToolOutput, ToolRegistry};
