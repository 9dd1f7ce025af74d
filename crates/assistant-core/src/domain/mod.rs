//! 주문 제출 및 계좌 조회를 위한 도메인 모델.

mod account;
mod order;

pub use account::*;
pub use order::*;
