//! 거래소 주문 게이트웨이.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - `OrderGateway` trait: 주문 제출, 잔고 조회, 포지션 조회
//! - Binance USDⓈ-M 선물 커넥터 (테스트넷/메인넷)
//! - 일시적 실패(502/503/504, 네트워크)에 대한 선형 대기 재시도
//! - 시도 단위 이벤트 관찰자

pub mod connector;
pub mod error;
pub mod observer;
pub mod retry;
pub mod traits;

pub use connector::{FuturesConfig, FuturesGateway};
pub use error::*;
pub use observer::{AttemptEvent, AttemptObserver, AttemptOutcome, RecordingObserver, TracingObserver};
pub use retry::RetryPolicy;
pub use traits::*;
