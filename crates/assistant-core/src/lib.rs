//! # Assistant Core
//!
//! 선물 주문 어시스턴트의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 게이트웨이, 에이전트 도구, CLI가 공통으로 사용하는 타입을 제공합니다:
//! - 주문 요청 검증기 (`validate`)
//! - 주문 결과, 계좌/포지션 스냅샷
//! - 설정 관리 및 API 자격증명
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use self::config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
