//! 주문 어시스턴트 CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 단일 주문 제출
//! - 잔고/포지션 조회
//! - 외부 에이전트 루프를 위한 도구 카탈로그와 도구 호출

pub mod commands;
