//! 도구 디스패치 에러.

use thiserror::Error;

/// 도구 호출 자체가 성립하지 않는 경우의 에러.
///
/// 게이트웨이 실패나 주문 검증 실패는 여기에 포함되지 않고
/// 에이전트가 읽을 수 있는 `ToolOutput` 텍스트로 렌더링됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// 카탈로그에 없는 도구 이름
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// 인자 누락 또는 타입 불일치
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: &'static str, reason: String },
}
