//! 에이전트 도구 명령.
//!
//! 외부 에이전트 루프는 `assistant tools list`로 카탈로그를 받고,
//! `assistant tools call <NAME> --args <JSON>`으로 도구를 한 번씩 호출합니다.

use anyhow::{bail, Context};
use assistant_tools::{ToolKind, ToolRegistry};
use serde_json::Value;

/// 도구 카탈로그 JSON.
pub fn catalog() -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&ToolKind::catalog_json())?)
}

/// `--args` 문자열 파싱. 비어 있으면 빈 객체.
pub fn parse_tool_args(raw: Option<&str>) -> anyhow::Result<Value> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Value::Object(Default::default())),
        Some(raw) => serde_json::from_str(raw).context("--args must be a JSON object"),
    }
}

/// 도구 한 번 호출. 결과 텍스트는 항상 출력하고, 실패면 에러를 반환합니다.
pub async fn call(registry: &ToolRegistry, name: &str, args: Value) -> anyhow::Result<()> {
    let output = registry.call(name, args).await?;
    println!("{}", output.text);

    if output.is_error {
        bail!("tool {} failed", output.tool);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lists_all_tools() {
        let text = catalog().unwrap();
        for kind in ToolKind::ALL {
            assert!(text.contains(kind.name()));
        }
    }

    #[test]
    fn test_parse_tool_args() {
        assert_eq!(parse_tool_args(None).unwrap(), serde_json::json!({}));
        assert_eq!(
            parse_tool_args(Some(r#"{"symbol":"BTCUSDT"}"#)).unwrap()["symbol"],
            "BTCUSDT"
        );
        assert!(parse_tool_args(Some("{not json")).is_err());
    }
}
