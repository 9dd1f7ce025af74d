//! 설정 관리.
//!
//! 설정은 다음 순서로 병합됩니다 (뒤쪽이 우선):
//! 1. 코드 기본값
//! 2. TOML 설정 파일 (선택)
//! 3. `ASSISTANT__` 접두사 환경 변수 (예: `ASSISTANT__RETRY__MAX_ATTEMPTS=5`)
//!
//! API 자격증명은 설정 파일에 두지 않고 `BINANCE_API_KEY` / `BINANCE_API_SECRET`
//! 환경 변수에서만 읽습니다.

use crate::error::ConfigError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Binance USDⓈ-M 선물 테스트넷 REST URL.
pub const BINANCE_FUTURES_TESTNET_URL: &str = "https://testnet.binancefuture.com";
/// Binance USDⓈ-M 선물 메인넷 REST URL.
pub const BINANCE_FUTURES_MAINNET_URL: &str = "https://fapi.binance.com";

/// API 키 환경 변수 이름.
pub const API_KEY_ENV: &str = "BINANCE_API_KEY";
/// API 시크릿 환경 변수 이름.
pub const API_SECRET_ENV: &str = "BINANCE_API_SECRET";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 거래소 연결 설정
    pub exchange: ExchangeSettings,
    /// 재시도 정책 설정
    pub retry: RetrySettings,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 거래소 연결 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExchangeSettings {
    /// 테스트넷 사용
    pub testnet: bool,
    /// REST 기본 URL 재정의 (없으면 testnet 여부로 결정)
    pub base_url: Option<String>,
    /// 시도당 HTTP 타임아웃 (초)
    pub timeout_secs: u64,
    /// 수신 윈도우 (밀리초)
    pub recv_window: u64,
    /// 주문마다 클라이언트 주문 ID를 생성해 재시도 간 재사용
    pub attach_client_order_id: bool,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            testnet: true,
            base_url: None,
            timeout_secs: 10,
            recv_window: 5000,
            attach_client_order_id: false,
        }
    }
}

impl ExchangeSettings {
    /// REST API 기본 URL 반환.
    pub fn rest_base_url(&self) -> &str {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/'),
            None if self.testnet => BINANCE_FUTURES_TESTNET_URL,
            None => BINANCE_FUTURES_MAINNET_URL,
        }
    }

    /// 시도당 타임아웃.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 재시도 정책 설정.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetrySettings {
    /// 최대 시도 횟수 (첫 시도 포함)
    pub max_attempts: u32,
    /// 기본 대기 시간 (밀리초). n번째 실패 후 `base_delay_ms * n` 만큼 대기
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 2000,
        }
    }
}

impl RetrySettings {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일(있다면)과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 존재하지 않으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = Self::builder()?
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("ASSISTANT")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 로드합니다 (환경 변수 미적용).
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = Self::builder()?
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = RetrySettings::default();
        Ok(config::Config::builder()
            .set_default("exchange.testnet", true)?
            .set_default("retry.max_attempts", defaults.max_attempts)?
            .set_default("retry.base_delay_ms", defaults.base_delay_ms)?)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.exchange.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "exchange.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// 거래소 API 자격증명.
///
/// # 보안
/// - 키와 시크릿은 `SecretString`으로 보관합니다.
/// - `Debug` 구현은 키를 마스킹하고 시크릿을 출력하지 않습니다.
pub struct Credentials {
    api_key: SecretString,
    api_secret: SecretString,
}

impl Credentials {
    /// 새 자격증명 생성.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into().into_boxed_str()),
            api_secret: SecretString::new(api_secret.into().into_boxed_str()),
        }
    }

    /// 환경 변수에서 생성합니다. 값이 비어 있으면 누락으로 취급합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        let read = |name: &'static str| -> Result<String, ConfigError> {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingCredentials(name))
        };

        let api_key = read(API_KEY_ENV)?;
        let api_secret = read(API_SECRET_ENV)?;
        Ok(Self::new(api_key, api_secret))
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    pub fn api_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.api_key();
        let masked_key = if key.len() > 8 {
            format!("{}...{}", &key[..4], &key[key.len() - 4..])
        } else {
            "***REDACTED***".to_string()
        };

        f.debug_struct("Credentials")
            .field("api_key", &masked_key)
            .field("api_secret", &"***REDACTED***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert!(config.exchange.testnet);
        assert_eq!(config.exchange.rest_base_url(), BINANCE_FUTURES_TESTNET_URL);
        assert_eq!(config.retry, RetrySettings::default());
        assert_eq!(config.retry.base_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_toml_overrides() {
        let config = AppConfig::from_toml(
            r#"
            [exchange]
            testnet = false
            timeout_secs = 3

            [retry]
            max_attempts = 5
            base_delay_ms = 100
            "#,
        )
        .unwrap();

        assert_eq!(config.exchange.rest_base_url(), BINANCE_FUTURES_MAINNET_URL);
        assert_eq!(config.exchange.timeout(), Duration::from_secs(3));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 100);
        // 지정하지 않은 값은 기본값 유지
        assert_eq!(config.exchange.recv_window, 5000);
    }

    #[test]
    fn test_base_url_override() {
        let settings = ExchangeSettings {
            base_url: Some("http://127.0.0.1:8080/".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.rest_base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let err = AppConfig::from_toml("[retry]\nmax_attempts = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_credentials_debug_is_masked() {
        let creds = Credentials::new("abcdefghijklmnop", "super-secret-value");
        let debug = format!("{:?}", creds);

        assert!(debug.contains("abcd...mnop"));
        assert!(!debug.contains("super-secret-value"));
        assert_eq!(creds.api_secret(), "super-secret-value");
    }

    #[test]
    #[serial]
    fn test_credentials_from_env() {
        std::env::set_var(API_KEY_ENV, "test_api_key");
        std::env::set_var(API_SECRET_ENV, "test_api_secret");
        let creds = Credentials::from_env().unwrap();
        assert_eq!(creds.api_key(), "test_api_key");

        std::env::set_var(API_SECRET_ENV, "");
        let err = Credentials::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials(API_SECRET_ENV)));

        std::env::remove_var(API_KEY_ENV);
        std::env::remove_var(API_SECRET_ENV);
        assert!(matches!(
            Credentials::from_env(),
            Err(ConfigError::MissingCredentials(API_KEY_ENV))
        ));
    }
}
