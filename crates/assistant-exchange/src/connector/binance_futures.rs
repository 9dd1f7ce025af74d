//! Binance USDⓈ-M 선물 커넥터.
//!
//! 주문 제출, 계좌 잔고, 포지션 조회를 위한 서명된 REST 호출을 구현합니다.
//! 메인넷과 테스트넷 모두 지원하며, 선택은 설정으로만 결정됩니다.
//!
//! # 재시도와 중복 주문
//!
//! 모든 호출은 [`RetryPolicy`]를 거칩니다. 파라미터는 재시도 간 동일하지만,
//! 거래소가 오래된 타임스탬프를 거부하므로 `timestamp`와 `signature`는 시도마다 새로 만듭니다.
//!
//! 주문 제출이 거래소에서는 성공했지만 응답이 네트워크 오류로 유실되면,
//! 재시도가 **중복 주문**을 만들 수 있습니다. 기본 동작은 이 위험을 그대로 둡니다.
//! `FuturesConfig::attach_client_order_id`를 켜면 호출마다 한 번 생성한
//! `newClientOrderId`를 모든 재시도에 재사용하여 거래소가 중복을 거부하게 합니다.

use crate::error::{AttemptError, GatewayError, TransientError};
use crate::observer::{AttemptObserver, TracingObserver};
use crate::retry::RetryPolicy;
use crate::traits::{GatewayResult, OrderGateway};
use assistant_core::{
    display_decimal, order_span, parse_exchange_decimal, AccountSnapshot, AssetBalance,
    Credentials, ExchangeSettings, OrderRequest, OrderResult, OrderType, PositionInfo,
    PositionSnapshot, ValidationError, BINANCE_FUTURES_MAINNET_URL, BINANCE_FUTURES_TESTNET_URL,
};
use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, Instrument};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// 로그/에러에 남길 응답 본문 최대 길이.
const BODY_SNIPPET_LEN: usize = 200;

// ============================================================================
// 설정
// ============================================================================

/// 선물 게이트웨이 설정.
///
/// 생성 후 변경되지 않으며 게이트웨이가 소유합니다.
/// `Debug` 출력에서 자격증명은 마스킹됩니다.
#[derive(Debug)]
pub struct FuturesConfig {
    /// API 자격증명
    pub credentials: Credentials,
    /// 테스트넷 여부
    pub testnet: bool,
    /// REST 기본 URL
    pub base_url: String,
    /// 시도당 HTTP 타임아웃
    pub timeout: Duration,
    /// 수신 윈도우 (밀리초)
    pub recv_window: u64,
    /// 주문마다 클라이언트 주문 ID를 붙여 재시도 중복을 막음
    pub attach_client_order_id: bool,
}

impl FuturesConfig {
    /// 테스트넷 기본값으로 설정 생성.
    pub fn new(credentials: Credentials) -> Self {
        Self::from_settings(credentials, &ExchangeSettings::default())
    }

    /// 애플리케이션 설정에서 생성.
    pub fn from_settings(credentials: Credentials, settings: &ExchangeSettings) -> Self {
        Self {
            credentials,
            testnet: settings.testnet,
            base_url: settings.rest_base_url().to_string(),
            timeout: settings.timeout(),
            recv_window: settings.recv_window,
            attach_client_order_id: settings.attach_client_order_id,
        }
    }

    /// 테스트넷/메인넷 전환. 기본 URL도 해당 네트워크로 바뀝니다.
    pub fn with_testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self.base_url = if testnet {
            BINANCE_FUTURES_TESTNET_URL
        } else {
            BINANCE_FUTURES_MAINNET_URL
        }
        .to_string();
        self
    }

    /// REST 기본 URL 재정의 (모의 서버 등).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_client_order_id(mut self, enabled: bool) -> Self {
        self.attach_client_order_id = enabled;
        self
    }
}

// ============================================================================
// API 응답 타입
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FuturesOrderResponse {
    order_id: i64,
    symbol: String,
    status: String,
    #[serde(default)]
    client_order_id: Option<String>,
    price: String,
    #[serde(default)]
    avg_price: Option<String>,
    orig_qty: String,
    executed_qty: String,
    #[serde(rename = "type")]
    order_type: String,
    side: String,
    update_time: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FuturesAccount {
    total_wallet_balance: String,
    available_balance: String,
    #[serde(default)]
    total_unrealized_profit: Option<String>,
    assets: Vec<FuturesAsset>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FuturesAsset {
    asset: String,
    wallet_balance: String,
    available_balance: String,
    #[serde(default)]
    unrealized_profit: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FuturesPositionRisk {
    symbol: String,
    #[serde(default)]
    position_side: Option<String>,
    position_amt: String,
    entry_price: String,
    mark_price: String,
    un_realized_profit: String,
    leverage: String,
}

#[derive(Debug, Deserialize)]
struct BinanceError {
    code: i64,
    msg: String,
}

fn decimal_field(name: &str, raw: &str) -> Result<Decimal, GatewayError> {
    parse_exchange_decimal(raw)
        .ok_or_else(|| GatewayError::MalformedResponse(format!("{}: invalid decimal '{}'", name, raw)))
}

fn optional_decimal_field(name: &str, raw: Option<&str>) -> Result<Decimal, GatewayError> {
    match raw {
        Some(raw) => decimal_field(name, raw),
        None => Ok(Decimal::ZERO),
    }
}

/// 0은 "값 없음"으로 취급 (시장가 주문의 price, 미체결 주문의 avgPrice).
fn non_zero(value: Decimal) -> Option<Decimal> {
    (!value.is_zero()).then_some(value)
}

impl FuturesOrderResponse {
    fn into_result(self) -> Result<OrderResult, GatewayError> {
        let side = self
            .side
            .parse()
            .map_err(|_| GatewayError::MalformedResponse(format!("side: '{}'", self.side)))?;
        let order_type = self.order_type.parse().map_err(|_| {
            GatewayError::MalformedResponse(format!("type: '{}'", self.order_type))
        })?;
        let average_price = match self.avg_price.as_deref() {
            Some(raw) => non_zero(decimal_field("avgPrice", raw)?),
            None => None,
        };

        Ok(OrderResult {
            order_id: self.order_id,
            client_order_id: self.client_order_id,
            status: self.status,
            symbol: self.symbol,
            side,
            order_type,
            quantity: decimal_field("origQty", &self.orig_qty)?,
            price: non_zero(decimal_field("price", &self.price)?),
            executed_quantity: decimal_field("executedQty", &self.executed_qty)?,
            average_price,
            update_time: self.update_time,
        })
    }
}

impl FuturesAccount {
    fn into_snapshot(self) -> Result<AccountSnapshot, GatewayError> {
        let assets = self
            .assets
            .into_iter()
            .map(|a| {
                Ok(AssetBalance {
                    wallet_balance: decimal_field("walletBalance", &a.wallet_balance)?,
                    available_balance: decimal_field("availableBalance", &a.available_balance)?,
                    unrealized_pnl: optional_decimal_field(
                        "unrealizedProfit",
                        a.unrealized_profit.as_deref(),
                    )?,
                    asset: a.asset,
                })
            })
            .collect::<Result<Vec<_>, GatewayError>>()?;

        Ok(AccountSnapshot {
            total_wallet_balance: decimal_field("totalWalletBalance", &self.total_wallet_balance)?,
            available_balance: decimal_field("availableBalance", &self.available_balance)?,
            total_unrealized_pnl: optional_decimal_field(
                "totalUnrealizedProfit",
                self.total_unrealized_profit.as_deref(),
            )?,
            assets,
        })
    }
}

impl FuturesPositionRisk {
    fn into_position(self) -> Result<PositionInfo, GatewayError> {
        let leverage = self.leverage.trim().parse::<u32>().map_err(|_| {
            GatewayError::MalformedResponse(format!("leverage: '{}'", self.leverage))
        })?;

        Ok(PositionInfo {
            position_side: self.position_side.unwrap_or_else(|| "BOTH".to_string()),
            amount: decimal_field("positionAmt", &self.position_amt)?,
            entry_price: decimal_field("entryPrice", &self.entry_price)?,
            mark_price: decimal_field("markPrice", &self.mark_price)?,
            unrealized_pnl: decimal_field("unRealizedProfit", &self.un_realized_profit)?,
            leverage,
            symbol: self.symbol,
        })
    }
}

// ============================================================================
// 게이트웨이
// ============================================================================

/// Binance 선물 게이트웨이.
///
/// 하나의 인증된 세션을 소유합니다. 설정은 생성 시 고정되며,
/// `reqwest::Client`는 내부적으로 커넥션 풀을 공유하므로 `&self`로 동시 호출이 가능합니다.
pub struct FuturesGateway {
    config: FuturesConfig,
    client: Client,
    retry: RetryPolicy,
    observer: Arc<dyn AttemptObserver>,
}

impl FuturesGateway {
    /// 새 게이트웨이 생성 (기본 재시도 정책, tracing 관찰자).
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `GatewayError::Config`를 반환합니다.
    pub fn new(config: FuturesConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            config,
            client,
            retry: RetryPolicy::default(),
            observer: Arc::new(TracingObserver),
        })
    }

    /// 재시도 정책 설정.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// 시도 이벤트 관찰자 설정.
    pub fn with_observer(mut self, observer: Arc<dyn AttemptObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &FuturesConfig {
        &self.config
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// HMAC-SHA256으로 쿼리 문자열 서명.
    fn sign(&self, query: &str) -> Result<String, GatewayError> {
        let mut mac = HmacSha256::new_from_slice(self.config.credentials.api_secret().as_bytes())
            .map_err(|e| GatewayError::Config(format!("서명 키 오류: {}", e)))?;
        mac.update(query.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// 파라미터에서 쿼리 문자열 생성.
    fn build_query(params: &[(&str, String)]) -> String {
        params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `recvWindow`, `timestamp`를 붙이고 서명한 쿼리 문자열.
    fn signed_query(&self, params: &[(&str, String)]) -> Result<String, GatewayError> {
        let mut all_params = params.to_vec();
        all_params.push(("recvWindow", self.config.recv_window.to_string()));
        all_params.push(("timestamp", Utc::now().timestamp_millis().to_string()));

        let query = Self::build_query(&all_params);
        let signature = self.sign(&query)?;
        Ok(format!("{}&signature={}", query, signature))
    }

    /// 주문 파라미터 생성. 지정가 주문에만 `price`와 `timeInForce=GTC`를 붙입니다.
    fn order_params(
        request: &OrderRequest,
        client_order_id: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", request.symbol().to_string()),
            ("side", request.side().to_string()),
            ("type", request.order_type().to_string()),
            ("quantity", display_decimal(request.quantity())),
        ];

        if let (OrderType::Limit, Some(price)) = (request.order_type(), request.price()) {
            params.push(("price", display_decimal(price)));
            params.push(("timeInForce", "GTC".to_string()));
        }

        if let Some(id) = client_order_id {
            params.push(("newClientOrderId", id.to_string()));
        }

        params.push(("newOrderRespType", "RESULT".to_string()));
        params
    }

    /// 거래소 규칙(`^[.A-Z:/a-z0-9_-]{1,36}$`)을 만족하는 클라이언트 주문 ID.
    fn new_client_order_id() -> String {
        format!("fa-{}", Uuid::new_v4().simple())
    }

    fn snippet(body: &str) -> String {
        let trimmed = body.trim();
        if trimmed.chars().count() > BODY_SNIPPET_LEN {
            let cut: String = trimmed.chars().take(BODY_SNIPPET_LEN).collect();
            format!("{}...", cut)
        } else {
            trimmed.to_string()
        }
    }

    /// HTTP 상태와 본문으로 한 번의 시도 결과를 분류합니다.
    fn classify<W: DeserializeOwned>(status: StatusCode, body: &str) -> Result<W, AttemptError> {
        if status.is_success() {
            return serde_json::from_str(body).map_err(|e| {
                AttemptError::Permanent(GatewayError::MalformedResponse(format!(
                    "{} (body: {})",
                    e,
                    Self::snippet(body)
                )))
            });
        }

        let reason = status.canonical_reason().unwrap_or("Unknown status");

        if TransientError::is_transient_status(status.as_u16()) {
            let cause = if body.trim().is_empty() {
                reason.to_string()
            } else {
                Self::snippet(body)
            };
            return Err(AttemptError::Transient(TransientError::http(
                status.as_u16(),
                cause,
            )));
        }

        // 에러 응답 파싱 시도
        let err = match serde_json::from_str::<BinanceError>(body) {
            Ok(error) => GatewayError::Permanent {
                http_status: status.as_u16(),
                code: error.code,
                message: error.msg,
            },
            Err(_) => GatewayError::Permanent {
                http_status: status.as_u16(),
                code: i64::from(status.as_u16()),
                message: if body.trim().is_empty() {
                    reason.to_string()
                } else {
                    Self::snippet(body)
                },
            },
        };
        Err(AttemptError::Permanent(err))
    }

    /// 서명된 요청 한 번 전송.
    async fn send_signed<W: DeserializeOwned>(
        &self,
        method: &Method,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<W, AttemptError> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let query = self.signed_query(params)?;

        let request = if *method == Method::GET {
            debug!("GET (signed) {}", endpoint);
            self.client.get(format!("{}?{}", url, query))
        } else {
            debug!("{} (signed) {}", method, endpoint);
            self.client
                .request(method.clone(), &url)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(query)
        };

        let response = request
            .header("X-MBX-APIKEY", self.config.credentials.api_key())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        Self::classify(status, &body)
    }

    /// 재시도 정책을 적용해 서명된 요청을 실행하고 응답을 도메인 타입으로 변환합니다.
    async fn execute<W, T, C>(
        &self,
        operation: &'static str,
        method: Method,
        endpoint: &str,
        params: Vec<(&'static str, String)>,
        convert: C,
    ) -> GatewayResult<T>
    where
        W: DeserializeOwned,
        C: Fn(W) -> Result<T, GatewayError>,
    {
        let method = &method;
        let params = params.as_slice();
        let convert = &convert;

        self.retry
            .execute(operation, self.observer.as_ref(), move |_attempt| async move {
                let wire: W = self.send_signed(method, endpoint, params).await?;
                convert(wire).map_err(AttemptError::Permanent)
            })
            .await
    }
}

#[async_trait]
impl OrderGateway for FuturesGateway {
    fn name(&self) -> &str {
        if self.config.testnet {
            "binance-futures-testnet"
        } else {
            "binance-futures"
        }
    }

    async fn place_order(&self, request: &OrderRequest) -> GatewayResult<OrderResult> {
        let span = order_span!(
            "place_order",
            request.symbol(),
            request.side(),
            request.order_type()
        );

        async move {
            let client_order_id = self
                .config
                .attach_client_order_id
                .then(Self::new_client_order_id);
            let params = Self::order_params(request, client_order_id.as_deref());

            info!(
                quantity = %request.quantity(),
                price = ?request.price(),
                client_order_id = ?client_order_id,
                "Placing order"
            );

            let result = self
                .execute(
                    "place_order",
                    Method::POST,
                    "/fapi/v1/order",
                    params,
                    FuturesOrderResponse::into_result,
                )
                .await?;

            info!(order_id = result.order_id, status = %result.status, "Order placed");
            Ok(result)
        }
        .instrument(span)
        .await
    }

    async fn get_balance(&self) -> GatewayResult<AccountSnapshot> {
        self.execute(
            "get_balance",
            Method::GET,
            "/fapi/v2/account",
            Vec::new(),
            FuturesAccount::into_snapshot,
        )
        .await
    }

    async fn get_position(&self, symbol: &str) -> GatewayResult<PositionSnapshot> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ValidationError::EmptySymbol.into());
        }

        let span = order_span!("get_position", symbol);
        let query_symbol = symbol.clone();

        self.execute(
            "get_position",
            Method::GET,
            "/fapi/v2/positionRisk",
            vec![("symbol", query_symbol)],
            |risks: Vec<FuturesPositionRisk>| {
                let mut positions = Vec::new();
                for risk in risks {
                    let position = risk.into_position()?;
                    if !position.is_flat() {
                        positions.push(position);
                    }
                }
                Ok(PositionSnapshot {
                    symbol: symbol.clone(),
                    positions,
                })
            },
        )
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::validate;
    use rust_decimal_macros::dec;

    fn gateway() -> FuturesGateway {
        let credentials = Credentials::new(
            "vmPUZE6mv9SD5VNHk4HlWFsOr6aKE2zvsw0MuIgwCIPy6utIco14y7Ju91duEh8A",
            "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j",
        );
        FuturesGateway::new(FuturesConfig::new(credentials)).expect("테스트용 게이트웨이 생성 실패")
    }

    #[test]
    fn test_sign() {
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            gateway().sign(query).unwrap(),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn test_signed_query_layout() {
        let query = gateway()
            .signed_query(&[("symbol", "BTCUSDT".to_string())])
            .unwrap();

        assert!(query.starts_with("symbol=BTCUSDT&recvWindow=5000&timestamp="));
        let signature = query.rsplit("&signature=").next().unwrap();
        assert_eq!(signature.len(), 64);
    }

    #[test]
    fn test_network_selection() {
        let gw = gateway();
        assert_eq!(gw.config().base_url, BINANCE_FUTURES_TESTNET_URL);
        assert_eq!(gw.name(), "binance-futures-testnet");

        let config = FuturesConfig::new(Credentials::new("k", "s")).with_testnet(false);
        assert_eq!(config.base_url, BINANCE_FUTURES_MAINNET_URL);
    }

    #[test]
    fn test_market_order_params_have_no_price() {
        let request = validate("btcusdt", "buy", "market", dec!(0.001), Some(dec!(1))).unwrap();
        let params = FuturesGateway::order_params(&request, None);
        let keys: Vec<_> = params.iter().map(|(k, _)| *k).collect();

        assert_eq!(keys, vec!["symbol", "side", "type", "quantity", "newOrderRespType"]);
        assert_eq!(params[3].1, "0.001");
    }

    #[test]
    fn test_limit_order_params() {
        let request = validate("ETHUSDT", "SELL", "LIMIT", dec!(0.5), Some(dec!(3000.00))).unwrap();
        let params = FuturesGateway::order_params(&request, Some("fa-abc"));

        assert!(params.contains(&("price", "3000".to_string())));
        assert!(params.contains(&("timeInForce", "GTC".to_string())));
        assert!(params.contains(&("newClientOrderId", "fa-abc".to_string())));
    }

    #[test]
    fn test_client_order_id_format() {
        let id = FuturesGateway::new_client_order_id();
        assert!(id.len() <= 36);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_classify_transient_statuses() {
        for status in [502u16, 503, 504] {
            let code = StatusCode::from_u16(status).unwrap();
            match FuturesGateway::classify::<serde_json::Value>(code, "") {
                Err(AttemptError::Transient(e)) => assert_eq!(e.http_status, Some(status)),
                other => panic!("expected transient for {}, got {:?}", status, other),
            }
        }
    }

    #[test]
    fn test_classify_business_error() {
        let result = FuturesGateway::classify::<serde_json::Value>(
            StatusCode::BAD_REQUEST,
            r#"{"code":-2019,"msg":"Margin is insufficient."}"#,
        );
        match result {
            Err(AttemptError::Permanent(GatewayError::Permanent { code, message, .. })) => {
                assert_eq!(code, -2019);
                assert_eq!(message, "Margin is insufficient.");
            }
            other => panic!("expected permanent, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_non_json_error_uses_status() {
        let result =
            FuturesGateway::classify::<serde_json::Value>(StatusCode::INTERNAL_SERVER_ERROR, "");
        match result {
            Err(AttemptError::Permanent(GatewayError::Permanent { code, message, .. })) => {
                assert_eq!(code, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected permanent, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_malformed_success() {
        let result = FuturesGateway::classify::<FuturesOrderResponse>(StatusCode::OK, "{}");
        assert!(matches!(
            result,
            Err(AttemptError::Permanent(GatewayError::MalformedResponse(_)))
        ));
    }

    #[test]
    fn test_order_response_conversion() {
        let body = r#"{
            "orderId": 123456, "symbol": "BTCUSDT", "status": "FILLED",
            "clientOrderId": "x-1", "price": "0", "avgPrice": "50000.00",
            "origQty": "0.001", "executedQty": "0.001", "type": "MARKET",
            "side": "BUY", "updateTime": 1700000000000
        }"#;
        let response: FuturesOrderResponse = serde_json::from_str(body).unwrap();
        let result = response.into_result().unwrap();

        assert_eq!(result.order_id, 123456);
        assert_eq!(result.price, None);
        assert_eq!(result.average_price, Some(dec!(50000)));
        assert_eq!(result.executed_quantity, dec!(0.001));
    }

    #[test]
    fn test_position_conversion_rejects_bad_leverage() {
        let risk = FuturesPositionRisk {
            symbol: "BTCUSDT".to_string(),
            position_side: None,
            position_amt: "0.001".to_string(),
            entry_price: "49000".to_string(),
            mark_price: "50000".to_string(),
            un_realized_profit: "1.0".to_string(),
            leverage: "ten".to_string(),
        };
        assert!(matches!(
            risk.into_position(),
            Err(GatewayError::MalformedResponse(_))
        ));
    }
}
