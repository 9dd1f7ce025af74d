//! 선물 주문 어시스턴트 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 시장가 매수 (테스트넷)
//! assistant order BTCUSDT BUY MARKET 0.001
//!
//! # 지정가 매도
//! assistant order ETHUSDT SELL LIMIT 0.5 3000
//!
//! # 잔고 및 포지션
//! assistant balance
//! assistant position BTCUSDT
//!
//! # 에이전트 도구
//! assistant tools list
//! assistant tools call get_position_info --args '{"symbol":"BTCUSDT"}'
//! ```

use anyhow::anyhow;
use assistant_cli::commands::{self, account, order, tools};
use assistant_core::{init_logging, AppConfig, LogConfig, LogFormat};
use assistant_tools::ToolRegistry;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "assistant")]
#[command(about = "Binance USDⓈ-M Futures 주문 어시스턴트", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로 (없으면 기본값과 환경 변수만 사용)
    #[arg(long, global = true, default_value = "config/default.toml")]
    config: String,

    /// 메인넷 사용 (기본: 테스트넷)
    #[arg(long, global = true)]
    mainnet: bool,

    /// 로그 레벨 (설정 파일보다 우선)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 주문 제출
    Order {
        /// 심볼 (예: BTCUSDT)
        symbol: String,

        /// 방향 (BUY, SELL)
        side: String,

        /// 유형 (MARKET, LIMIT)
        #[arg(value_name = "TYPE")]
        order_type: String,

        /// 수량
        #[arg(value_parser = order::parse_decimal)]
        quantity: Decimal,

        /// 지정가 (LIMIT 주문 필수)
        #[arg(value_parser = order::parse_decimal)]
        price: Option<Decimal>,
    },

    /// 계좌 잔고 조회
    Balance,

    /// 포지션 조회
    Position {
        /// 심볼 (예: BTCUSDT)
        symbol: String,
    },

    /// 에이전트 도구
    Tools {
        #[command(subcommand)]
        command: ToolsCommand,
    },
}

#[derive(Subcommand)]
enum ToolsCommand {
    /// 도구 카탈로그 (JSON 스키마 포함)
    List,

    /// 도구 한 번 호출
    Call {
        /// 도구 이름
        name: String,

        /// JSON 인자 (예: '{"symbol":"BTCUSDT"}')
        #[arg(long)]
        args: Option<String>,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load(&cli.config)?;
    if cli.mainnet {
        config.exchange.testnet = false;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    Ok(config)
}

fn log_config(cli: &Cli, config: &AppConfig) -> anyhow::Result<LogConfig> {
    let mut log_config = LogConfig::from(&config.logging);
    if let Some(format) = &cli.log_format {
        let format: LogFormat = format.parse().map_err(|e: String| anyhow!(e))?;
        log_config = log_config.with_format(format);
    }
    Ok(log_config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일은 선택 사항
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(log_config(&cli, &config)?).map_err(|e| anyhow!("{}", e))?;

    info!(
        testnet = config.exchange.testnet,
        base_url = config.exchange.rest_base_url(),
        "Assistant starting"
    );

    match cli.command {
        Commands::Order {
            symbol,
            side,
            order_type,
            quantity,
            price,
        } => {
            let request = order::prepare(&order::OrderArgs {
                symbol,
                side,
                order_type,
                quantity,
                price,
            })?;
            let gateway = commands::build_gateway(&config)?;
            order::place(&gateway, &request).await?;
        }

        Commands::Balance => {
            let gateway = commands::build_gateway(&config)?;
            account::balance(&gateway).await?;
        }

        Commands::Position { symbol } => {
            let gateway = commands::build_gateway(&config)?;
            account::position(&gateway, &symbol).await?;
        }

        Commands::Tools { command } => match command {
            ToolsCommand::List => {
                println!("{}", tools::catalog()?);
            }
            ToolsCommand::Call { name, args } => {
                let args = tools::parse_tool_args(args.as_deref())?;
                let gateway = commands::build_gateway(&config)?;
                let registry = ToolRegistry::new(Arc::new(gateway));
                tools::call(&registry, &name, args).await?;
            }
        },
    }

    Ok(())
}
