//! 종목 배치 분석 CLI.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use grader_collector::{
    analyze_instrument, render_top, write_report, BatchOrchestrator, CollectorConfig,
    ExportFormat,
};
use grader_core::{init_logging, InstrumentRef, LogConfig, LogFormat, Market};
use grader_data::{InstrumentUniverse, KrxUniverse, NaverFinanceFetcher, StaticUniverse};

#[derive(Parser)]
#[command(name = "grader-collector")]
#[command(about = "Naver Finance 종목 점수화 배치", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 전체 분석 실행 (종목 목록 → 수집 → 점수화 → 파일 저장 → 상위 리포트)
    Run {
        /// 특정 종목만 분석 (쉼표로 구분, 예: "005930,000660")
        #[arg(long)]
        symbols: Option<String>,

        /// 최대 분석 종목 수
        #[arg(long)]
        limit: Option<usize>,

        /// 출력 형식 (csv, json)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// 결과 파일 디렉토리
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// 종목 하나를 분석해 JSON으로 출력
    Analyze {
        /// 6자리 종목 코드
        ticker: String,
    },

    /// KRX 종목 목록 조회
    Stocks {
        /// 시장 (kospi, kosdaq)
        #[arg(long)]
        market: Option<Market>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 설정 로드
    let config = CollectorConfig::from_env()?;

    // 로깅 초기화
    let format = config
        .app
        .logging
        .format
        .parse::<LogFormat>()
        .unwrap_or_default();
    init_logging(LogConfig::new(cli.log_level.as_str()).with_format(format))
        .map_err(|e| anyhow!("로깅 초기화 실패: {}", e))?;

    tracing::debug!(
        pacing_ms = config.pacing_ms,
        output_dir = %config.output_dir.display(),
        "설정 로드 완료"
    );

    match cli.command {
        Commands::Run {
            symbols,
            limit,
            format,
            output,
        } => {
            let universe: Box<dyn InstrumentUniverse> = match symbols {
                Some(list) => Box::new(StaticUniverse::from_tickers(list.split(','))),
                None => Box::new(KrxUniverse::new(&config.app.universe)),
            };

            let mut instruments = universe.instruments().await?;
            if let Some(limit) = limit.or(config.batch_limit) {
                instruments.truncate(limit);
            }
            tracing::info!(
                universe = universe.name(),
                count = instruments.len(),
                "분석 대상 확정"
            );

            let fetcher = NaverFinanceFetcher::new(&config.app.scraper)?;
            let orchestrator = BatchOrchestrator::new(Arc::new(fetcher), config.pacing());
            let report = orchestrator.run_batch(&instruments).await;

            let dir = output.unwrap_or_else(|| config.output_dir.clone());
            let path = write_report(&report, format, &dir)?;

            println!("{}", render_top(&report.scored, config.top_n));
            println!("분석 완료! 결과 파일: {}", path.display());
        }
        Commands::Analyze { ticker } => {
            let fetcher = NaverFinanceFetcher::new(&config.app.scraper)?;
            let scored =
                analyze_instrument(&fetcher, &InstrumentRef::from_ticker(ticker.trim())).await?;
            println!("{}", serde_json::to_string_pretty(&scored)?);
        }
        Commands::Stocks { market } => {
            let mut universe = KrxUniverse::new(&config.app.universe);
            if let Some(market) = market {
                universe = universe.only(market);
            }

            let instruments = universe.instruments().await?;
            println!("{:<8} {:<8} NAME", "TICKER", "MARKET");
            println!("{}", "-".repeat(60));
            for instrument in &instruments {
                println!(
                    "{:<8} {:<8} {}",
                    instrument.id,
                    instrument.market.to_string(),
                    instrument.display_name
                );
            }
            println!("\nTotal: {} symbols", instruments.len());
        }
    }

    Ok(())
}
