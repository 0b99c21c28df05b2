//! 애플리케이션 상태.
//!
//! 핸들러가 공유하는 데이터 소스와 설정을 담습니다. 가변 상태는 없습니다.

use chrono::{DateTime, Utc};
use grader_collector::BatchOrchestrator;
use grader_core::{AppConfig, NarrativeConfig};
use grader_data::{DocumentSource, InstrumentUniverse, KrxUniverse, NaverFinanceFetcher};
use std::sync::Arc;
use std::time::Duration;

/// 모든 핸들러가 공유하는 상태.
#[derive(Clone)]
pub struct AppState {
    /// 종목 페이지 소스 (네이버 금융)
    pub source: Arc<dyn DocumentSource>,
    /// 종목 목록 (KRX)
    pub universe: Arc<dyn InstrumentUniverse>,
    /// 내보내기 배치의 종목 간 간격
    pub pacing: Duration,
    /// Gemini 엔드포인트/모델
    pub narrative: NarrativeConfig,
    /// API 버전
    pub version: String,
    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        universe: Arc<dyn InstrumentUniverse>,
        pacing: Duration,
        narrative: NarrativeConfig,
    ) -> Self {
        Self {
            source,
            universe,
            pacing,
            narrative,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Utc::now(),
        }
    }

    /// 설정에서 네이버/KRX 클라이언트를 만듭니다.
    pub fn from_config(config: &AppConfig) -> grader_data::Result<Self> {
        let fetcher = NaverFinanceFetcher::new(&config.scraper)?;
        let universe = KrxUniverse::new(&config.universe);

        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(universe),
            Duration::from_millis(config.scraper.pacing_ms),
            config.narrative.clone(),
        ))
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }

    /// 요청 하나를 위한 배치 실행기.
    pub fn orchestrator(&self) -> BatchOrchestrator {
        BatchOrchestrator::new(self.source.clone(), self.pacing)
    }
}
