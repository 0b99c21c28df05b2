//! 배치 오케스트레이터.
//!
//! 종목을 하나씩 순서대로 처리하고, 원격 요청 사이에 고정 간격을 둡니다.
//! 한 종목의 실패(요청 에러 또는 파이프라인 panic)는 `BatchError`로 남기고 다음 종목으로 넘어갑니다.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use grader_core::{instrument_span, BatchError, InstrumentRef, ScoredRecord};
use grader_data::DocumentSource;
use serde::Serialize;
use tracing::{info, warn, Instrument};

use crate::error::CollectorError;
use crate::pipeline::analyze_markup;
use crate::stats::CollectionStats;
use crate::Result;

/// 배치 실행 결과.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// 점수 내림차순. 동점이면 입력 순서
    #[serde(rename = "results")]
    pub scored: Vec<ScoredRecord>,
    /// 입력 순서
    pub errors: Vec<BatchError>,
    pub stats: CollectionStats,
}

/// 종목 목록을 받아 점수화하는 배치 실행기.
pub struct BatchOrchestrator {
    source: Arc<dyn DocumentSource>,
    pacing: Duration,
}

impl BatchOrchestrator {
    pub fn new(source: Arc<dyn DocumentSource>, pacing: Duration) -> Self {
        Self { source, pacing }
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// 배치를 실행합니다. N개 종목이면 N-1번 대기합니다.
    pub async fn run_batch(&self, instruments: &[InstrumentRef]) -> BatchReport {
        let started = Instant::now();
        let total = instruments.len();
        let mut stats = CollectionStats {
            total,
            ..Default::default()
        };
        let mut scored = Vec::with_capacity(total);
        let mut errors = Vec::new();

        info!(
            source = self.source.name(),
            total,
            pacing_ms = self.pacing.as_millis() as u64,
            "배치 분석 시작"
        );

        for (idx, instrument) in instruments.iter().enumerate() {
            let span = instrument_span!("analyze", instrument.id, instrument.market);
            match self.process(instrument).instrument(span).await {
                Ok(record) => {
                    stats.success += 1;
                    scored.push(record);
                }
                Err(e) => {
                    warn!(ticker = %instrument.id, error = %e, "종목 분석 실패");
                    stats.errors += 1;
                    errors.push(BatchError {
                        instrument: instrument.clone(),
                        error: e.to_string(),
                    });
                }
            }

            if (idx + 1) % 100 == 0 {
                info!(progress = format!("{}/{}", idx + 1, total), "배치 분석 진행 중");
            }

            // 요청 간 딜레이 (마지막 항목이 아닐 때만)
            if idx + 1 < total {
                tokio::time::sleep(self.pacing).await;
            }
        }

        // 안정 정렬
        scored.sort_by(|a, b| b.score.cmp(&a.score));

        stats.elapsed = started.elapsed();
        stats.log_summary("종목 분석");

        BatchReport {
            scored,
            errors,
            stats,
        }
    }

    async fn process(&self, instrument: &InstrumentRef) -> Result<ScoredRecord> {
        let markup = self.source.fetch(&instrument.id).await?;
        guarded(|| analyze_markup(instrument, &markup))
    }
}

/// 동기 파이프라인의 panic을 에러 값으로 바꿉니다.
fn guarded<F>(pipeline: F) -> Result<ScoredRecord>
where
    F: FnOnce() -> ScoredRecord,
{
    panic::catch_unwind(AssertUnwindSafe(pipeline))
        .map_err(|payload| CollectorError::Pipeline(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "알 수 없는 panic".to_string()
    }
}
