//! 네이버 금융 종목 배치 분석기.
//!
//! 이 crate는 종목 목록을 받아 순서대로 처리하는 바이너리를 제공합니다:
//! - 종목 페이지 수집 (요청 간 고정 간격)
//! - 필드 추출과 종합 점수화
//! - CSV/JSON 내보내기와 콘솔 상위 종목 리포트

pub mod config;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use export::{export_filename, to_csv, to_json, write_report, ExportFormat, CSV_COLUMNS};
pub use orchestrator::{BatchOrchestrator, BatchReport};
pub use pipeline::{analyze_instrument, analyze_markup};
pub use report::render_top;
pub use stats::CollectionStats;
