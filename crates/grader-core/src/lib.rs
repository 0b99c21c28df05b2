//! # Grader Core
//!
//! 종목 분석 시스템의 핵심 도메인 타입을 제공합니다.
//!
//! - 종목 식별 타입 (`InstrumentRef`, `Market`)
//! - 고정 필드 스키마 (`Field`, `ExtractedRecord`)
//! - 점수화 결과 (`ScoredRecord`, `Grade`, `Recommendation`)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
