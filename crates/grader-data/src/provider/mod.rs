//! 외부 데이터 Provider.
//!
//! ## 종목 페이지
//! - `DocumentSource`: 종목 코드로 디코딩된 페이지 마크업을 가져오는 trait
//! - `NaverFinanceFetcher`: 네이버 금융 `item/main.naver` 구현
//!
//! ## 종목 목록
//! - `InstrumentUniverse`: 분석 대상 종목 목록 trait
//! - `KrxUniverse`: KRX 정보데이터시스템 전종목 시세 (KOSPI, KOSDAQ 순)
//! - `StaticUniverse`: 사용자가 지정한 종목 코드
//!
//! ## 서술형 분석
//! - `GeminiAdvisor`: Gemini `generateContent` 기반 매매 전략 요약

pub mod gemini;
pub mod krx;
pub mod naver;

use async_trait::async_trait;
use grader_core::InstrumentRef;

use crate::error::Result;

pub use gemini::{Advice, GeminiAdvisor, NarrativeError};
pub use krx::{KrxUniverse, StaticUniverse};
pub use naver::NaverFinanceFetcher;

/// 종목 페이지 소스.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 종목 코드의 페이지 마크업을 가져옵니다.
    async fn fetch(&self, ticker: &str) -> Result<String>;
}

/// 분석 대상 종목 목록.
#[async_trait]
pub trait InstrumentUniverse: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 순서가 있는 종목 목록.
    async fn instruments(&self) -> Result<Vec<InstrumentRef>>;
}
