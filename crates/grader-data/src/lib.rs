//! 종목 페이지 수집과 지표 추출.
//!
//! 이 crate는 다음을 제공합니다:
//! - 읽기 전용 문서 모델 (`Page`)
//! - 필드별 우선순위 추출 전략과 카테고리 추출기
//! - 텍스트 정규화와 점수화용 숫자 변환
//! - 카테고리별 부분 결과 병합
//! - 네이버 금융 / KRX / Gemini Provider

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod page;
pub mod provider;

pub use aggregate::aggregate;
pub use error::{DataError, Result};
pub use extract::strategy::{extract, FieldChain, Matcher, RawCapture};
pub use extract::{extract_markup, extract_page, Category, PartialRecord};
pub use normalize::{coerce, expand_magnitude, normalize, CoerceError, NormalizeKind};
pub use page::Page;

pub use provider::{
    Advice, DocumentSource, GeminiAdvisor, InstrumentUniverse, KrxUniverse, NarrativeError,
    NaverFinanceFetcher, StaticUniverse,
};
