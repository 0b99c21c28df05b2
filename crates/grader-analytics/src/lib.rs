//! 추출 지표의 규칙 기반 점수화.
//!
//! [`score`]는 순수 함수입니다. 같은 [`ExtractedRecord`](grader_core::ExtractedRecord)는
//! 항상 같은 [`ScoredRecord`](grader_core::ScoredRecord)를 만듭니다.

pub mod error;
pub mod scorer;

pub use error::{ScoreError, ScoreResult};
pub use scorer::{evaluate, price_position, score, Adjustment, Evaluation, BASE_SCORE};
