//! 점수 규칙 오류.

use grader_core::Field;
use grader_data::CoerceError;
use rust_decimal::Decimal;
use thiserror::Error;

/// 규칙 하나의 평가 실패. 점수화 밖으로 전파되지 않고 진단 시그널이 됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("{field} {source}")]
    Coerce {
        field: Field,
        #[source]
        source: CoerceError,
    },

    #[error("52주 가격 범위가 0입니다 (최고 {high}, 최저 {low})")]
    DegenerateRange { high: Decimal, low: Decimal },

    #[error("{field} 계산 범위 초과")]
    Overflow { field: Field },
}

pub type ScoreResult<T> = Result<T, ScoreError>;
