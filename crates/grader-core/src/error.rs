//! 공통 에러 타입.

use thiserror::Error;

/// 핵심 크레이트 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 로드 실패
    #[error("설정 에러: {0}")]
    Config(#[from] config::ConfigError),

    /// 알 수 없는 시장 구분
    #[error("알 수 없는 시장: {0}")]
    UnknownMarket(String),

    /// 알 수 없는 필드 이름
    #[error("알 수 없는 필드: {0}")]
    UnknownField(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 핵심 작업용 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;
