//! 데이터 수집 오류 타입.

use thiserror::Error;

/// 외부 데이터 소스 오류.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("HTTP 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP 상태 오류: {status} ({url})")]
    Status { status: u16, url: String },

    #[error("Rate limit 초과")]
    RateLimited,

    #[error("문자 디코딩 실패: {0}")]
    Decode(String),

    #[error("응답 파싱 실패: {0}")]
    Parse(String),

    #[error("데이터 없음: {ticker}")]
    NoData { ticker: String },
}

impl DataError {
    /// 잠시 후 재시도할 만한 오류인지.
    pub fn is_retryable(&self) -> bool {
        match self {
            DataError::RateLimited => true,
            DataError::Http(e) => e.is_timeout() || e.is_connect(),
            DataError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Parse(err.to_string())
    }
}

/// 데이터 작업용 Result 타입.
pub type Result<T> = std::result::Result<T, DataError>;
