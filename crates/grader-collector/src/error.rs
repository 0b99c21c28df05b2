//! 에러 타입 정의.

use std::fmt;

use grader_core::CoreError;
use grader_data::DataError;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 설정 에러
    Config(String),
    /// 데이터 소스 에러 (네이버 금융, KRX)
    DataSource(DataError),
    /// 종목 분석 파이프라인 중단 (panic)
    Pipeline(String),
    /// 결과 파일 쓰기 에러
    Io(std::io::Error),
    /// JSON 직렬화 에러
    Serialization(serde_json::Error),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "설정 에러: {}", msg),
            Self::DataSource(e) => write!(f, "데이터 소스 에러: {}", e),
            Self::Pipeline(msg) => write!(f, "분석 중단: {}", msg),
            Self::Io(e) => write!(f, "파일 에러: {}", e),
            Self::Serialization(e) => write!(f, "직렬화 에러: {}", e),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DataSource(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::Config(_) | Self::Pipeline(_) => None,
        }
    }
}

impl From<DataError> for CollectorError {
    fn from(err: DataError) -> Self {
        Self::DataSource(err)
    }
}

impl From<CoreError> for CollectorError {
    fn from(err: CoreError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CollectorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CollectorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
